#![forbid(unsafe_code)]

use std::fmt;

use log::debug;
use log::info;

use crate::CanonicalSystem;
use crate::ConfigError;
use crate::OutputMarker;
use crate::ValidationError;
use crate::apply_rules;

/// The step bound used when none is configured.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Options of a single run.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// The run stops after this many steps, must be positive.
    pub max_steps: usize,
    /// The marker used to extract the output value from the working string.
    pub marker: Option<OutputMarker>,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        RewriteOptions {
            max_steps: DEFAULT_MAX_STEPS,
            marker: None,
        }
    }
}

impl RewriteOptions {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_marker(mut self, marker: OutputMarker) -> Self {
        self.marker = Some(marker);
        self
    }
}

/// A snapshot of a single rewrite step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// The step number, starting at 1.
    pub step: usize,
    pub before: String,
    pub rule_index: usize,
    /// The applied rule as `pattern -> template`.
    pub rule: String,
    pub offset: usize,
    pub after: String,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: \"{}\" => \"{}\" using {} at {}",
            self.step, self.before, self.after, self.rule, self.offset
        )
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// No rule applies to the final string, the run converged.
    NoRuleApplies,
    /// The step bound was reached.
    StepLimit,
    /// The given step would have produced a symbol outside the alphabet.
    ValidationFailure { step: usize, error: ValidationError },
}

impl Termination {
    /// Returns true iff the run converged.
    pub fn is_converged(&self) -> bool {
        *self == Termination::NoRuleApplies
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::NoRuleApplies => write!(f, "no rule applies"),
            Termination::StepLimit => write!(f, "step limit reached"),
            Termination::ValidationFailure { step, error } => write!(f, "validation failed at step {step}: {error}"),
        }
    }
}

/// The outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub initial: String,
    pub final_string: String,
    pub total_steps: usize,
    pub termination: Termination,
    /// The most recently extracted output value, empty if never found.
    pub output: String,
    pub trace: Vec<StepRecord>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RewritingStatistics {
    /// The number of rules applied.
    pub rewrite_steps: usize,
    /// The number of (offset, rule) pairs that were tried.
    pub match_attempts: usize,
}

enum DriverState {
    Running,
    Halted(Termination),
}

/// Owns the working string of a single run and applies rules until the run
/// terminates.
///
/// Use [Rewriter::run] to rewrite to completion, or call [Rewriter::step]
/// repeatedly to inspect (or abandon) the run between steps.
pub struct Rewriter<'a> {
    system: &'a CanonicalSystem,
    max_steps: usize,
    marker: Option<&'a OutputMarker>,

    initial: String,
    current: String,
    output: String,
    trace: Vec<StepRecord>,
    state: DriverState,
    stats: RewritingStatistics,
}

impl<'a> Rewriter<'a> {
    /// Starts a run from the given initial working string, which should
    /// typically be obtained from [CanonicalSystem::initial_string].
    pub fn new(
        system: &'a CanonicalSystem,
        initial: String,
        options: &'a RewriteOptions,
    ) -> Result<Rewriter<'a>, ConfigError> {
        if options.max_steps == 0 {
            return Err(ConfigError::InvalidStepLimit);
        }

        if let Some(symbol) = system.alphabet().first_foreign(&initial) {
            return Err(ConfigError::UnknownSymbol {
                symbol,
                context: format!("initial string \"{initial}\""),
            });
        }

        let marker = options.marker.as_ref();
        let output = marker
            .and_then(|marker| marker.extract(&initial))
            .unwrap_or_default()
            .to_string();

        Ok(Rewriter {
            system,
            max_steps: options.max_steps,
            marker,
            current: initial.clone(),
            initial,
            output,
            trace: Vec::new(),
            state: DriverState::Running,
            stats: RewritingStatistics::default(),
        })
    }

    /// Performs a single step. Returns the record of the step, or `None` when
    /// the run has terminated, see [Rewriter::termination] for the reason.
    pub fn step(&mut self) -> Option<&StepRecord> {
        if let DriverState::Halted(_) = self.state {
            return None;
        }

        let step = self.trace.len() + 1;
        match apply_rules(self.system, &self.current, &mut self.stats) {
            Ok(Some(application)) => {
                let before = std::mem::replace(&mut self.current, application.result);
                let record = StepRecord {
                    step,
                    before,
                    rule_index: application.rule_index,
                    rule: self.system.rules()[application.rule_index].to_string(),
                    offset: application.offset,
                    after: self.current.clone(),
                };
                debug!("{record}");

                self.stats.rewrite_steps += 1;
                if let Some(output) = self.marker.and_then(|marker| marker.extract(&self.current)) {
                    self.output = output.to_string();
                }

                if step >= self.max_steps {
                    self.state = DriverState::Halted(Termination::StepLimit);
                }

                self.trace.push(record);
                self.trace.last()
            }
            Ok(None) => {
                self.state = DriverState::Halted(Termination::NoRuleApplies);
                None
            }
            Err(error) => {
                self.state = DriverState::Halted(Termination::ValidationFailure { step, error });
                None
            }
        }
    }

    /// Rewrites until the run terminates.
    pub fn run(mut self) -> RunResult {
        while self.step().is_some() {}

        let DriverState::Halted(termination) = self.state else {
            unreachable!("Stepping only stops once the run has halted");
        };

        info!(
            "{} steps and {} match attempts, {}",
            self.stats.rewrite_steps, self.stats.match_attempts, termination
        );

        RunResult {
            initial: self.initial,
            final_string: self.current,
            total_steps: self.trace.len(),
            termination,
            output: self.output,
            trace: self.trace,
        }
    }

    /// The current working string.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// The steps performed so far.
    pub fn trace(&self) -> &[StepRecord] {
        &self.trace
    }

    /// The most recently extracted output value.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns the reason for termination, or `None` while the run can continue.
    pub fn termination(&self) -> Option<&Termination> {
        match &self.state {
            DriverState::Running => None,
            DriverState::Halted(termination) => Some(termination),
        }
    }

    pub fn statistics(&self) -> RewritingStatistics {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::InputBindings;

    use super::*;

    fn decrement() -> CanonicalSystem {
        CanonicalSystem::new("1".chars(), "X".chars(), "X", &[("1X", "X")]).unwrap()
    }

    #[test]
    fn test_decrement_to_empty() {
        let system = decrement();
        let result = system
            .rewrite(&InputBindings::from_iter([('X', "111")]), &RewriteOptions::default())
            .unwrap();

        let after: Vec<&str> = result.trace.iter().map(|record| record.after.as_str()).collect();
        assert_eq!(after, vec!["11", "1", ""]);
        assert_eq!(result.total_steps, 3);
        assert_eq!(result.termination, Termination::NoRuleApplies);
        assert!(result.termination.is_converged());
    }

    #[test]
    fn test_step_limit_is_recorded() {
        let system = decrement();
        let options = RewriteOptions::default().with_max_steps(2);
        let result = system
            .rewrite(&InputBindings::from_iter([('X', "111")]), &options)
            .unwrap();

        // The step that reaches the limit is still recorded.
        assert_eq!(result.total_steps, 2);
        assert_eq!(result.final_string, "1");
        assert_eq!(result.termination, Termination::StepLimit);
    }

    #[test]
    fn test_zero_step_limit() {
        let system = decrement();
        let options = RewriteOptions::default().with_max_steps(0);

        assert!(matches!(
            Rewriter::new(&system, "1".to_string(), &options),
            Err(ConfigError::InvalidStepLimit)
        ));
    }

    #[test]
    fn test_initial_string_is_validated() {
        let system = decrement();
        let options = RewriteOptions::default();

        assert!(matches!(
            Rewriter::new(&system, "1a".to_string(), &options),
            Err(ConfigError::UnknownSymbol { symbol: 'a', .. })
        ));
    }

    #[test]
    fn test_cooperative_stepping() {
        let system = decrement();
        let options = RewriteOptions::default();
        let mut rewriter = Rewriter::new(&system, "1111".to_string(), &options).unwrap();

        let first = rewriter.step().cloned().unwrap();
        assert_eq!(first.step, 1);
        assert_eq!(first.before, "1111");
        assert_eq!(first.after, "111");

        rewriter.step();
        assert_eq!(rewriter.current(), "11");
        assert_eq!(rewriter.trace().len(), 2);
        assert_eq!(rewriter.termination(), None);

        // Continuing after inspection yields the same result as an uninterrupted run.
        let result = rewriter.run();
        assert_eq!(result.total_steps, 4);
        assert_eq!(result.trace[2].before, "11");
        assert_eq!(result.initial, "1111");
    }

    #[test]
    fn test_halted_rewriter_does_not_step() {
        let system = decrement();
        let options = RewriteOptions::default();
        let mut rewriter = Rewriter::new(&system, "1".to_string(), &options).unwrap();

        assert!(rewriter.step().is_some());
        assert!(rewriter.step().is_none());
        assert!(rewriter.step().is_none());
        assert_eq!(rewriter.termination(), Some(&Termination::NoRuleApplies));
        assert_eq!(rewriter.statistics().rewrite_steps, 1);
    }

    #[test]
    fn test_step_record_display() {
        let record = StepRecord {
            step: 2,
            before: "11".to_string(),
            rule_index: 0,
            rule: "1X -> X".to_string(),
            offset: 0,
            after: "1".to_string(),
        };

        assert_eq!(record.to_string(), "2: \"11\" => \"1\" using 1X -> X at 0");
    }
}
