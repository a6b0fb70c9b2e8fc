use std::fmt;

use canon_engine::RunResult;
use canon_engine::Termination;

/// Prints a run as a human readable trace: the initial string, every step
/// with the rule that was applied, and the final result.
pub struct TraceFormatter<'a> {
    result: &'a RunResult,
    show_output: bool,
}

impl TraceFormatter<'_> {
    /// The output line is only printed when `show_output` is set, which
    /// should be the case when an output marker was configured.
    pub fn new(result: &RunResult, show_output: bool) -> TraceFormatter<'_> {
        TraceFormatter { result, show_output }
    }
}

impl fmt::Display for TraceFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Initial: {}", self.result.initial)?;
        writeln!(f)?;

        for record in &self.result.trace {
            writeln!(f, "Step {}:", record.step)?;
            writeln!(f, "  Current: {}", record.before)?;
            writeln!(f, "  Rule: {}", record.rule)?;
            writeln!(f, "  Result: {}", record.after)?;
            writeln!(f)?;
        }

        match &self.result.termination {
            Termination::NoRuleApplies => writeln!(f, "No applicable rules found. Computation halted.")?,
            Termination::StepLimit => writeln!(f, "Maximum step limit reached.")?,
            Termination::ValidationFailure { step, error } => writeln!(f, "Validation failed at step {step}: {error}")?,
        }

        writeln!(f, "Final result: {}", self.result.final_string)?;
        if self.show_output {
            writeln!(f, "Output: {}", self.result.output)?;
        }

        Ok(())
    }
}
