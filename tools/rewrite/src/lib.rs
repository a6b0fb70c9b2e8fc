use std::process::ExitCode;

use canon_engine::InputBindings;
use canon_engine::Termination;
use canon_syntax::SyntaxError;
use canon_syntax::parse_binding;

mod trace_format;

pub use trace_format::*;

/// Returns the exit code that reports how a run terminated.
pub fn termination_exit_code(termination: &Termination) -> ExitCode {
    match termination {
        Termination::NoRuleApplies => ExitCode::SUCCESS,
        Termination::StepLimit => ExitCode::from(2),
        Termination::ValidationFailure { .. } => ExitCode::from(3),
    }
}

/// Reads the inputs of a batch run: every non-empty line is a comma separated
/// list of `VAR=VALUE` bindings that are added to the given defaults.
pub fn parse_batch_inputs(text: &str, defaults: &InputBindings) -> Result<Vec<InputBindings>, SyntaxError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut inputs = defaults.clone();
            for item in line.split(',') {
                let (variable, value) = parse_binding(item)?;
                inputs.insert(variable, value);
            }
            Ok(inputs)
        })
        .collect()
}
