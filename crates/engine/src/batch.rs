#![forbid(unsafe_code)]

use log::info;
use rayon::prelude::*;

use crate::CanonicalSystem;
use crate::ConfigError;
use crate::InputBindings;
use crate::RewriteOptions;
use crate::RunResult;

/// Rewrites the system once for every set of input bindings. The runs share
/// nothing but the system and are executed in parallel. The results are
/// returned in the order of the inputs.
pub fn run_batch(
    system: &CanonicalSystem,
    inputs: &[InputBindings],
    options: &RewriteOptions,
) -> Vec<Result<RunResult, ConfigError>> {
    info!("Rewriting {} inputs in parallel...", inputs.len());

    inputs
        .par_iter()
        .map(|input| system.rewrite(input, options))
        .collect()
}
