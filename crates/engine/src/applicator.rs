#![forbid(unsafe_code)]

use canon_utilities::debug_trace;

use crate::Bindings;
use crate::CanonicalSystem;
use crate::RewritingStatistics;
use crate::ValidationError;
use crate::match_pattern;

/// The result of applying a rule to a working string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Index of the applied rule in declaration order.
    pub rule_index: usize,
    /// Symbol offset at which the pattern matched.
    pub offset: usize,
    /// Symbol offset just after the matched part.
    pub end: usize,
    pub bindings: Bindings,
    /// The instantiated template.
    pub replacement: String,
    /// The working string with the matched part replaced.
    pub result: String,
}

/// Applies the first applicable rule at the leftmost possible offset.
///
/// # Details
///
/// Offsets are tried from left to right and at every offset the rules are
/// tried in declaration order, so the leftmost match wins and rule priority
/// only breaks ties at the same offset. Returns `Ok(None)` when no rule
/// applies anywhere, which includes the empty string since it has no offsets.
///
/// Fails when the instantiated template contains a symbol outside the alphabet.
pub fn apply_rules(
    system: &CanonicalSystem,
    text: &str,
    stats: &mut RewritingStatistics,
) -> Result<Option<Application>, ValidationError> {
    let symbols: Vec<char> = text.chars().collect();

    for offset in 0..symbols.len() {
        for (rule_index, rule) in system.rules().iter().enumerate() {
            stats.match_attempts += 1;

            let Some(found) = match_pattern(&symbols, offset, rule.pattern()) else {
                continue;
            };

            debug_trace!("rule {} matches at {} with {}", rule, offset, found.bindings);

            let Ok(replacement) = rule.template().substitute(|variable| found.bindings.get(variable)) else {
                unreachable!("Every variable of a template occurs in the pattern of its rule");
            };

            let mut result: String = symbols[..offset].iter().collect();
            result.push_str(&replacement);
            result.extend(&symbols[found.end..]);

            if let Some(symbol) = system.alphabet().first_foreign(&replacement) {
                return Err(ValidationError {
                    rule_index,
                    rule: rule.to_string(),
                    offset,
                    symbol,
                    produced: result,
                });
            }

            return Ok(Some(Application {
                rule_index,
                offset,
                end: found.end,
                bindings: found.bindings,
                replacement,
                result,
            }));
        }
    }

    Ok(None)
}
