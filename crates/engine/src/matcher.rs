#![forbid(unsafe_code)]

use std::fmt;

use itertools::Itertools;
use smallvec::SmallVec;

use canon_utilities::debug_trace;

use crate::Pattern;
use crate::PatternToken;

/// The substrings captured by the variables of a pattern during one match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: SmallVec<[(char, String); 4]>,
}

impl Bindings {
    /// Returns the value bound to the given variable.
    pub fn get(&self, variable: char) -> Option<&str> {
        self.entries
            .iter()
            .find(|(bound, _)| *bound == variable)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over the bindings in the order of the pattern variables.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.entries.iter().map(|(variable, value)| (*variable, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bind(&mut self, variable: char, value: String) {
        debug_assert!(self.get(variable).is_none(), "Variable {variable} is bound twice");
        self.entries.push((variable, value));
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.entries
                .iter()
                .format_with(", ", |(variable, value), f| f(&format_args!("{variable} := \"{value}\"")))
        )
    }
}

/// A successful match of a pattern against the symbols `start..end` of a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub start: usize,
    pub end: usize,
    pub bindings: Bindings,
}

/// Matches the pattern against `text` starting at symbol offset `start`.
///
/// # Details
///
/// The pattern is walked from left to right. A literal must be equal to the
/// symbol under the cursor. A variable captures everything from the cursor up
/// to the first occurrence of the next literal of the pattern, or everything
/// up to the end of the text when no literal follows. A capture may be empty.
///
/// This is a prefix match: the text after the matched part is not inspected.
pub fn match_pattern(text: &[char], start: usize, pattern: &Pattern) -> Option<PatternMatch> {
    if start > text.len() {
        return None;
    }

    let mut cursor = start;
    let mut bindings = Bindings::default();

    for (index, token) in pattern.tokens().iter().enumerate() {
        match *token {
            PatternToken::Literal(literal) => {
                if text.get(cursor) != Some(&literal) {
                    debug_trace!("literal {} does not match at {}", literal, cursor);
                    return None;
                }
                cursor += 1;
            }
            PatternToken::Variable(variable) => {
                let end = match pattern.next_literal(index) {
                    Some(literal) => cursor + text[cursor..].iter().position(|symbol| *symbol == literal)?,
                    None => text.len(),
                };

                bindings.bind(variable, text[cursor..end].iter().collect());
                cursor = end;
            }
        }
    }

    Some(PatternMatch {
        start,
        end: cursor,
        bindings,
    })
}
