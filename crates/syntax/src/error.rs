use thiserror::Error;

use crate::SectionName;

/// Structural problems in the description of a canonical system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Missing required section {0}")]
    MissingSection(SectionName),

    #[error("Section {section} on line {line} was already defined on line {previous}")]
    DuplicateSection {
        section: SectionName,
        line: usize,
        previous: usize,
    },

    #[error("Section {0} has no items")]
    EmptySection(SectionName),

    #[error("Item \"{item}\" of section {section} must be a single character")]
    MultiCharacterSymbol { section: SectionName, item: String },

    #[error("Rule \"{0}\" is not of the form pattern -> template")]
    MalformedRule(String),

    #[error("Input binding \"{0}\" is not of the form VAR = VALUE with a single character variable")]
    MalformedBinding(String),

    #[error("Step limit \"{0}\" is not a number")]
    InvalidStepLimit(String),

    #[error("Output marker must consist of three single characters OPEN, SYMBOL, CLOSE, but got \"{0}\"")]
    MalformedMarker(String),
}
