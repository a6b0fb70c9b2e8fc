use thiserror::Error;

/// Problems with the description of a canonical system that are detected
/// before any rewriting takes place.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Symbol '{symbol}' in {context} is neither in the alphabet nor a declared variable")]
    UnknownSymbol { symbol: char, context: String },

    #[error("Input binding for '{0}', which is not a declared variable")]
    UndeclaredVariable(char),

    #[error("Input value for variable '{variable}' contains symbol '{symbol}' outside the alphabet")]
    InvalidInputSymbol { variable: char, symbol: char },

    #[error("Variable '{0}' of the axiom has no input binding")]
    UnboundAxiomVariable(char),

    #[error("Pattern \"{pattern}\" has adjacent variables '{first}' and '{second}'")]
    AdjacentVariables { pattern: String, first: char, second: char },

    #[error("Pattern \"{pattern}\" uses variable '{variable}' more than once")]
    RepeatedVariable { pattern: String, variable: char },

    #[error("Template of rule {rule} uses variable '{variable}' that does not occur in its pattern")]
    UnboundTemplateVariable { rule: String, variable: char },

    #[error("The step limit must be positive")]
    InvalidStepLimit,
}

/// A rule produced a string containing a symbol outside the alphabet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rule {rule} produced symbol '{symbol}' outside the alphabet in \"{produced}\"")]
pub struct ValidationError {
    /// Index of the offending rule in declaration order.
    pub rule_index: usize,
    /// The offending rule as `pattern -> template`.
    pub rule: String,
    /// Offset in the working string at which the rule matched.
    pub offset: usize,
    /// The first symbol outside the alphabet.
    pub symbol: char,
    /// The string the rule would have produced.
    pub produced: String,
}
