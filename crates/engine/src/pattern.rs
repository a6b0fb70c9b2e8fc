#![forbid(unsafe_code)]

use std::fmt;

use smallvec::SmallVec;

use crate::ConfigError;
use crate::SymbolKind;
use crate::SymbolTable;

/// A single element of a [Pattern].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternToken {
    Literal(char),
    Variable(char),
}

/// The left hand side of a rule: a sequence of literals and variables.
///
/// # Details
///
/// A variable captures text up to the first occurrence of the next literal of
/// the pattern, so two variables must always be separated by a literal.
/// Furthermore, a variable may occur at most once. Patterns violating these
/// restrictions are rejected by [Pattern::parse].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    tokens: Vec<PatternToken>,
}

impl Pattern {
    /// Tokenises the given pattern text.
    pub fn parse(text: &str, symbols: &SymbolTable) -> Result<Pattern, ConfigError> {
        let mut tokens = Vec::with_capacity(text.len());
        let mut seen: SmallVec<[char; 4]> = SmallVec::new();

        for symbol in text.chars() {
            let token = match symbols.classify(symbol) {
                SymbolKind::Literal => PatternToken::Literal(symbol),
                SymbolKind::Variable => {
                    if seen.contains(&symbol) {
                        return Err(ConfigError::RepeatedVariable {
                            pattern: text.to_string(),
                            variable: symbol,
                        });
                    }

                    if let Some(PatternToken::Variable(previous)) = tokens.last() {
                        return Err(ConfigError::AdjacentVariables {
                            pattern: text.to_string(),
                            first: *previous,
                            second: symbol,
                        });
                    }

                    seen.push(symbol);
                    PatternToken::Variable(symbol)
                }
                SymbolKind::Invalid => {
                    return Err(ConfigError::UnknownSymbol {
                        symbol,
                        context: format!("pattern \"{text}\""),
                    });
                }
            };

            tokens.push(token);
        }

        Ok(Pattern { tokens })
    }

    pub fn tokens(&self) -> &[PatternToken] {
        &self.tokens
    }

    /// Returns the variables of this pattern from left to right.
    pub fn variables(&self) -> impl Iterator<Item = char> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            PatternToken::Variable(variable) => Some(*variable),
            PatternToken::Literal(_) => None,
        })
    }

    /// Returns the first literal after the given token index, if any.
    pub fn next_literal(&self, index: usize) -> Option<char> {
        self.tokens.get(index + 1..)?.iter().find_map(|token| match token {
            PatternToken::Literal(literal) => Some(*literal),
            PatternToken::Variable(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                PatternToken::Literal(symbol) | PatternToken::Variable(symbol) => write!(f, "{symbol}")?,
            }
        }
        Ok(())
    }
}

/// A single element of a [Template]. Consecutive literals are merged into one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateToken {
    Literal(String),
    Variable(char),
}

/// The right hand side of a rule, or the axiom. Stored as literal runs and
/// variable references so that substitution never rescans substituted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Template {
    tokens: Vec<TemplateToken>,
}

impl Template {
    /// Tokenises the given template text. Every symbol that is not a declared
    /// variable becomes a literal, symbols outside the alphabet are only
    /// detected when the result is validated.
    pub fn parse(text: &str, symbols: &SymbolTable) -> Template {
        let mut tokens: Vec<TemplateToken> = Vec::new();

        for symbol in text.chars() {
            if symbols.classify(symbol) == SymbolKind::Variable {
                tokens.push(TemplateToken::Variable(symbol));
            } else if let Some(TemplateToken::Literal(run)) = tokens.last_mut() {
                run.push(symbol);
            } else {
                tokens.push(TemplateToken::Literal(symbol.to_string()));
            }
        }

        Template { tokens }
    }

    pub fn tokens(&self) -> &[TemplateToken] {
        &self.tokens
    }

    /// Returns the variable references of this template from left to right.
    pub fn variables(&self) -> impl Iterator<Item = char> + '_ {
        self.tokens.iter().filter_map(|token| match token {
            TemplateToken::Variable(variable) => Some(*variable),
            TemplateToken::Literal(_) => None,
        })
    }

    /// Replaces every variable reference by the value given by `lookup`.
    /// Returns the first variable for which `lookup` has no value as error.
    pub fn substitute<'a>(&self, lookup: impl Fn(char) -> Option<&'a str>) -> Result<String, char> {
        let mut result = String::new();

        for token in &self.tokens {
            match token {
                TemplateToken::Literal(run) => result.push_str(run),
                TemplateToken::Variable(variable) => result.push_str(lookup(*variable).ok_or(*variable)?),
            }
        }

        Ok(result)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                TemplateToken::Literal(run) => write!(f, "{run}")?,
                TemplateToken::Variable(variable) => write!(f, "{variable}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use crate::SymbolSet;

    use super::*;

    fn symbols() -> SymbolTable {
        SymbolTable::new(SymbolSet::new("01*=".chars()), SymbolSet::new("XY".chars()))
    }

    #[test]
    fn test_parse_pattern() {
        let pattern = Pattern::parse("1X*Y=", &symbols()).unwrap();

        assert_eq!(
            pattern.tokens(),
            &[
                PatternToken::Literal('1'),
                PatternToken::Variable('X'),
                PatternToken::Literal('*'),
                PatternToken::Variable('Y'),
                PatternToken::Literal('='),
            ]
        );
        assert_eq!(pattern.variables().collect::<String>(), "XY");
        assert_eq!(pattern.next_literal(1), Some('*'));
        assert_eq!(pattern.next_literal(4), None);
        assert_eq!(pattern.to_string(), "1X*Y=");
    }

    #[test_case("1XY" ; "adjacent variables")]
    #[test_case("X1X" ; "repeated variable")]
    #[test_case("1a" ; "unknown symbol")]
    fn test_reject_pattern(text: &str) {
        assert!(Pattern::parse(text, &symbols()).is_err());
    }

    #[test]
    fn test_adjacent_variables_error() {
        assert_eq!(
            Pattern::parse("=XY", &symbols()),
            Err(ConfigError::AdjacentVariables {
                pattern: "=XY".to_string(),
                first: 'X',
                second: 'Y'
            })
        );
    }

    #[test]
    fn test_parse_template_merges_literals() {
        let template = Template::parse("11X*0Yb", &symbols());

        assert_eq!(
            template.tokens(),
            &[
                TemplateToken::Literal("11".to_string()),
                TemplateToken::Variable('X'),
                TemplateToken::Literal("*0".to_string()),
                TemplateToken::Variable('Y'),
                TemplateToken::Literal("b".to_string()),
            ]
        );
        assert_eq!(template.to_string(), "11X*0Yb");
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        // The value of X contains the name of Y, which must not be replaced again.
        let template = Template::parse("XY", &symbols());
        let result = template.substitute(|variable| match variable {
            'X' => Some("Y1"),
            'Y' => Some("0"),
            _ => None,
        });

        assert_eq!(result, Ok("Y10".to_string()));
    }

    #[test]
    fn test_substitute_unbound() {
        let template = Template::parse("1Y", &symbols());
        assert_eq!(template.substitute(|_| None), Err('Y'));
    }
}
