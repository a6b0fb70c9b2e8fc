#![forbid(unsafe_code)]

use std::fmt;

use log::warn;

use crate::ConfigError;
use crate::Pattern;
use crate::RewriteOptions;
use crate::Rewriter;
use crate::RunResult;
use crate::SymbolKind;
use crate::SymbolSet;
use crate::SymbolTable;
use crate::Template;

/// A production rule `pattern -> template`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pattern: Pattern,
    template: Template,
}

impl Rule {
    /// Creates a rule, every variable of the template must occur in the pattern.
    pub fn new(pattern: &str, template: &str, symbols: &SymbolTable) -> Result<Rule, ConfigError> {
        let pattern = Pattern::parse(pattern, symbols)?;
        let template = Template::parse(template, symbols);

        if let Some(variable) = template
            .variables()
            .find(|variable| !pattern.variables().any(|bound| bound == *variable))
        {
            return Err(ConfigError::UnboundTemplateVariable {
                rule: format!("{pattern} -> {template}"),
                variable,
            });
        }

        Ok(Rule { pattern, template })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn template(&self) -> &Template {
        &self.template
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.pattern, self.template)
    }
}

/// Values for the variables of the axiom. Binding a variable twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBindings {
    entries: Vec<(char, String)>,
}

impl InputBindings {
    pub fn new() -> InputBindings {
        InputBindings::default()
    }

    /// Binds the variable to the given value, replacing an earlier binding.
    pub fn insert(&mut self, variable: char, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(bound, _)| *bound == variable) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((variable, value)),
        }
    }

    pub fn get(&self, variable: char) -> Option<&str> {
        self.entries
            .iter()
            .find(|(bound, _)| *bound == variable)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.entries.iter().map(|(variable, value)| (*variable, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(char, S)> for InputBindings {
    fn from_iter<T: IntoIterator<Item = (char, S)>>(iter: T) -> Self {
        let mut result = InputBindings::new();
        for (variable, value) in iter {
            result.insert(variable, value);
        }
        result
    }
}

/// A canonical system: an alphabet, a set of variables, an axiom template and
/// an ordered list of rules. Immutable once constructed, a single system can
/// be shared by any number of runs.
#[derive(Debug, Clone)]
pub struct CanonicalSystem {
    symbols: SymbolTable,
    axiom: Template,
    rules: Vec<Rule>,
}

impl CanonicalSystem {
    /// Creates a canonical system, the rules are kept in the given order
    /// which is also their priority.
    pub fn new(
        alphabet: impl IntoIterator<Item = char>,
        variables: impl IntoIterator<Item = char>,
        axiom: &str,
        rules: &[(impl AsRef<str>, impl AsRef<str>)],
    ) -> Result<CanonicalSystem, ConfigError> {
        let symbols = SymbolTable::new(SymbolSet::new(alphabet), SymbolSet::new(variables));

        if let Some(symbol) = axiom
            .chars()
            .find(|symbol| symbols.classify(*symbol) == SymbolKind::Invalid)
        {
            return Err(ConfigError::UnknownSymbol {
                symbol,
                context: format!("axiom \"{axiom}\""),
            });
        }

        let rules = rules
            .iter()
            .map(|(pattern, template)| Rule::new(pattern.as_ref(), template.as_ref(), &symbols))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CanonicalSystem {
            axiom: Template::parse(axiom, &symbols),
            symbols,
            rules,
        })
    }

    pub fn alphabet(&self) -> &SymbolSet {
        self.symbols.alphabet()
    }

    pub fn variables(&self) -> &SymbolSet {
        self.symbols.variables()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn axiom(&self) -> &Template {
        &self.axiom
    }

    /// Returns the rules in priority order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Substitutes the input bindings into the axiom, which yields the
    /// initial working string.
    pub fn initial_string(&self, inputs: &InputBindings) -> Result<String, ConfigError> {
        for (variable, value) in inputs.iter() {
            if !self.variables().contains(variable) {
                return Err(ConfigError::UndeclaredVariable(variable));
            }

            if let Some(symbol) = self.alphabet().first_foreign(value) {
                return Err(ConfigError::InvalidInputSymbol { variable, symbol });
            }

            if !self.axiom.variables().any(|used| used == variable) {
                warn!("Input binding for variable '{variable}' is not used by the axiom");
            }
        }

        let initial = self
            .axiom
            .substitute(|variable| inputs.get(variable))
            .map_err(ConfigError::UnboundAxiomVariable)?;

        debug_assert!(
            self.alphabet().first_foreign(&initial).is_none(),
            "The axiom literals and input values are checked against the alphabet"
        );
        Ok(initial)
    }

    /// Rewrites the axiom instantiated with the given inputs until termination.
    pub fn rewrite(&self, inputs: &InputBindings, options: &RewriteOptions) -> Result<RunResult, ConfigError> {
        let initial = self.initial_string(inputs)?;
        Ok(Rewriter::new(self, initial, options)?.run())
    }
}

impl fmt::Display for CanonicalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "alphabet: {}", self.alphabet())?;
        writeln!(f, "variables: {}", self.variables())?;
        writeln!(f, "axiom: {}", self.axiom)?;
        for (index, rule) in self.rules.iter().enumerate() {
            writeln!(f, "rule {}: {rule}", index + 1)?;
        }
        Ok(())
    }
}
