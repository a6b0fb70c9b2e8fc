use std::fmt;

use ahash::AHashSet;
use itertools::Itertools;

/// The role of a single symbol with respect to a [SymbolTable].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Literal,
    Variable,
    Invalid,
}

/// A finite set of single character symbols that remembers its declaration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolSet {
    ordered: Vec<char>,
    members: AHashSet<char>,
}

impl SymbolSet {
    /// Creates a set from the given symbols, duplicates are ignored.
    pub fn new(symbols: impl IntoIterator<Item = char>) -> SymbolSet {
        let mut result = SymbolSet::default();
        for symbol in symbols {
            if result.members.insert(symbol) {
                result.ordered.push(symbol);
            }
        }
        result
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.members.contains(&symbol)
    }

    /// Returns the symbols in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.ordered.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Returns the first character of `text` that is not in this set.
    pub fn first_foreign(&self, text: &str) -> Option<char> {
        text.chars().find(|c| !self.contains(*c))
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.ordered.iter().format(", "))
    }
}

/// The alphabet and the variable set of a canonical system.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    alphabet: SymbolSet,
    variables: SymbolSet,
}

impl SymbolTable {
    pub fn new(alphabet: SymbolSet, variables: SymbolSet) -> SymbolTable {
        SymbolTable { alphabet, variables }
    }

    /// Classifies the given symbol. Declared variables take precedence over
    /// alphabet symbols with the same character.
    pub fn classify(&self, symbol: char) -> SymbolKind {
        if self.variables.contains(symbol) {
            SymbolKind::Variable
        } else if self.alphabet.contains(symbol) {
            SymbolKind::Literal
        } else {
            SymbolKind::Invalid
        }
    }

    pub fn alphabet(&self) -> &SymbolSet {
        &self.alphabet
    }

    pub fn variables(&self) -> &SymbolSet {
        &self.variables
    }
}
