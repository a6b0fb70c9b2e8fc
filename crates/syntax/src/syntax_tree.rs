use std::fmt;

/// The sections that a description of a canonical system may contain.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum SectionName {
    /// `A`: the alphabet.
    Alphabet,
    /// `X`: the variables.
    Variables,
    /// `A1`: the axiom.
    Axiom,
    /// `R`: the rules, in priority order.
    Rules,
    /// `INPUT`: the values of the axiom variables.
    Input,
    /// `STEPS`: the step bound.
    Steps,
    /// `OUTPUT`: the output marker.
    Output,
}

impl SectionName {
    /// All sections in the order in which they are printed.
    pub const ALL: [SectionName; 7] = [
        SectionName::Alphabet,
        SectionName::Variables,
        SectionName::Axiom,
        SectionName::Rules,
        SectionName::Input,
        SectionName::Steps,
        SectionName::Output,
    ];

    /// Returns the section with the given name, if it is known.
    pub fn from_name(name: &str) -> Option<SectionName> {
        SectionName::ALL
            .into_iter()
            .find(|section| section.keyword() == name)
    }

    /// The keyword of the section as written in the description.
    pub fn keyword(&self) -> &'static str {
        match self {
            SectionName::Alphabet => "A",
            SectionName::Variables => "X",
            SectionName::Axiom => "A1",
            SectionName::Rules => "R",
            SectionName::Input => "INPUT",
            SectionName::Steps => "STEPS",
            SectionName::Output => "OUTPUT",
        }
    }

    /// Returns true iff a description must contain this section.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            SectionName::Alphabet | SectionName::Variables | SectionName::Axiom | SectionName::Rules
        )
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A single `NAME = { item, ... }` block. Items are trimmed and empty items
/// have been removed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Section {
    pub name: SectionName,
    pub items: Vec<String>,
    /// The line on which the section starts.
    pub line: usize,
}

/// A rule item `pattern -> template` split into its two sides.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RuleSyntax {
    pub pattern: String,
    pub template: String,
}

/// The untyped description of a canonical system, as it was read from the
/// input. Use the conversion functions to obtain the engine values.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SystemSyntax {
    pub(crate) sections: Vec<Section>,
}

impl SystemSyntax {
    /// Returns the section with the given name, if present.
    pub fn section(&self, name: SectionName) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Returns the known sections in the order they were read.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}
