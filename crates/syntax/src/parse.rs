use std::fs;
use std::path::Path;

use log::warn;
use pest::Parser;
use pest_derive::Parser;

use canon_engine::CanonicalSystem;
use canon_engine::ConfigError;
use canon_engine::InputBindings;
use canon_engine::OutputMarker;
use canon_engine::RewriteOptions;
use canon_utilities::CanonError;

use crate::RuleSyntax;
use crate::Section;
use crate::SectionName;
use crate::SyntaxError;
use crate::SystemSyntax;

#[derive(Parser)]
#[grammar = "canon_grammar.pest"]
pub struct CanonParser;

/// Loads the description of a canonical system from the given file.
pub fn load_system_from_file(path: impl AsRef<Path>) -> Result<SystemSyntax, CanonError> {
    let contents = fs::read_to_string(path)?;
    SystemSyntax::parse(&contents)
}

impl SystemSyntax {
    /// Parses the section based description of a canonical system.
    ///
    /// Unknown sections are ignored with a warning, a known section may occur
    /// at most once.
    pub fn parse(text: &str) -> Result<SystemSyntax, CanonError> {
        let mut result = CanonParser::parse(Rule::System, text)?;
        let root = result.next().ok_or("Could not parse canonical system description")?;

        let mut sections: Vec<Section> = Vec::new();
        for pair in root.into_inner() {
            if pair.as_rule() != Rule::Section {
                continue;
            }

            let (line, _) = pair.as_span().start_pos().line_col();
            let mut children = pair.into_inner();
            let name = children.next().ok_or("Section without a name")?;
            let items = children.next().ok_or("Section without items")?;

            let Some(section) = SectionName::from_name(name.as_str()) else {
                warn!("Ignoring unknown section {} on line {line}", name.as_str());
                continue;
            };

            if let Some(previous) = sections.iter().find(|existing| existing.name == section) {
                return Err(SyntaxError::DuplicateSection {
                    section,
                    line,
                    previous: previous.line,
                }
                .into());
            }

            sections.push(Section {
                name: section,
                items: items
                    .into_inner()
                    .map(|item| item.as_str().trim())
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
                line,
            });
        }

        Ok(SystemSyntax { sections })
    }

    /// Returns the axiom, which is the first item of the `A1` section.
    pub fn axiom(&self) -> Result<&str, SyntaxError> {
        let section = self.required(SectionName::Axiom)?;
        let axiom = section
            .items
            .first()
            .ok_or(SyntaxError::EmptySection(SectionName::Axiom))?;

        if section.items.len() > 1 {
            warn!("Section {} has {} items, only the first is used as axiom", section.name, section.items.len());
        }

        Ok(axiom.as_str())
    }

    /// Returns the rules in the order of declaration.
    pub fn rules(&self) -> Result<Vec<RuleSyntax>, SyntaxError> {
        self.required(SectionName::Rules)?
            .items
            .iter()
            .map(|item| parse_rule(item))
            .collect()
    }

    /// Constructs the canonical system from the `A`, `X`, `A1` and `R` sections.
    pub fn to_canonical_system(&self) -> Result<CanonicalSystem, CanonError> {
        if let Some(name) = SectionName::ALL
            .into_iter()
            .find(|name| name.is_required() && self.section(*name).is_none())
        {
            return Err(SyntaxError::MissingSection(name).into());
        }

        let alphabet = self.symbols(SectionName::Alphabet)?;
        let variables = self.symbols(SectionName::Variables)?;
        let rules: Vec<(String, String)> = self
            .rules()?
            .into_iter()
            .map(|rule| (rule.pattern, rule.template))
            .collect();

        Ok(CanonicalSystem::new(alphabet, variables, self.axiom()?, &rules)?)
    }

    /// Returns the bindings of the `INPUT` section, which are empty when the
    /// section is absent.
    pub fn to_input_bindings(&self) -> Result<InputBindings, SyntaxError> {
        let mut result = InputBindings::new();

        if let Some(section) = self.section(SectionName::Input) {
            for item in &section.items {
                let (variable, value) = parse_binding(item)?;
                result.insert(variable, value);
            }
        }

        Ok(result)
    }

    /// Returns the options given by the `STEPS` and `OUTPUT` sections.
    pub fn to_rewrite_options(&self) -> Result<RewriteOptions, CanonError> {
        let mut options = RewriteOptions::default();

        if let Some(section) = self.section(SectionName::Steps) {
            let [item] = section.items.as_slice() else {
                return Err(SyntaxError::InvalidStepLimit(section.items.join(", ")).into());
            };

            let max_steps: usize = item
                .parse()
                .map_err(|_| SyntaxError::InvalidStepLimit(item.clone()))?;
            if max_steps == 0 {
                return Err(ConfigError::InvalidStepLimit.into());
            }

            options = options.with_max_steps(max_steps);
        }

        if let Some(section) = self.section(SectionName::Output) {
            options = options.with_marker(parse_marker(&section.items)?);
        }

        Ok(options)
    }

    fn required(&self, name: SectionName) -> Result<&Section, SyntaxError> {
        self.section(name).ok_or(SyntaxError::MissingSection(name))
    }

    fn symbols(&self, name: SectionName) -> Result<Vec<char>, SyntaxError> {
        self.required(name)?
            .items
            .iter()
            .map(|item| {
                single_char(item).ok_or_else(|| SyntaxError::MultiCharacterSymbol {
                    section: name,
                    item: item.clone(),
                })
            })
            .collect()
    }
}

/// Splits a rule item `pattern -> template`, either side may be empty.
pub fn parse_rule(item: &str) -> Result<RuleSyntax, SyntaxError> {
    let (pattern, template) = item
        .split_once("->")
        .ok_or_else(|| SyntaxError::MalformedRule(item.to_string()))?;

    Ok(RuleSyntax {
        pattern: pattern.trim().to_string(),
        template: template.trim().to_string(),
    })
}

/// Parses an input binding `VAR = VALUE`, the value may be empty.
pub fn parse_binding(item: &str) -> Result<(char, String), SyntaxError> {
    item.split_once('=')
        .and_then(|(variable, value)| Some((single_char(variable.trim())?, value.trim().to_string())))
        .ok_or_else(|| SyntaxError::MalformedBinding(item.to_string()))
}

/// Parses the three items `OPEN, SYMBOL, CLOSE` of an output marker.
pub fn parse_marker(items: &[impl AsRef<str>]) -> Result<OutputMarker, SyntaxError> {
    let symbols: Vec<char> = items.iter().filter_map(|item| single_char(item.as_ref().trim())).collect();

    match (items.len(), symbols.as_slice()) {
        (3, [open, symbol, close]) => Ok(OutputMarker::new(*open, *symbol, *close)),
        _ => Err(SyntaxError::MalformedMarker(
            items.iter().map(|item| item.as_ref()).collect::<Vec<_>>().join(", "),
        )),
    }
}

/// Returns the character of a string consisting of exactly one character.
fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Some(symbol),
        _ => None,
    }
}
