use std::fmt;

use itertools::Itertools;

use crate::RuleSyntax;
use crate::Section;
use crate::SectionName;
use crate::SystemSyntax;

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {{{}}}", self.name, self.items.iter().format(", "))
    }
}

impl fmt::Display for RuleSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.pattern, self.template)
    }
}

/// Prints one section per line, in canonical section order.
impl fmt::Display for SystemSyntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for name in SectionName::ALL {
            if let Some(section) = self.section(name) {
                writeln!(f, "{section}")?;
            }
        }
        Ok(())
    }
}
