#![forbid(unsafe_code)]

use std::fmt;

use regex::Regex;

/// Describes where the output value is found in a working string: a run of
/// `symbol` between the delimiters `open` and `close`, for example the ones
/// between `=` and `;` in `11*11=1111;`.
#[derive(Debug, Clone)]
pub struct OutputMarker {
    open: char,
    symbol: char,
    close: char,
    regex: Regex,
}

impl OutputMarker {
    pub fn new(open: char, symbol: char, close: char) -> OutputMarker {
        let expression = format!(
            "{}({}*){}",
            regex::escape(open.encode_utf8(&mut [0; 4])),
            regex::escape(symbol.encode_utf8(&mut [0; 4])),
            regex::escape(close.encode_utf8(&mut [0; 4]))
        );

        OutputMarker {
            open,
            symbol,
            close,
            regex: Regex::new(&expression).expect("Regex compilation should not fail"),
        }
    }

    /// Returns the run of output symbols of the leftmost occurrence of the
    /// marker, which may be empty, or `None` when the marker does not occur.
    pub fn extract<'t>(&self, text: &'t str) -> Option<&'t str> {
        let (_, [value]) = self.regex.captures(text)?.extract();
        Some(value)
    }

    pub fn open(&self) -> char {
        self.open
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn close(&self) -> char {
        self.close
    }
}

impl PartialEq for OutputMarker {
    fn eq(&self, other: &Self) -> bool {
        (self.open, self.symbol, self.close) == (other.open, other.symbol, other.close)
    }
}

impl Eq for OutputMarker {}

impl fmt::Display for OutputMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}*{}", self.open, self.symbol, self.close)
    }
}
