#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod applicator;
mod batch;
mod driver;
mod error;
mod extractor;
mod matcher;
mod pattern;
mod symbol;
mod system;

pub use applicator::*;
pub use batch::*;
pub use driver::*;
pub use error::*;
pub use extractor::*;
pub use matcher::*;
pub use pattern::*;
pub use symbol::*;
pub use system::*;
