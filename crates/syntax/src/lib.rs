#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

mod error;
mod parse;
mod syntax_tree;
mod syntax_tree_display;

pub use error::*;
pub use parse::*;
pub use syntax_tree::*;
