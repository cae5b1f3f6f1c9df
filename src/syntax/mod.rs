// Reading formulas from text.

mod notation;
mod parser;

pub use notation::convert_notation;
pub use parser::{parse_closed_wff, parse_wff};
