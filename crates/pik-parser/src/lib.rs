mod constants;
mod lexer;
mod parser;

pub use constants::{constant_value, evaluate_constant_args};
pub use parser::{parse_arguments, parse_script, MAX_NESTING};
