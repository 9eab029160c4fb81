//! Lexing and parsing of `@sh` directives embedded in shader source

mod call;
pub mod lexer;

pub use call::DirectiveCall;
pub use lexer::{lex, Span, Token};

/// Marker that starts every directive
pub const MARKER: &str = "@sh";
/// Prefix of all property directives
pub const PROPERTY_PREFIX: &str = "shProperty";
/// Prefix of all global-setting directives
pub const GLOBAL_SETTING_PREFIX: &str = "shGlobalSetting";
/// Opening command of a loop block
pub const FOREACH: &str = "shForeach";
/// Closing command of a loop block
pub const END_FOREACH: &str = "shEndForeach";
/// Token replaced by the loop index inside a foreach body
pub const ITERATION: &str = "@shIteration";
