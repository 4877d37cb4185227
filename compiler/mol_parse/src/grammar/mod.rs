//! Grammar productions.
//!
//! Each module extends `Parser` with methods for one family of productions:
//!
//! - [`stmt`]: statements and `end`-terminated blocks
//! - [`expr`]: the precedence ladder, postfix access, primaries
//! - [`pattern`]: `match` arm patterns
//! - [`fstring`]: interpolated string literals

mod expr;
mod fstring;
mod pattern;
mod stmt;
