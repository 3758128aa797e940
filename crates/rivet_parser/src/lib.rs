//! Front end for a small Verilog subset.
//!
//! Three independent entry points share the same line/column model:
//!
//! - [`tokenize`] turns source text into a flat [`Token`] stream.
//! - [`parse_module`] recovers the structure of the first module into a
//!   [`rivet_ir::Module`], or returns `None` if no module name is found.
//! - [`parse_verilog`] is a stricter line-oriented pass that reports
//!   structural problems as [`rivet_diagnostics::Diagnostic`]s.
//!
//! The validator re-scans raw lines rather than tokens, so it may disagree
//! with the structural parser about the same text.

#![warn(missing_docs)]

pub mod lexer;
pub mod literal;
pub mod parser;
pub mod token;
pub mod validator;

pub use lexer::tokenize;
pub use literal::{fold_constant, parse_literal};
pub use parser::parse_module;
pub use token::{lookup_keyword, Keyword, Token, TokenKind};
pub use validator::{parse_verilog, AlwaysHeader, ValidationReport};
