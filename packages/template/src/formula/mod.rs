//! # Formulas
//!
//! Computed values embedded in grammar text as `{{% expression %}}`.
//!
//! ```text
//! source ──lexer──▶ tokens ──parser──▶ Expr ──eval(data)──▶ Value
//! ```

mod eval;
mod lexer;
mod parser;

pub use eval::{display_value, evaluate};
pub use lexer::{tokenize, Token};
pub use parser::{parse_formula, BinaryOp, Expr};
