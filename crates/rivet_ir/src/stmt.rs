//! Procedural statements inside always blocks.
//!
//! Expressions are kept as space-joined token text; the simulator evaluates them
//! lazily against the current signal state.

use crate::ids::StmtId;
use serde::{Deserialize, Serialize};

/// One arm of a `case` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseArm {
    /// Label expressions; the arm matches if any equals the subject.
    pub labels: Vec<String>,
    /// Statements executed when the arm matches.
    pub body: Vec<StmtId>,
}

/// A procedural statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    /// `target = expr;` or `target <= expr;`
    Assign {
        /// The assigned signal name.
        target: String,
        /// Right-hand side expression text.
        expr: String,
        /// `true` for `=`, `false` for `<=`.
        blocking: bool,
        /// 1-based source line.
        line: u32,
    },
    /// `if (condition) ... else ...`
    If {
        /// Condition expression text.
        condition: String,
        /// Taken when the condition is nonzero.
        then_body: Vec<StmtId>,
        /// Taken otherwise; empty when there is no `else`.
        else_body: Vec<StmtId>,
    },
    /// `case (subject) ... endcase`
    Case {
        /// Subject expression text.
        subject: String,
        /// Labelled arms in source order.
        arms: Vec<CaseArm>,
        /// The `default:` arm; empty when absent.
        default: Vec<StmtId>,
    },
}

impl Statement {
    /// Returns the assignment target, if this is an assignment.
    pub fn target(&self) -> Option<&str> {
        match self {
            Statement::Assign { target, .. } => Some(target),
            _ => None,
        }
    }
}
