//! Always blocks and their event controls.

use crate::arena::Arena;
use crate::ids::StmtId;
use crate::stmt::Statement;
use serde::{Deserialize, Serialize};

/// A clock edge qualifier in a sensitivity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// `posedge`: 0 to 1.
    Posedge,
    /// `negedge`: 1 to 0.
    Negedge,
}

/// One entry of a sensitivity list after edge keywords are attached to their signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitivityItem {
    /// Edge qualifier, if any.
    pub edge: Option<Edge>,
    /// Signal name, or `*` for an implicit list.
    pub signal: String,
}

/// An `always` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlwaysBlock {
    /// Flat token list from the event control, e.g. `["posedge", "clk"]`.
    /// `or` and commas are not kept. `["*"]` for `@(*)` and `@*`.
    pub sensitivity_list: Vec<String>,
    /// Top-level statements of the body.
    pub body: Vec<StmtId>,
    /// 1-based line of the `always` keyword.
    pub source_line: u32,
}

impl AlwaysBlock {
    /// Returns `true` for `@(*)` or `@*`.
    pub fn is_implicit(&self) -> bool {
        self.sensitivity_list.iter().any(|s| s == "*")
    }

    /// Pairs edge keywords with the signal that follows them.
    pub fn sensitivity(&self) -> Vec<SensitivityItem> {
        let mut items = Vec::new();
        let mut pending = None;
        for word in &self.sensitivity_list {
            match word.as_str() {
                "posedge" => pending = Some(Edge::Posedge),
                "negedge" => pending = Some(Edge::Negedge),
                name => items.push(SensitivityItem {
                    edge: pending.take(),
                    signal: name.to_string(),
                }),
            }
        }
        items
    }

    /// Renders the body back into one flat string per top-level statement.
    pub fn statement_text(&self, stmts: &Arena<StmtId, Statement>) -> Vec<String> {
        self.body.iter().map(|&id| render(stmts, id)).collect()
    }
}

fn render(stmts: &Arena<StmtId, Statement>, id: StmtId) -> String {
    let Some(stmt) = stmts.try_get(id) else {
        return String::new();
    };
    match stmt {
        Statement::Assign {
            target,
            expr,
            blocking,
            ..
        } => {
            let op = if *blocking { "=" } else { "<=" };
            format!("{target} {op} {expr};")
        }
        Statement::If {
            condition,
            then_body,
            else_body,
        } => {
            let mut out = format!("if ({condition}) {}", render_body(stmts, then_body));
            if !else_body.is_empty() {
                out.push_str(" else ");
                out.push_str(&render_body(stmts, else_body));
            }
            out
        }
        Statement::Case {
            subject,
            arms,
            default,
        } => {
            let mut out = format!("case ({subject})");
            for arm in arms {
                out.push_str(&format!(" {}: {}", arm.labels.join(", "), render_body(stmts, &arm.body)));
            }
            if !default.is_empty() {
                out.push_str(&format!(" default: {}", render_body(stmts, default)));
            }
            out.push_str(" endcase");
            out
        }
    }
}

fn render_body(stmts: &Arena<StmtId, Statement>, body: &[StmtId]) -> String {
    match body {
        [single] => render(stmts, *single),
        _ => {
            let inner: Vec<String> = body.iter().map(|&id| render(stmts, id)).collect();
            format!("begin {} end", inner.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::CaseArm;

    fn assign(arena: &mut Arena<StmtId, Statement>, target: &str, expr: &str, blocking: bool) -> StmtId {
        arena.alloc(Statement::Assign {
            target: target.into(),
            expr: expr.into(),
            blocking,
            line: 1,
        })
    }

    #[test]
    fn sensitivity_pairs_edges() {
        let block = AlwaysBlock {
            sensitivity_list: vec!["posedge".into(), "clk".into(), "negedge".into(), "rst_n".into(), "en".into()],
            body: vec![],
            source_line: 1,
        };
        let items = block.sensitivity();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].edge, Some(Edge::Posedge));
        assert_eq!(items[0].signal, "clk");
        assert_eq!(items[1].edge, Some(Edge::Negedge));
        assert_eq!(items[2].edge, None);
        assert!(!block.is_implicit());
    }

    #[test]
    fn implicit_list() {
        let block = AlwaysBlock {
            sensitivity_list: vec!["*".into()],
            body: vec![],
            source_line: 1,
        };
        assert!(block.is_implicit());
    }

    #[test]
    fn statement_text_flattens_tree() {
        let mut arena = Arena::new();
        let a = assign(&mut arena, "q", "d", false);
        let b = assign(&mut arena, "q", "0", false);
        let cond = arena.alloc(Statement::If {
            condition: "en".into(),
            then_body: vec![a],
            else_body: vec![b],
        });
        let c = assign(&mut arena, "n", "n + 1", true);
        let block = AlwaysBlock {
            sensitivity_list: vec!["posedge".into(), "clk".into()],
            body: vec![cond, c],
            source_line: 1,
        };
        assert_eq!(
            block.statement_text(&arena),
            vec!["if (en) q <= d; else q <= 0;".to_string(), "n = n + 1;".to_string()]
        );
    }

    #[test]
    fn statement_text_case() {
        let mut arena = Arena::new();
        let a = assign(&mut arena, "y", "a", true);
        let b = assign(&mut arena, "y", "b", true);
        let d = assign(&mut arena, "y", "0", true);
        let case = arena.alloc(Statement::Case {
            subject: "sel".into(),
            arms: vec![
                CaseArm { labels: vec!["0".into()], body: vec![a] },
                CaseArm { labels: vec!["1".into(), "2".into()], body: vec![b] },
            ],
            default: vec![d],
        });
        let block = AlwaysBlock {
            sensitivity_list: vec!["*".into()],
            body: vec![case],
            source_line: 1,
        };
        assert_eq!(
            block.statement_text(&arena)[0],
            "case (sel) 0: y = a; 1, 2: y = b; default: y = 0; endcase"
        );
    }
}
