//! The closed set of validation diagnostic codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its short-id prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Structural errors, prefixed with `E`.
    Error,
    /// Style and intent warnings, prefixed with `W`.
    Warning,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// Identifies the kind of problem a [`Diagnostic`](crate::Diagnostic) reports.
///
/// Displayed in `SCREAMING_SNAKE_CASE` (e.g. `MISSING_ENDMODULE`), which is also
/// the serialized form. [`short_id`](Self::short_id) gives a compact `E104`-style id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// A `module` keyword appeared while already inside a module.
    NestedModule,
    /// A `module` keyword was not followed by a usable identifier.
    InvalidModuleName,
    /// A module header line has no `(` port list.
    MissingPortList,
    /// An `endmodule` appeared outside of any module.
    UnmatchedEndmodule,
    /// A statement or declaration is not terminated by `;`.
    MissingSemicolon,
    /// An `assign` statement has no `=`.
    MissingAssignment,
    /// An `always` line has neither an `@` event control nor `begin`.
    InvalidAlwaysBlock,
    /// The source ended while still inside a module.
    MissingEndmodule,
    /// `[` and `]` are not balanced.
    UnmatchedBrackets,
    /// `(` and `)` are not balanced.
    UnmatchedParentheses,
    /// `begin` and `end` are not balanced.
    UnmatchedBeginEnd,
    /// The source ended inside a `case` statement.
    MissingEndcase,
    /// An always block uses `@(*)` or `@*`.
    ImplicitSensitivity,
}

impl DiagnosticCode {
    /// Every code, in short-id order.
    pub const ALL: [DiagnosticCode; 13] = [
        DiagnosticCode::NestedModule,
        DiagnosticCode::InvalidModuleName,
        DiagnosticCode::MissingPortList,
        DiagnosticCode::UnmatchedEndmodule,
        DiagnosticCode::MissingSemicolon,
        DiagnosticCode::MissingAssignment,
        DiagnosticCode::InvalidAlwaysBlock,
        DiagnosticCode::MissingEndmodule,
        DiagnosticCode::UnmatchedBrackets,
        DiagnosticCode::UnmatchedParentheses,
        DiagnosticCode::UnmatchedBeginEnd,
        DiagnosticCode::MissingEndcase,
        DiagnosticCode::ImplicitSensitivity,
    ];

    /// Returns the stable textual name of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::NestedModule => "NESTED_MODULE",
            DiagnosticCode::InvalidModuleName => "INVALID_MODULE_NAME",
            DiagnosticCode::MissingPortList => "MISSING_PORT_LIST",
            DiagnosticCode::UnmatchedEndmodule => "UNMATCHED_ENDMODULE",
            DiagnosticCode::MissingSemicolon => "MISSING_SEMICOLON",
            DiagnosticCode::MissingAssignment => "MISSING_ASSIGNMENT",
            DiagnosticCode::InvalidAlwaysBlock => "INVALID_ALWAYS_BLOCK",
            DiagnosticCode::MissingEndmodule => "MISSING_ENDMODULE",
            DiagnosticCode::UnmatchedBrackets => "UNMATCHED_BRACKETS",
            DiagnosticCode::UnmatchedParentheses => "UNMATCHED_PARENTHESES",
            DiagnosticCode::UnmatchedBeginEnd => "UNMATCHED_BEGIN_END",
            DiagnosticCode::MissingEndcase => "MISSING_ENDCASE",
            DiagnosticCode::ImplicitSensitivity => "IMPLICIT_SENSITIVITY",
        }
    }

    /// Returns the category this code belongs to.
    pub fn category(self) -> Category {
        match self {
            DiagnosticCode::ImplicitSensitivity => Category::Warning,
            _ => Category::Error,
        }
    }

    /// Returns a compact identifier such as `E108` or `W201`.
    pub fn short_id(self) -> String {
        let number = match self {
            DiagnosticCode::NestedModule => 101,
            DiagnosticCode::InvalidModuleName => 102,
            DiagnosticCode::MissingPortList => 103,
            DiagnosticCode::UnmatchedEndmodule => 104,
            DiagnosticCode::MissingSemicolon => 105,
            DiagnosticCode::MissingAssignment => 106,
            DiagnosticCode::InvalidAlwaysBlock => 107,
            DiagnosticCode::MissingEndmodule => 108,
            DiagnosticCode::UnmatchedBrackets => 109,
            DiagnosticCode::UnmatchedParentheses => 110,
            DiagnosticCode::UnmatchedBeginEnd => 111,
            DiagnosticCode::MissingEndcase => 112,
            DiagnosticCode::ImplicitSensitivity => 201,
        };
        format!("{}{number:03}", self.category().prefix())
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Error.prefix(), 'E');
        assert_eq!(Category::Warning.prefix(), 'W');
    }

    #[test]
    fn display_uses_stable_name() {
        assert_eq!(DiagnosticCode::MissingEndmodule.to_string(), "MISSING_ENDMODULE");
        assert_eq!(DiagnosticCode::UnmatchedBeginEnd.to_string(), "UNMATCHED_BEGIN_END");
    }

    #[test]
    fn short_ids() {
        assert_eq!(DiagnosticCode::NestedModule.short_id(), "E101");
        assert_eq!(DiagnosticCode::MissingEndcase.short_id(), "E112");
        assert_eq!(DiagnosticCode::ImplicitSensitivity.short_id(), "W201");
    }

    #[test]
    fn serde_name_matches_display() {
        for code in DiagnosticCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{code}\""));
            let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, code);
        }
    }

    #[test]
    fn only_implicit_sensitivity_is_a_warning() {
        let warnings: Vec<_> = DiagnosticCode::ALL
            .iter()
            .filter(|c| c.category() == Category::Warning)
            .collect();
        assert_eq!(warnings, vec![&DiagnosticCode::ImplicitSensitivity]);
    }
}
