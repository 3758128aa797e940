//! Token types produced by the lexer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed keyword set.
///
/// Other Verilog reserved words (`signed`, `or`, `initial`, `casex`, ...) lex as
/// identifiers; the parser recognises the few it cares about by text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keyword {
    /// `module`
    Module,
    /// `endmodule`
    Endmodule,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
    /// `wire`
    Wire,
    /// `reg`
    Reg,
    /// `always`
    Always,
    /// `assign`
    Assign,
    /// `if`
    If,
    /// `else`
    Else,
    /// `begin`
    Begin,
    /// `end`
    End,
    /// `posedge`
    Posedge,
    /// `negedge`
    Negedge,
    /// `parameter`
    Parameter,
    /// `localparam`
    Localparam,
    /// `case`
    Case,
    /// `endcase`
    Endcase,
    /// `default`
    Default,
    /// `function`
    Function,
    /// `endfunction`
    Endfunction,
    /// `task`
    Task,
    /// `endtask`
    Endtask,
    /// `for`
    For,
    /// `while`
    While,
    /// `repeat`
    Repeat,
    /// `forever`
    Forever,
}

impl Keyword {
    /// Returns the source spelling of this keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Module => "module",
            Keyword::Endmodule => "endmodule",
            Keyword::Input => "input",
            Keyword::Output => "output",
            Keyword::Inout => "inout",
            Keyword::Wire => "wire",
            Keyword::Reg => "reg",
            Keyword::Always => "always",
            Keyword::Assign => "assign",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Begin => "begin",
            Keyword::End => "end",
            Keyword::Posedge => "posedge",
            Keyword::Negedge => "negedge",
            Keyword::Parameter => "parameter",
            Keyword::Localparam => "localparam",
            Keyword::Case => "case",
            Keyword::Endcase => "endcase",
            Keyword::Default => "default",
            Keyword::Function => "function",
            Keyword::Endfunction => "endfunction",
            Keyword::Task => "task",
            Keyword::Endtask => "endtask",
            Keyword::For => "for",
            Keyword::While => "while",
            Keyword::Repeat => "repeat",
            Keyword::Forever => "forever",
        }
    }

    /// Returns `true` for `input`, `output`, and `inout`.
    pub fn is_direction(self) -> bool {
        matches!(self, Keyword::Input | Keyword::Output | Keyword::Inout)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Looks up a keyword. Keywords are case-sensitive.
pub fn lookup_keyword(s: &str) -> Option<Keyword> {
    match s {
        "module" => Some(Keyword::Module),
        "endmodule" => Some(Keyword::Endmodule),
        "input" => Some(Keyword::Input),
        "output" => Some(Keyword::Output),
        "inout" => Some(Keyword::Inout),
        "wire" => Some(Keyword::Wire),
        "reg" => Some(Keyword::Reg),
        "always" => Some(Keyword::Always),
        "assign" => Some(Keyword::Assign),
        "if" => Some(Keyword::If),
        "else" => Some(Keyword::Else),
        "begin" => Some(Keyword::Begin),
        "end" => Some(Keyword::End),
        "posedge" => Some(Keyword::Posedge),
        "negedge" => Some(Keyword::Negedge),
        "parameter" => Some(Keyword::Parameter),
        "localparam" => Some(Keyword::Localparam),
        "case" => Some(Keyword::Case),
        "endcase" => Some(Keyword::Endcase),
        "default" => Some(Keyword::Default),
        "function" => Some(Keyword::Function),
        "endfunction" => Some(Keyword::Endfunction),
        "task" => Some(Keyword::Task),
        "endtask" => Some(Keyword::Endtask),
        "for" => Some(Keyword::For),
        "while" => Some(Keyword::While),
        "repeat" => Some(Keyword::Repeat),
        "forever" => Some(Keyword::Forever),
        _ => None,
    }
}

/// The class of a lexed token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(tag = "class", content = "keyword", rename_all = "lowercase")]
pub enum TokenKind {
    /// A member of the fixed keyword set.
    Keyword(Keyword),
    /// `[A-Za-z_][A-Za-z0-9_$]*`, or a `$system` name.
    Identifier,
    /// Decimal or sized literal such as `42` or `4'b1010`.
    Number,
    /// Operators and punctuation: `<=`, `&&`, `;`, `(`, `@`, ...
    Operator,
    /// A double-quoted string, quotes included.
    String,
    /// A `//` or `/* */` comment, delimiters included.
    Comment,
}

/// A lexed token with its 1-based source position.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token class.
    pub kind: TokenKind,
    /// The exact source text.
    pub text: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column of the first character.
    pub column: u32,
}

impl Token {
    /// Returns `true` if this token is the given keyword.
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// Returns `true` if this is an operator or punctuation token with the given text.
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Returns the keyword, if this token is one.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_case_sensitive() {
        assert_eq!(lookup_keyword("module"), Some(Keyword::Module));
        assert_eq!(lookup_keyword("Module"), None);
        assert_eq!(lookup_keyword("signed"), None);
    }

    #[test]
    fn spelling_roundtrips() {
        for word in [
            "module", "endmodule", "input", "output", "inout", "wire", "reg", "always",
            "assign", "if", "else", "begin", "end", "posedge", "negedge", "parameter",
            "localparam", "case", "endcase", "default", "function", "endfunction", "task",
            "endtask", "for", "while", "repeat", "forever",
        ] {
            let kw = lookup_keyword(word).unwrap();
            assert_eq!(kw.as_str(), word);
        }
    }

    #[test]
    fn direction_predicate() {
        assert!(Keyword::Inout.is_direction());
        assert!(!Keyword::Wire.is_direction());
    }

    #[test]
    fn token_predicates() {
        let tok = Token {
            kind: TokenKind::Operator,
            text: "<=".into(),
            line: 1,
            column: 3,
        };
        assert!(tok.is_op("<="));
        assert!(!tok.is_op("="));
        assert_eq!(tok.keyword(), None);
    }

    #[test]
    fn kind_json_shape() {
        let json = serde_json::to_value(TokenKind::Keyword(Keyword::Always)).unwrap();
        assert_eq!(json["class"], "keyword");
        assert_eq!(json["keyword"], "always");
        let json = serde_json::to_value(TokenKind::Identifier).unwrap();
        assert_eq!(json["class"], "identifier");
    }
}
