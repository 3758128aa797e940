//! `rivet lex`: print the token stream of a source file.

use rivet_parser::{tokenize, Token, TokenKind};

use crate::pipeline::read_source;
use crate::{GlobalArgs, LexArgs, ReportFormat};

/// Runs the `rivet lex` command.
pub fn run(args: &LexArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let source = read_source(&args.file)?;
    let tokens = tokenize(&source);

    match args.format {
        ReportFormat::Text => print!("{}", render_tokens(&tokens)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&tokens)?),
    }
    if !global.quiet {
        eprintln!("   Lexed {} tokens from {}", tokens.len(), args.file.display());
    }
    Ok(0)
}

/// One `line:col  kind  text` row per token.
fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let position = format!("{}:{}", token.line, token.column);
        out.push_str(&format!(
            "{position:<8} {:<10} {}\n",
            kind_label(token.kind),
            token.text
        ));
    }
    out
}

fn kind_label(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Keyword(_) => "keyword",
        TokenKind::Identifier => "ident",
        TokenKind::Number => "number",
        TokenKind::Operator => "operator",
        TokenKind::String => "string",
        TokenKind::Comment => "comment",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn renders_one_row_per_token() {
        let out = render_tokens(&tokenize("module m;\n  wire w; // note"));
        let rows: Vec<&str> = out.lines().collect();
        assert_eq!(rows.len(), 7);
        assert!(rows[0].starts_with("1:1"));
        assert!(rows[0].contains("keyword"));
        assert!(rows[0].ends_with("module"));
        assert!(rows[3].starts_with("2:3"));
        assert!(rows[6].contains("comment"));
        assert!(rows[6].ends_with("// note"));
    }

    #[test]
    fn run_on_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.v");
        fs::write(&path, "module m(); endmodule\n").unwrap();
        let args = LexArgs {
            file: path,
            format: ReportFormat::Json,
        };
        assert_eq!(run(&args, &GlobalArgs::for_tests()).unwrap(), 0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let args = LexArgs {
            file: "/nonexistent/m.v".into(),
            format: ReportFormat::Text,
        };
        assert!(run(&args, &GlobalArgs::for_tests()).is_err());
    }
}
