//! `rivet parse`: print the recovered module structure as JSON.

use crate::pipeline::{read_source, require_module};
use crate::{GlobalArgs, ParseArgs};

/// Runs the `rivet parse` command. Fails if the file has no module header.
pub fn run(args: &ParseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let source = read_source(&args.file)?;
    let module = require_module(&source, &args.file)?;
    println!("{}", serde_json::to_string_pretty(&module)?);
    if !global.quiet {
        eprintln!(
            "   Parsed module `{}`: {} ports, {} signals, {} always blocks, {} assigns",
            module.name,
            module.ports.len(),
            module.signals.len(),
            module.always_blocks.len(),
            module.assigns.len()
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_module_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("and2.v");
        fs::write(&path, "module and2(input a, input b, output y);\n  assign y = a & b;\nendmodule\n")
            .unwrap();
        let args = ParseArgs { file: path };
        assert_eq!(run(&args, &GlobalArgs::for_tests()).unwrap(), 0);
    }

    #[test]
    fn file_without_module_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.v");
        fs::write(&path, "// nothing here\n").unwrap();
        let err = run(&ParseArgs { file: path }, &GlobalArgs::for_tests()).unwrap_err();
        assert!(err.to_string().starts_with("no module found in"));
    }
}
