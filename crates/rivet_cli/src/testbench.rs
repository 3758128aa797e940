//! `rivet testbench`: generate a testbench skeleton for a module.

use rivet_testbench::generate_testbench;

use crate::pipeline::{read_source, require_module, write_output};
use crate::{GlobalArgs, TestbenchArgs};

/// Runs the `rivet testbench` command.
pub fn run(args: &TestbenchArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let source = read_source(&args.file)?;
    let module = require_module(&source, &args.file)?;
    let testbench = generate_testbench(&module);
    write_output(args.output.as_deref(), &testbench)?;

    if !global.quiet {
        if let Some(path) = &args.output {
            eprintln!("   Wrote {}_tb to {}", module.name, path.display());
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn writes_testbench_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("counter.v");
        let out = dir.path().join("counter_tb.v");
        fs::write(
            &src,
            "module counter(input clk, input rst_n, output reg [3:0] count);\nendmodule\n",
        )
        .unwrap();
        let args = TestbenchArgs {
            file: src,
            output: Some(out.clone()),
        };
        assert_eq!(run(&args, &GlobalArgs::for_tests()).unwrap(), 0);

        let tb = fs::read_to_string(&out).unwrap();
        assert!(tb.contains("module counter_tb;"));
        assert!(tb.contains("counter uut ("));
        assert!(tb.contains("forever #5 clk = ~clk;"));
        assert!(tb.trim_end().ends_with("endmodule"));
    }
}
