//! Testbench skeleton generation.
//!
//! [`generate_testbench`] turns a module's port list into a self-contained
//! Verilog testbench: one `reg`/`wire` per port, a named-port DUT instance,
//! clock and reset stubs when matching inputs exist, two stimulus phases, and
//! `$finish`. Output depends only on the module, so repeated calls agree.

#![warn(missing_docs)]

use rivet_ir::{Module, Port, PortDirection};

/// Delay after each stimulus phase.
pub const PHASE_DELAY: u32 = 100;

/// Half period of the generated clock toggle.
pub const CLOCK_HALF_PERIOD: u32 = 5;

/// Time at which generated resets deassert.
pub const RESET_RELEASE: u32 = 20;

/// Returns `true` for `clk`, `clock`, and names ending in `_clk`.
pub fn is_clock_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "clk" || lower == "clock" || lower.ends_with("_clk")
}

/// Returns `true` for `rst`, `reset`, `rst_n`, and names ending in `_n`.
pub fn is_reset_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "rst" || lower == "reset" || is_active_low(&lower)
}

/// Returns `true` for names ending in `_n`.
pub fn is_active_low(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with("_n")
}

/// Generates a testbench for `module`.
pub fn generate_testbench(module: &Module) -> String {
    let inputs: Vec<&Port> = module.ports.iter().filter(|p| p.is_input()).collect();
    let clocks: Vec<&Port> = inputs.iter().copied().filter(|p| is_clock_name(&p.name)).collect();
    let resets: Vec<&Port> = inputs
        .iter()
        .copied()
        .filter(|p| !is_clock_name(&p.name) && is_reset_name(&p.name))
        .collect();
    let stimulus: Vec<&Port> = inputs
        .iter()
        .copied()
        .filter(|p| !is_clock_name(&p.name) && !is_reset_name(&p.name))
        .collect();

    let mut lines = vec![
        "`timescale 1ns / 1ps".to_string(),
        String::new(),
        format!("module {}_tb;", module.name),
        String::new(),
    ];

    for port in &module.ports {
        let kind = match port.direction {
            PortDirection::Input => "reg",
            PortDirection::Output | PortDirection::Inout => "wire",
        };
        lines.push(format!("    {kind}{} {};", range(port.width), port.name));
    }
    if !module.ports.is_empty() {
        lines.push(String::new());
    }

    lines.extend(instance(module));

    for clock in &clocks {
        lines.push(String::new());
        lines.push("    initial begin".to_string());
        lines.push(format!("        {} = 0;", clock.name));
        lines.push(format!(
            "        forever #{CLOCK_HALF_PERIOD} {0} = ~{0};",
            clock.name
        ));
        lines.push("    end".to_string());
    }

    if !resets.is_empty() {
        lines.push(String::new());
        lines.push("    initial begin".to_string());
        for reset in &resets {
            let asserted = u8::from(!is_active_low(&reset.name));
            lines.push(format!("        {} = {asserted};", reset.name));
        }
        lines.push(format!("        #{RESET_RELEASE};"));
        for reset in &resets {
            let released = u8::from(is_active_low(&reset.name));
            lines.push(format!("        {} = {released};", reset.name));
        }
        lines.push("    end".to_string());
    }

    lines.push(String::new());
    lines.push("    initial begin".to_string());
    for port in &stimulus {
        lines.push(format!("        {} = {};", port.name, all_ones(port.width)));
    }
    lines.push(format!("        #{PHASE_DELAY};"));
    for port in &stimulus {
        lines.push(format!("        {} = 0;", port.name));
    }
    lines.push(format!("        #{PHASE_DELAY};"));
    lines.push("        $finish;".to_string());
    lines.push("    end".to_string());
    lines.push(String::new());
    lines.push("endmodule".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// The DUT instance with one aligned named connection per port.
fn instance(module: &Module) -> Vec<String> {
    if module.ports.is_empty() {
        return vec![format!("    {} uut ();", module.name)];
    }
    let pad = module.ports.iter().map(|p| p.name.len()).max().unwrap_or(0);
    let last = module.ports.len() - 1;
    let mut lines = vec![format!("    {} uut (", module.name)];
    for (index, port) in module.ports.iter().enumerate() {
        let comma = if index == last { "" } else { "," };
        lines.push(format!("        .{:<pad$} ({}){comma}", port.name, port.name));
    }
    lines.push("    );".to_string());
    lines
}

fn range(width: u32) -> String {
    if width > 1 {
        format!(" [{}:0]", width - 1)
    } else {
        String::new()
    }
}

fn all_ones(width: u32) -> String {
    if width > 1 {
        format!("{{{width}{{1'b1}}}}")
    } else {
        "1".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivet_parser::parse_module;

    const DUT: &str = "\
module filter(
    input clk,
    input rst_n,
    input [7:0] data_in,
    output reg [7:0] data_out
);
endmodule";

    fn dut() -> Module {
        parse_module(DUT).unwrap()
    }

    #[test]
    fn name_classification() {
        assert!(is_clock_name("clk"));
        assert!(is_clock_name("CLOCK"));
        assert!(is_clock_name("sys_clk"));
        assert!(!is_clock_name("clk_en"));
        assert!(is_reset_name("rst"));
        assert!(is_reset_name("reset"));
        assert!(is_reset_name("rst_n"));
        assert!(is_reset_name("cs_n"));
        assert!(!is_reset_name("data"));
        assert!(is_active_low("rst_n"));
        assert!(!is_active_low("rst"));
    }

    #[test]
    fn one_declaration_and_connection_per_port() {
        let tb = generate_testbench(&dut());
        assert!(tb.contains("module filter_tb;"));
        for decl in [
            "    reg clk;",
            "    reg rst_n;",
            "    reg [7:0] data_in;",
            "    wire [7:0] data_out;",
        ] {
            assert_eq!(tb.matches(decl).count(), 1, "{decl}");
        }
        for name in ["clk", "rst_n", "data_in", "data_out"] {
            let needle = format!("({name})");
            assert_eq!(tb.matches(&needle).count(), 1, "{name}");
        }
        assert!(tb.contains("    filter uut (\n"));
        assert!(tb.contains("        .data_out (data_out)\n    );"));
    }

    #[test]
    fn clock_reset_and_phases() {
        let tb = generate_testbench(&dut());
        assert!(tb.contains("forever #5 clk = ~clk;"));
        assert!(tb.contains("        rst_n = 0;\n        #20;\n        rst_n = 1;"));
        assert!(tb.contains("        data_in = {8{1'b1}};\n        #100;\n        data_in = 0;\n        #100;\n        $finish;"));
        assert!(tb.starts_with("`timescale 1ns / 1ps\n"));
        assert!(tb.trim_end().ends_with("endmodule"));
    }

    #[test]
    fn active_high_reset() {
        let m = parse_module("module m(input clock, input reset, input go, output done); endmodule")
            .unwrap();
        let tb = generate_testbench(&m);
        assert!(tb.contains("        reset = 1;\n        #20;\n        reset = 0;"));
        assert!(tb.contains("forever #5 clock = ~clock;"));
        assert!(tb.contains("        go = 1;"));
        assert!(tb.contains("    wire done;"));
    }

    #[test]
    fn no_clock_no_reset() {
        let m = parse_module("module adder(input [3:0] a, input [3:0] b, output [4:0] s); endmodule")
            .unwrap();
        let tb = generate_testbench(&m);
        assert!(!tb.contains("forever"));
        assert!(!tb.contains("#20"));
        assert!(tb.contains("    wire [4:0] s;"));
        assert_eq!(tb.matches("#100;").count(), 2);
    }

    #[test]
    fn portless_module() {
        let m = parse_module("module empty(); endmodule").unwrap();
        let tb = generate_testbench(&m);
        assert!(tb.contains("    empty uut ();"));
        assert!(tb.contains("$finish;"));
    }

    #[test]
    fn full_text_of_small_module() {
        let m = parse_module("module inv(input a, output y); endmodule").unwrap();
        let expected = "\
`timescale 1ns / 1ps

module inv_tb;

    reg a;
    wire y;

    inv uut (
        .a (a),
        .y (y)
    );

    initial begin
        a = 1;
        #100;
        a = 0;
        #100;
        $finish;
    end

endmodule
";
        assert_eq!(generate_testbench(&m), expected);
    }

    #[test]
    fn idempotent() {
        let m = dut();
        assert_eq!(generate_testbench(&m), generate_testbench(&m));
    }
}
