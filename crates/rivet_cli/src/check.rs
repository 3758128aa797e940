//! `rivet check`: validate a source file and render its diagnostics.

use rivet_diagnostics::{
    Diagnostic, DiagnosticRenderer, DiagnosticSink, JsonRenderer, SourceFile, TerminalRenderer,
};
use rivet_parser::parse_verilog;

use crate::pipeline::read_source;
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `rivet check` command.
///
/// Diagnostics go to stdout, the summary to stderr. Returns exit code 1 if
/// any error was reported; warnings alone still exit 0.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let source = read_source(&args.file)?;
    let name = args.file.display().to_string();
    let report = parse_verilog(&source);

    let sink = DiagnosticSink::new();
    report.emit_into(&sink);
    let diags = sink.take_all();
    print!("{}", render(&diags, &name, &source, args.format, global.color));

    if !global.quiet {
        eprintln!("   {}", summary(&sink, &name, &report.name));
    }
    Ok(if sink.has_errors() { 1 } else { 0 })
}

fn render(
    diags: &[Diagnostic],
    name: &str,
    source: &str,
    format: ReportFormat,
    color: bool,
) -> String {
    let file = SourceFile::new(name, source);
    match format {
        ReportFormat::Text => TerminalRenderer::new(color).render_all(diags, &file),
        ReportFormat::Json => JsonRenderer.render_all(diags, &file),
    }
}

fn summary(sink: &DiagnosticSink, name: &str, module: &str) -> String {
    let module = if module.is_empty() {
        String::new()
    } else {
        format!(" (module `{module}`)")
    };
    format!(
        "Checked {name}{module}: {} error(s), {} warning(s)",
        sink.error_count(),
        sink.warning_count()
    )
}
