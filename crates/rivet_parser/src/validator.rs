//! Line-oriented structural validator.
//!
//! Works on raw source lines, not on the token stream, tracking bracket, paren,
//! `begin`/`end`, `case`/`endcase`, and module nesting. Every finding becomes a
//! [`Diagnostic`]; the validator always returns a report, whatever the input.

use rivet_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};
use rivet_ir::{Assign, Parameter, Port, PortDirection, Signal, SignalKind};
use serde::Serialize;
use tracing::debug;

use crate::literal::fold_constant;

/// The event control of an always block as seen by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlwaysHeader {
    /// Flat sensitivity words, `or` and commas removed; `["*"]` for implicit lists.
    pub sensitivity_list: Vec<String>,
    /// 1-based line of the `always` keyword.
    pub line: u32,
}

/// Everything [`parse_verilog`] recovers, plus its diagnostics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Name of the first module, or empty.
    pub name: String,
    /// Ports from ANSI headers and body declarations.
    pub ports: Vec<Port>,
    /// `wire`/`reg` declarations.
    pub signals: Vec<Signal>,
    /// Always block headers.
    pub always_blocks: Vec<AlwaysHeader>,
    /// Continuous assignments.
    pub assign_statements: Vec<Assign>,
    /// Parameters and localparams.
    pub parameters: Vec<Parameter>,
    /// Error diagnostics in discovery order.
    pub errors: Vec<Diagnostic>,
    /// Warning diagnostics in discovery order.
    pub warnings: Vec<Diagnostic>,
}

impl ValidationReport {
    /// A source is valid iff it produced no errors; warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All diagnostics ordered by line, errors before warnings on the same line.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = self
            .errors
            .iter()
            .chain(self.warnings.iter())
            .cloned()
            .collect();
        all.sort_by(|a, b| a.line.cmp(&b.line).then(b.severity.cmp(&a.severity)));
        all
    }

    /// Emits every diagnostic into a sink.
    pub fn emit_into(&self, sink: &DiagnosticSink) {
        sink.extend(self.diagnostics());
    }

    /// Returns `true` if any diagnostic carries `code`.
    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|d| d.code == code)
    }
}

/// Validates `source` line by line.
pub fn parse_verilog(source: &str) -> ValidationReport {
    let mut validator = Validator::default();
    let mut line_count = 0u32;
    for (index, raw) in source.lines().enumerate() {
        line_count = index as u32 + 1;
        validator.check_line(raw, line_count);
    }
    validator.finish(line_count.max(1));
    let report = validator.report;
    debug!(
        module = %report.name,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated source"
    );
    report
}

/// A nesting counter that remembers where it last became unbalanced.
#[derive(Debug, Default)]
struct Depth {
    value: i64,
    since: u32,
}

impl Depth {
    fn open(&mut self, line: u32) {
        if self.value == 0 {
            self.since = line;
        }
        self.value += 1;
    }

    fn close(&mut self, line: u32) {
        self.value -= 1;
        if self.value == -1 {
            self.since = line;
        }
    }
}

#[derive(Debug, Default)]
struct Validator {
    report: ValidationReport,
    module_depth: u32,
    module_line: u32,
    brackets: Depth,
    parens: Depth,
    blocks: Depth,
    cases: Depth,
    in_block_comment: bool,
}

impl Validator {
    fn error(&mut self, code: DiagnosticCode, message: impl Into<String>, line: u32) -> &mut Diagnostic {
        self.report.errors.push(Diagnostic::error(code, message, line));
        let last = self.report.errors.len() - 1;
        &mut self.report.errors[last]
    }

    fn check_line(&mut self, raw: &str, line: u32) {
        let clean = strip_comments_and_strings(raw, &mut self.in_block_comment);

        for ch in clean.chars() {
            match ch {
                '[' => self.brackets.open(line),
                ']' => self.brackets.close(line),
                '(' => self.parens.open(line),
                ')' => self.parens.close(line),
                _ => {}
            }
        }

        for (offset, word) in words(&clean) {
            match word {
                "begin" => self.blocks.open(line),
                "end" => self.blocks.close(line),
                "case" | "casex" | "casez" => self.cases.open(line),
                "endcase" => self.cases.close(line),
                "module" | "macromodule" => self.on_module(&clean, offset, word.len(), line),
                "endmodule" => self.on_endmodule(&clean, offset, line),
                _ => {}
            }
        }

        for (segment, terminated) in segments(&clean) {
            self.check_segment(segment, terminated, line);
        }
    }

    fn on_module(&mut self, clean: &str, offset: usize, keyword_len: usize, line: u32) {
        let column = column_of(clean, offset);
        if self.module_depth > 0 {
            let opened = self.module_line;
            self.error(
                DiagnosticCode::NestedModule,
                "module declared inside another module",
                line,
            )
            .column = Some(column);
            if let Some(diag) = self.report.errors.last_mut() {
                diag.notes.push(format!("enclosing module starts on line {opened}"));
            }
        } else {
            self.module_line = line;
        }
        self.module_depth += 1;

        let after = clean[offset + keyword_len..].trim_start();
        let name: String = after
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
            .collect();
        let name_ok = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !name_ok {
            self.error(
                DiagnosticCode::InvalidModuleName,
                "module declaration has no valid name",
                line,
            )
            .column = Some(column);
        } else if self.report.name.is_empty() {
            self.report.name = name;
        }

        if !clean.contains('(') {
            let diag = self.error(
                DiagnosticCode::MissingPortList,
                "module declaration has no port list",
                line,
            );
            diag.column = Some(column);
            diag.help.push("declare ports as `module name(...);`".to_string());
        }
    }

    fn on_endmodule(&mut self, clean: &str, offset: usize, line: u32) {
        if self.module_depth == 0 {
            let column = column_of(clean, offset);
            self.error(
                DiagnosticCode::UnmatchedEndmodule,
                "`endmodule` without a matching `module`",
                line,
            )
            .column = Some(column);
        } else {
            self.module_depth -= 1;
        }
    }

    fn check_segment(&mut self, segment: &str, terminated: bool, line: u32) {
        let atoms = atoms(segment);
        match atoms.first().copied() {
            Some("assign") => self.check_assign(segment, terminated, line),
            Some("always") => self.check_always(segment, line),
            Some(kw @ ("wire" | "reg")) => {
                if !terminated {
                    self.error(
                        DiagnosticCode::MissingSemicolon,
                        format!("`{kw}` declaration is missing ';'"),
                        line,
                    )
                    .help
                    .push("terminate the declaration with ';'".to_string());
                }
                let kind = if kw == "reg" { SignalKind::Reg } else { SignalKind::Wire };
                self.collect_signals(&atoms[1..], kind, line);
            }
            _ => {}
        }

        let mut i = 0;
        while i < atoms.len() {
            i = match atoms[i] {
                "input" | "output" | "inout" => self.collect_ports(&atoms, i, line),
                "parameter" | "localparam" => self.collect_parameters(&atoms, i, line),
                _ => i + 1,
            };
        }
    }

    fn check_assign(&mut self, segment: &str, terminated: bool, line: u32) {
        if !terminated {
            self.error(
                DiagnosticCode::MissingSemicolon,
                "assign statement is missing ';'",
                line,
            )
            .help
            .push("terminate the statement with ';'".to_string());
        }
        let body = segment.trim_start().trim_start_matches("assign");
        let Some((target, expression)) = body.split_once('=') else {
            self.error(
                DiagnosticCode::MissingAssignment,
                "assign statement has no '='",
                line,
            );
            return;
        };
        let target: String = target
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        self.report.assign_statements.push(Assign {
            target,
            expression_text: expression.trim().to_string(),
            source_line: line,
        });
    }

    fn check_always(&mut self, segment: &str, line: u32) {
        let has_event = segment.contains('@');
        let has_begin = words(segment).iter().any(|(_, w)| *w == "begin");
        if !has_event && !has_begin {
            self.error(
                DiagnosticCode::InvalidAlwaysBlock,
                "always block has neither an event control nor `begin`",
                line,
            )
            .help
            .push("add a sensitivity list such as `@(posedge clk)`".to_string());
        }

        let compact: String = segment.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.contains("@*") || compact.contains("@(*)") {
            self.report.warnings.push(
                Diagnostic::warning(
                    DiagnosticCode::ImplicitSensitivity,
                    "always block uses an implicit sensitivity list",
                    line,
                )
                .with_note("`@(*)` is sensitive to every signal the block reads"),
            );
        }

        let mut sensitivity_list = Vec::new();
        if let Some(at) = segment.find('@') {
            let control = segment[at + 1..].trim_start();
            if control.starts_with('*') {
                sensitivity_list.push("*".to_string());
            } else if let Some(inner) = control.strip_prefix('(') {
                let inner = inner.split(')').next().unwrap_or_default();
                for atom in atoms(inner) {
                    if atom == "*" {
                        sensitivity_list.push("*".to_string());
                    } else if is_identifier(atom) && atom != "or" {
                        sensitivity_list.push(atom.to_string());
                    }
                }
            } else if let Some(&name) = atoms(control).first() {
                if is_identifier(name) {
                    sensitivity_list.push(name.to_string());
                }
            }
        }
        self.report.always_blocks.push(AlwaysHeader {
            sensitivity_list,
            line,
        });
    }

    /// `input [wire|reg] [signed] [range] name {, name}` starting at `atoms[start]`.
    fn collect_ports(&mut self, atoms: &[&str], start: usize, line: u32) -> usize {
        let direction = match atoms[start] {
            "input" => PortDirection::Input,
            "output" => PortDirection::Output,
            _ => PortDirection::Inout,
        };
        let mut i = start + 1;
        let mut is_reg = false;
        let mut signed = false;
        while let Some(&word) = atoms.get(i) {
            match word {
                "reg" => is_reg = true,
                "wire" | "logic" => {}
                "signed" => signed = true,
                _ => break,
            }
            i += 1;
        }
        let width = self.range_width(atoms, &mut i);

        while let Some(&name) = atoms.get(i) {
            if !is_identifier(name) || is_declaration_keyword(name) {
                break;
            }
            let mut port = Port::new(name, direction, width, line);
            port.signed = signed;
            self.report.ports.push(port);
            if is_reg {
                let mut signal = Signal::new(name, SignalKind::Reg, width, line);
                signal.signed = signed;
                self.report.signals.push(signal);
            }
            i += 1;
            if atoms.get(i) == Some(&",")
                && atoms
                    .get(i + 1)
                    .is_some_and(|w| is_identifier(w) && !is_declaration_keyword(w))
            {
                i += 1;
            } else {
                break;
            }
        }
        i.max(start + 1)
    }

    fn collect_signals(&mut self, atoms: &[&str], kind: SignalKind, line: u32) {
        let mut i = 0;
        let mut signed = false;
        if atoms.first() == Some(&"signed") {
            signed = true;
            i += 1;
        }
        let width = self.range_width(atoms, &mut i);
        let mut depth = 0i32;
        let mut expect_name = true;
        for &atom in &atoms[i.min(atoms.len())..] {
            match atom {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth -= 1,
                "," if depth == 0 => expect_name = true,
                name if expect_name && depth == 0 && is_identifier(name) => {
                    let mut signal = Signal::new(name, kind, width, line);
                    signal.signed = signed;
                    self.report.signals.push(signal);
                    expect_name = false;
                }
                _ => {}
            }
        }
    }

    /// `parameter [range] NAME = value {, NAME = value}`
    fn collect_parameters(&mut self, atoms: &[&str], start: usize, line: u32) -> usize {
        let local = atoms[start] == "localparam";
        let mut i = start + 1;
        while atoms.get(i).is_some_and(|w| *w == "signed" || *w == "integer") {
            i += 1;
        }
        self.range_width(atoms, &mut i);
        loop {
            let (Some(&name), Some(&"=")) = (atoms.get(i), atoms.get(i + 1)) else {
                break;
            };
            if !is_identifier(name) {
                break;
            }
            i += 2;
            let value_start = i;
            let mut depth = 0i32;
            while let Some(&atom) = atoms.get(i) {
                match atom {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" if depth == 0 => break,
                    ")" | "]" | "}" => depth -= 1,
                    "," if depth == 0 => break,
                    _ => {}
                }
                i += 1;
            }
            let value = self.fold(&atoms[value_start..i]).unwrap_or(0);
            self.report.parameters.push(Parameter {
                name: name.to_string(),
                value,
                local,
                line,
            });
            if atoms.get(i) == Some(&",") && atoms.get(i + 2) == Some(&"=") {
                i += 1;
            } else {
                break;
            }
        }
        i.max(start + 1)
    }

    /// Consumes an optional `[hi:lo]` at `atoms[*i]` and returns its width.
    fn range_width(&self, atoms: &[&str], i: &mut usize) -> u32 {
        if atoms.get(*i) != Some(&"[") {
            return 1;
        }
        let start = *i + 1;
        let Some(close) = atoms[start..].iter().position(|a| *a == "]") else {
            *i = atoms.len();
            return 1;
        };
        let inner = &atoms[start..start + close];
        *i = start + close + 1;
        let Some(colon) = inner.iter().position(|a| *a == ":") else {
            return 1;
        };
        match (self.fold(&inner[..colon]), self.fold(&inner[colon + 1..])) {
            (Some(hi), Some(lo)) => u32::try_from(hi.abs_diff(lo).saturating_add(1)).unwrap_or(u32::MAX),
            _ => 1,
        }
    }

    fn fold(&self, atoms: &[&str]) -> Option<i64> {
        fold_constant(atoms.iter().copied(), |name| {
            self.report
                .parameters
                .iter()
                .find(|p| p.name == name)
                .map(|p| p.value)
        })
    }

    fn finish(&mut self, last_line: u32) {
        if self.module_depth > 0 {
            let opened = self.module_line;
            let diag = self.error(
                DiagnosticCode::MissingEndmodule,
                "end of file reached inside a module",
                last_line,
            );
            diag.notes.push(format!("module starts on line {opened}"));
            diag.help.push("add `endmodule`".to_string());
        }
        if self.brackets.value != 0 {
            let line = self.brackets.since;
            self.error(DiagnosticCode::UnmatchedBrackets, "unbalanced '[' and ']'", line);
        }
        if self.parens.value != 0 {
            let line = self.parens.since;
            self.error(DiagnosticCode::UnmatchedParentheses, "unbalanced '(' and ')'", line);
        }
        if self.blocks.value != 0 {
            let line = self.blocks.since;
            self.error(DiagnosticCode::UnmatchedBeginEnd, "unbalanced `begin` and `end`", line);
        }
        if self.cases.value > 0 {
            let line = self.cases.since;
            self.error(
                DiagnosticCode::MissingEndcase,
                "end of file reached inside a `case` statement",
                line,
            )
            .help
            .push("add `endcase`".to_string());
        }
    }
}

/// Removes `//` and `/* */` comments and the contents of string literals,
/// keeping the quotes so column positions before them stay meaningful.
fn strip_comments_and_strings(raw: &str, in_block_comment: &mut bool) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if *in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_block_comment = false;
                out.push(' ');
            }
            continue;
        }
        match ch {
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_block_comment = true;
            }
            '"' => {
                out.push('"');
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => break,
                        _ => {}
                    }
                }
                out.push('"');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Identifier-like words with their byte offsets.
fn words(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, ch) in text.char_indices() {
        let word_char = ch.is_ascii_alphanumeric() || ch == '_' || ch == '$';
        match (word_char, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                out.push((s, &text[s..i]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out
}

/// Words plus single punctuation characters, whitespace dropped. A tick joins
/// a size to its base so `4'b1010` stays one atom.
fn atoms(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, ch) in text.char_indices() {
        let word_char = ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' || ch == '\'';
        if word_char {
            if start.is_none() {
                start = Some(i);
            }
            continue;
        }
        if let Some(s) = start.take() {
            out.push(&text[s..i]);
        }
        if !ch.is_whitespace() {
            out.push(&text[i..i + ch.len_utf8()]);
        }
    }
    if let Some(s) = start {
        out.push(&text[s..]);
    }
    out
}

/// Splits a cleaned line at `;`, reporting whether each non-empty piece was terminated.
fn segments(text: &str) -> Vec<(&str, bool)> {
    let pieces: Vec<&str> = text.split(';').collect();
    let last = pieces.len().saturating_sub(1);
    pieces
        .into_iter()
        .enumerate()
        .filter(|(_, piece)| !piece.trim().is_empty())
        .map(|(k, piece)| (piece, k < last))
        .collect()
}

fn is_identifier(word: &str) -> bool {
    word.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && !word.contains('\'')
}

fn is_declaration_keyword(word: &str) -> bool {
    matches!(
        word,
        "input" | "output" | "inout" | "wire" | "reg" | "parameter" | "localparam" | "signed"
    )
}

fn column_of(text: &str, offset: usize) -> u32 {
    text[..offset].chars().count() as u32 + 1
}
