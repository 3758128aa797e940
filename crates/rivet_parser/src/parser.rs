//! Structural parser: one forward pass over the token stream.
//!
//! The parser recovers the first module's ports, signals, parameters, continuous
//! assigns, always blocks, and instances. It never reports errors; constructs it
//! does not understand are skipped. The only failure is "no module name found".

use std::collections::HashMap;

use rivet_ir::{
    AlwaysBlock, Assign, CaseArm, Instance, Module, Parameter, Port, PortDirection, Signal,
    SignalKind, Statement, StmtId,
};
use tracing::{debug, trace};

use crate::lexer::tokenize;
use crate::literal::fold_constant;
use crate::token::{Keyword, Token, TokenKind};

/// Parses the first module in `source`.
///
/// Returns `None` iff no `module <name>` header is found; partially recovered
/// structure is discarded in that case. A named module with an empty body is valid.
pub fn parse_module(source: &str) -> Option<Module> {
    let tokens: Vec<Token> = tokenize(source)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Comment)
        .collect();
    let mut parser = Parser {
        tokens,
        pos: 0,
        module: Module::default(),
        params: HashMap::new(),
    };
    parser.parse();
    if parser.module.name.is_empty() {
        debug!("no module header found");
        return None;
    }
    debug!(
        module = %parser.module.name,
        ports = parser.module.ports.len(),
        signals = parser.module.signals.len(),
        always_blocks = parser.module.always_blocks.len(),
        assigns = parser.module.assigns.len(),
        "parsed module"
    );
    Some(parser.module)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    module: Module,
    params: HashMap<String, i64>,
}

impl Parser {
    // ---- cursor helpers ----

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn at_keyword(&self, kw: Keyword) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(kw))
    }

    fn at_op(&self, op: &str) -> bool {
        self.peek().is_some_and(|t| t.is_op(op))
    }

    fn eat_op(&mut self, op: &str) -> bool {
        if self.at_op(op) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.at_keyword(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn current_line(&self) -> u32 {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn eat_identifier(&mut self) -> Option<String> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Identifier => {
                let text = t.text.clone();
                self.pos += 1;
                Some(text)
            }
            _ => None,
        }
    }

    /// `true` if the token after a `,` starts another name in the same list.
    fn comma_continues_list(&self) -> bool {
        self.at_op(",")
            && self
                .peek_at(1)
                .is_some_and(|t| t.kind == TokenKind::Identifier)
    }

    /// Skips past the next `;` at nesting depth zero, stopping early at `endmodule`.
    fn skip_to_semicolon(&mut self) {
        let mut depth = 0i32;
        while let Some(tok) = self.peek() {
            if tok.is_keyword(Keyword::Endmodule) {
                return;
            }
            if tok.kind == TokenKind::Operator {
                match tok.text.as_str() {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth -= 1,
                    ";" if depth <= 0 => {
                        self.pos += 1;
                        return;
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }
    }

    /// Skips to and past the given closing keyword.
    fn skip_past_keyword(&mut self, end: Keyword) {
        while let Some(tok) = self.advance() {
            if tok.is_keyword(end) {
                return;
            }
        }
    }

    /// Collects token text up to (not including) the first depth-zero token
    /// matching `stop`. Stops at `endmodule` and at end of input.
    fn collect_until(&mut self, stop: impl Fn(&Token) -> bool) -> Vec<String> {
        let mut depth = 0i32;
        let mut out = Vec::new();
        while let Some(tok) = self.peek() {
            if tok.is_keyword(Keyword::Endmodule) || (depth <= 0 && stop(tok)) {
                break;
            }
            if tok.kind == TokenKind::Operator {
                match tok.text.as_str() {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => depth -= 1,
                    _ => {}
                }
            }
            out.push(tok.text.clone());
            self.pos += 1;
        }
        out
    }

    /// Reads a parenthesised group and returns its inner text, space-joined.
    fn paren_text(&mut self) -> String {
        if !self.eat_op("(") {
            return String::new();
        }
        let inner = self.collect_until(|t| t.is_op(")"));
        self.eat_op(")");
        inner.join(" ")
    }

    // ---- module level ----

    fn parse(&mut self) {
        while let Some(tok) = self.peek() {
            if self.module.name.is_empty() && !tok.is_keyword(Keyword::Module) {
                self.pos += 1;
                continue;
            }
            let kind = tok.kind;
            match kind {
                TokenKind::Keyword(Keyword::Module) => {
                    if !self.module.name.is_empty() {
                        // A second module header ends the first module.
                        return;
                    }
                    self.pos += 1;
                    match self.eat_identifier() {
                        Some(name) => {
                            trace!(%name, "module header");
                            self.module.name = name;
                            self.parse_header_parameters();
                        }
                        None => continue,
                    }
                }
                TokenKind::Keyword(Keyword::Endmodule) => return,
                TokenKind::Keyword(kw) if kw.is_direction() => self.parse_port_decl(),
                TokenKind::Keyword(Keyword::Wire) => self.parse_signal_decl(SignalKind::Wire),
                TokenKind::Keyword(Keyword::Reg) => self.parse_signal_decl(SignalKind::Reg),
                TokenKind::Keyword(Keyword::Parameter) => self.parse_parameter_decl(false),
                TokenKind::Keyword(Keyword::Localparam) => self.parse_parameter_decl(true),
                TokenKind::Keyword(Keyword::Always) => self.parse_always(),
                TokenKind::Keyword(Keyword::Assign) => self.parse_assign(),
                TokenKind::Keyword(Keyword::Function) => self.skip_past_keyword(Keyword::Endfunction),
                TokenKind::Keyword(Keyword::Task) => self.skip_past_keyword(Keyword::Endtask),
                TokenKind::Identifier if self.at_instance() => self.parse_instance(),
                _ => self.pos += 1,
            }
        }
    }

    /// `#(parameter A = 1, parameter B = 2)` directly after the module name.
    fn parse_header_parameters(&mut self) {
        if !(self.at_op("#") && self.peek_at(1).is_some_and(|t| t.is_op("("))) {
            return;
        }
        self.pos += 2;
        while !self.at_end() && !self.at_op(")") {
            if self.eat_keyword(Keyword::Parameter) {
                self.parse_parameter_list(false);
            } else if self.eat_keyword(Keyword::Localparam) {
                self.parse_parameter_list(true);
            } else if self.peek().is_some_and(|t| t.kind == TokenKind::Identifier)
                && self.peek_at(1).is_some_and(|t| t.is_op("="))
            {
                self.parse_parameter_list(false);
            } else {
                self.pos += 1;
            }
        }
        self.eat_op(")");
    }

    fn parse_port_decl(&mut self) {
        let Some(direction) = self
            .advance()
            .and_then(|t| PortDirection::from_keyword(&t.text))
        else {
            return;
        };
        let mut is_reg = false;
        if self.eat_keyword(Keyword::Reg) {
            is_reg = true;
        } else {
            self.eat_keyword(Keyword::Wire);
        }
        let signed = self.eat_signed();
        let width = self.parse_range_width();

        loop {
            let line = self.current_line();
            let Some(name) = self.eat_identifier() else {
                break;
            };
            self.add_port(&name, direction, width, signed, line);
            if is_reg {
                self.add_signal(&name, SignalKind::Reg, width, signed, None, line);
            }
            if self.comma_continues_list() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn add_port(&mut self, name: &str, direction: PortDirection, width: u32, signed: bool, line: u32) {
        let mut port = Port::new(name, direction, width, line);
        port.signed = signed;
        match self.module.ports.iter_mut().find(|p| p.name == name) {
            Some(existing) => *existing = port,
            None => self.module.ports.push(port),
        }
    }

    fn add_signal(
        &mut self,
        name: &str,
        kind: SignalKind,
        width: u32,
        signed: bool,
        initial_value: Option<i64>,
        line: u32,
    ) {
        let mut signal = Signal::new(name, kind, width, line);
        signal.signed = signed;
        signal.initial_value = initial_value;
        match self.module.signals.iter_mut().find(|s| s.name == name) {
            Some(existing) => *existing = signal,
            None => self.module.signals.push(signal),
        }
    }

    fn eat_signed(&mut self) -> bool {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Identifier && t.text == "signed" => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Parses an optional `[hi:lo]` and returns `|hi - lo| + 1`, or 1 when absent
    /// or unresolvable.
    fn parse_range_width(&mut self) -> u32 {
        if !self.eat_op("[") {
            return 1;
        }
        let hi = self.collect_until(|t| t.is_op(":") || t.is_op("]"));
        let lo = if self.eat_op(":") {
            self.collect_until(|t| t.is_op("]"))
        } else {
            Vec::new()
        };
        self.eat_op("]");
        match (self.const_value(&hi), self.const_value(&lo)) {
            (Some(hi), Some(lo)) => {
                let width = hi.abs_diff(lo).saturating_add(1);
                u32::try_from(width).unwrap_or(u32::MAX)
            }
            _ => 1,
        }
    }

    fn const_value(&self, words: &[String]) -> Option<i64> {
        fold_constant(words.iter().map(String::as_str), |name| {
            self.params.get(name).copied()
        })
    }

    fn parse_signal_decl(&mut self, kind: SignalKind) {
        self.pos += 1;
        let signed = self.eat_signed();
        let width = self.parse_range_width();

        loop {
            let line = self.current_line();
            let Some(name) = self.eat_identifier() else {
                break;
            };
            // Unpacked array dimensions: `reg [7:0] mem [0:15];`
            while self.at_op("[") {
                self.parse_range_width();
            }
            let mut initial_value = None;
            if self.eat_op("=") {
                let expr = self.collect_until(|t| t.is_op(",") || t.is_op(";"));
                match kind {
                    // A net declaration assignment is a continuous assign.
                    SignalKind::Wire => self.module.assigns.push(Assign {
                        target: name.clone(),
                        expression_text: expression_text(&expr),
                        source_line: line,
                    }),
                    SignalKind::Reg => initial_value = self.const_value(&expr),
                }
            }
            self.add_signal(&name, kind, width, signed, initial_value, line);
            if self.comma_continues_list() {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.eat_op(";");
    }

    fn parse_parameter_decl(&mut self, local: bool) {
        self.pos += 1;
        self.parse_parameter_list(local);
        self.eat_op(";");
    }

    /// `[signed] [range] NAME = value {, NAME = value}`
    fn parse_parameter_list(&mut self, local: bool) {
        self.eat_signed();
        if self.peek().is_some_and(|t| t.text == "integer") {
            self.pos += 1;
        }
        if self.at_op("[") {
            self.parse_range_width();
        }
        loop {
            let line = self.current_line();
            let Some(name) = self.eat_identifier() else {
                break;
            };
            if !self.eat_op("=") {
                break;
            }
            let expr = self.collect_until(|t| t.is_op(",") || t.is_op(";") || t.is_op(")"));
            let value = self.const_value(&expr).unwrap_or(0);
            trace!(%name, value, "parameter");
            self.params.insert(name.clone(), value);
            self.module.parameters.push(Parameter {
                name,
                value,
                local,
                line,
            });
            if self.comma_continues_list() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn parse_assign(&mut self) {
        let line = self.current_line();
        self.pos += 1;
        let Some(target) = self.eat_identifier() else {
            self.skip_to_semicolon();
            return;
        };
        while self.at_op("[") {
            self.parse_range_width();
        }
        if !self.eat_op("=") {
            self.skip_to_semicolon();
            return;
        }
        let expr = self.collect_until(|t| t.is_op(";"));
        self.eat_op(";");
        self.module.assigns.push(Assign {
            target,
            expression_text: expression_text(&expr),
            source_line: line,
        });
    }

    fn parse_always(&mut self) {
        let source_line = self.current_line();
        self.pos += 1;
        let mut sensitivity_list = Vec::new();
        if self.eat_op("@") {
            if self.eat_op("*") {
                sensitivity_list.push("*".to_string());
            } else if self.eat_op("(") {
                let words = self.collect_until(|t| t.is_op(")"));
                self.eat_op(")");
                sensitivity_list = words
                    .into_iter()
                    .filter(|w| w != "," && w != "or" && w != "(" && w != ")")
                    .collect();
            } else if let Some(name) = self.eat_identifier() {
                sensitivity_list.push(name);
            }
        }
        let body = self.parse_statement();
        self.module.always_blocks.push(AlwaysBlock {
            sensitivity_list,
            body,
            source_line,
        });
    }

    /// `Mod inst (...)` or `Mod #(...) inst (...)` at module scope.
    fn at_instance(&self) -> bool {
        if !self.peek().is_some_and(|t| is_instance_name(&t.text)) {
            return false;
        }
        match self.peek_at(1) {
            Some(t) if t.kind == TokenKind::Identifier => {
                is_instance_name(&t.text) && self.peek_at(2).is_some_and(|t| t.is_op("("))
            }
            Some(t) => t.is_op("#") && self.peek_at(2).is_some_and(|t| t.is_op("(")),
            None => false,
        }
    }

    fn parse_instance(&mut self) {
        let line = self.current_line();
        let Some(module_name) = self.eat_identifier() else {
            return;
        };
        if self.eat_op("#") {
            self.paren_text();
        }
        let Some(instance_name) = self.eat_identifier() else {
            self.skip_to_semicolon();
            return;
        };
        let mut connections = Vec::new();
        if self.eat_op("(") {
            while !self.at_end() && !self.at_op(")") {
                if self.eat_op(",") {
                    continue;
                }
                if self.eat_op(".") {
                    let port = self.eat_identifier().unwrap_or_default();
                    let net = self.paren_text();
                    connections.push((port, net));
                } else {
                    let net = self.collect_until(|t| t.is_op(",") || t.is_op(")"));
                    if net.is_empty() {
                        break;
                    }
                    connections.push((String::new(), net.join(" ")));
                }
            }
            self.eat_op(")");
        }
        self.eat_op(";");
        trace!(%module_name, %instance_name, "instance");
        self.module.instances.push(Instance {
            module_name,
            instance_name,
            connections,
            line,
        });
    }
}

impl Parser {
    // ---- procedural statements ----

    /// Parses one statement; `begin ... end` flattens into its children.
    fn parse_statement(&mut self) -> Vec<StmtId> {
        let Some(tok) = self.peek() else {
            return Vec::new();
        };
        let kind = tok.kind;
        let is_case_variant = matches!(tok.text.as_str(), "casex" | "casez");
        let is_semicolon = tok.is_op(";");
        let is_delay = tok.is_op("#");

        match kind {
            TokenKind::Keyword(Keyword::Begin) => self.parse_block(),
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::Case) => self.parse_case(),
            TokenKind::Identifier if is_case_variant => self.parse_case(),
            TokenKind::Identifier => self.parse_assignment(),
            TokenKind::Keyword(
                Keyword::End | Keyword::Endcase | Keyword::Endmodule | Keyword::Else,
            ) => Vec::new(),
            TokenKind::Keyword(Keyword::For | Keyword::While | Keyword::Repeat) => {
                self.pos += 1;
                self.paren_text();
                self.skip_loop_body();
                Vec::new()
            }
            TokenKind::Keyword(Keyword::Forever) => {
                self.pos += 1;
                self.skip_loop_body();
                Vec::new()
            }
            TokenKind::Operator if is_semicolon => {
                self.pos += 1;
                Vec::new()
            }
            TokenKind::Operator if is_delay => {
                // `#10 stmt`
                self.pos += 1;
                if self
                    .peek()
                    .is_some_and(|t| matches!(t.kind, TokenKind::Number | TokenKind::Identifier))
                {
                    self.pos += 1;
                }
                self.parse_statement()
            }
            _ => {
                self.skip_to_semicolon();
                Vec::new()
            }
        }
    }

    /// Loops are not executed. The body is parsed so that its `begin`/`end`
    /// pairs stay balanced, then left unreferenced.
    fn skip_loop_body(&mut self) {
        let skipped = self.parse_statement();
        trace!(statements = skipped.len(), "loop body not simulated");
    }

    fn parse_block(&mut self) -> Vec<StmtId> {
        self.pos += 1;
        // Named block: `begin : label`
        if self.at_op(":") && self.peek_at(1).is_some_and(|t| t.kind == TokenKind::Identifier) {
            self.pos += 2;
        }
        let mut body = Vec::new();
        loop {
            if self.at_end() || self.at_keyword(Keyword::Endmodule) {
                break;
            }
            if self.eat_keyword(Keyword::End) {
                break;
            }
            let before = self.pos;
            body.extend(self.parse_statement());
            if self.pos == before {
                // Stray `else` or `endcase`.
                self.pos += 1;
            }
        }
        body
    }

    fn parse_if(&mut self) -> Vec<StmtId> {
        self.pos += 1;
        let condition = strip_outer_parens(&self.paren_text());
        let then_body = self.parse_statement();
        let else_body = if self.eat_keyword(Keyword::Else) {
            self.parse_statement()
        } else {
            Vec::new()
        };
        vec![self.module.statements.alloc(Statement::If {
            condition,
            then_body,
            else_body,
        })]
    }

    fn parse_case(&mut self) -> Vec<StmtId> {
        self.pos += 1;
        let subject = strip_outer_parens(&self.paren_text());
        let mut arms = Vec::new();
        let mut default = Vec::new();
        loop {
            if self.at_end() || self.at_keyword(Keyword::Endmodule) {
                break;
            }
            if self.eat_keyword(Keyword::Endcase) {
                break;
            }
            if self.eat_keyword(Keyword::Default) {
                self.eat_op(":");
                default = self.parse_statement();
                continue;
            }
            let label_words = self.collect_until(|t| {
                t.is_op(":") || t.is_keyword(Keyword::Endcase) || t.is_keyword(Keyword::End)
            });
            if !self.eat_op(":") {
                if label_words.is_empty() {
                    self.pos += 1;
                }
                continue;
            }
            let labels = split_top_level_commas(&label_words);
            let body = self.parse_statement();
            arms.push(CaseArm { labels, body });
        }
        vec![self.module.statements.alloc(Statement::Case {
            subject,
            arms,
            default,
        })]
    }

    fn parse_assignment(&mut self) -> Vec<StmtId> {
        let line = self.current_line();
        let Some(target) = self.eat_identifier() else {
            return Vec::new();
        };
        while self.at_op("[") {
            self.parse_range_width();
        }
        let blocking = if self.eat_op("=") {
            true
        } else if self.eat_op("<=") {
            false
        } else {
            self.skip_to_semicolon();
            return Vec::new();
        };
        // Intra-assignment delay: `q <= #1 d;`
        if self.eat_op("#") {
            self.pos += 1;
        }
        let expr = self.collect_until(|t| {
            t.is_op(";") || t.is_keyword(Keyword::End) || t.is_keyword(Keyword::Endcase)
        });
        self.eat_op(";");
        vec![self.module.statements.alloc(Statement::Assign {
            target,
            expr: expression_text(&expr),
            blocking,
            line,
        })]
    }
}

/// Space-joins expression tokens, removing one pair of parentheses that wraps
/// the whole expression.
fn expression_text(words: &[String]) -> String {
    strip_outer_parens(&words.join(" "))
}

fn strip_outer_parens(text: &str) -> String {
    let trimmed = text.trim();
    if let Some(inner) = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        if parens_balanced(inner) {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// `true` if no prefix of `text` closes more parentheses than it opens.
fn parens_balanced(text: &str) -> bool {
    let mut depth = 0i32;
    for ch in text.chars() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn split_top_level_commas(words: &[String]) -> Vec<String> {
    let mut labels = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut depth = 0i32;
    for word in words {
        match word.as_str() {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth -= 1,
            "," if depth == 0 => {
                labels.push(current.join(" "));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(word);
    }
    if !current.is_empty() {
        labels.push(current.join(" "));
    }
    labels
}

/// Identifiers that can name a module or an instance. Rules out system
/// tasks and procedural words the lexer leaves as identifiers.
fn is_instance_name(text: &str) -> bool {
    !text.starts_with('$') && !matches!(text, "initial" | "final" | "generate")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(m: &Module, id: StmtId) -> &Statement {
        &m.statements[id]
    }

    #[test]
    fn no_module_returns_none() {
        assert!(parse_module("").is_none());
        assert!(parse_module("wire a; assign a = 1;").is_none());
        assert!(parse_module("module ; endmodule").is_none());
    }

    #[test]
    fn empty_module_is_valid() {
        let m = parse_module("module t(); endmodule").unwrap();
        assert_eq!(m.name, "t");
        assert!(m.ports.is_empty());
        assert!(m.always_blocks.is_empty());
    }

    #[test]
    fn ansi_ports() {
        let m = parse_module(
            "module t(input clk, input [7:0] a, b, output reg [3:0] q, inout wire io);\nendmodule",
        )
        .unwrap();
        let ports: Vec<_> = m
            .ports
            .iter()
            .map(|p| (p.name.as_str(), p.direction, p.width))
            .collect();
        assert_eq!(
            ports,
            vec![
                ("clk", PortDirection::Input, 1),
                ("a", PortDirection::Input, 8),
                ("b", PortDirection::Input, 8),
                ("q", PortDirection::Output, 4),
                ("io", PortDirection::Inout, 1),
            ]
        );
        let q = m.signal("q").unwrap();
        assert_eq!(q.kind, SignalKind::Reg);
        assert_eq!(q.width, 4);
    }

    #[test]
    fn non_ansi_ports_and_signals() {
        let src = "\
module counter(clk, count);
  input clk;
  output [3:0] count;
  reg [3:0] count = 4'd2;
  wire signed [0:7] rev;
  reg a, b;
endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.ports.len(), 2);
        assert_eq!(m.ports[1].width, 4);
        assert_eq!(m.ports[1].line, 3);
        let count = m.signal("count").unwrap();
        assert_eq!(count.initial_value, Some(2));
        assert_eq!(count.line, 4);
        let rev = m.signal("rev").unwrap();
        assert_eq!(rev.width, 8);
        assert!(rev.signed);
        assert!(m.signal("a").is_some());
        assert!(m.signal("b").is_some());
    }

    #[test]
    fn parameters_resolve_widths() {
        let src = "\
module p #(parameter WIDTH = 8) (input [WIDTH-1:0] d);
  localparam DEPTH = 4, HALF = 2;
  reg [DEPTH*2-1:0] r;
endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.parameters.len(), 3);
        assert_eq!(m.parameter("WIDTH").unwrap().value, 8);
        assert!(m.parameter("DEPTH").unwrap().local);
        assert_eq!(m.ports[0].width, 8);
        assert_eq!(m.signal("r").unwrap().width, 8);
    }

    #[test]
    fn unresolvable_width_defaults_to_one() {
        let m = parse_module("module u(input [N-1:0] d); endmodule").unwrap();
        assert_eq!(m.ports[0].width, 1);
    }

    #[test]
    fn continuous_assigns() {
        let src = "\
module a(input x, input y, output z, output w);
  assign z = (x & y);
  assign w = x;
  wire n = ~x;
endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.assigns.len(), 3);
        assert_eq!(m.assigns[0].target, "z");
        assert_eq!(m.assigns[0].expression_text, "x & y");
        assert_eq!(m.assigns[0].source_line, 2);
        assert_eq!(m.assigns[1].expression_text, "x");
        assert_eq!(m.assigns[2].target, "n");
        assert_eq!(m.assigns[2].expression_text, "~ x");
    }

    #[test]
    fn single_statement_always() {
        let m = parse_module(
            "module t(input clk, output reg q); always @(posedge clk) q = 1; endmodule",
        )
        .unwrap();
        assert_eq!(m.always_blocks.len(), 1);
        let block = &m.always_blocks[0];
        assert_eq!(block.sensitivity_list, vec!["posedge", "clk"]);
        assert_eq!(block.body.len(), 1);
        assert_eq!(block.statement_text(&m.statements), vec!["q = 1;"]);
    }

    #[test]
    fn sensitivity_list_forms() {
        let src = "\
module s(input a, input b, input clk, input rst);
  reg x, y, z;
  always @(a or b) x = a;
  always @(posedge clk, negedge rst) y <= 1;
  always @* z = b;
endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.always_blocks[0].sensitivity_list, vec!["a", "b"]);
        assert_eq!(
            m.always_blocks[1].sensitivity_list,
            vec!["posedge", "clk", "negedge", "rst"]
        );
        assert_eq!(m.always_blocks[2].sensitivity_list, vec!["*"]);
        assert_eq!(m.always_blocks[2].source_line, 5);
    }

    #[test]
    fn nested_statement_tree() {
        let src = "\
module c(input clk, input rst, input en, output reg [3:0] count);
  always @(posedge clk) begin
    if (rst)
      count <= 0;
    else if (en) begin
      count <= count + 1;
    end
  end
endmodule";
        let m = parse_module(src).unwrap();
        let block = &m.always_blocks[0];
        assert_eq!(block.body.len(), 1);
        let Statement::If {
            condition,
            then_body,
            else_body,
        } = stmt(&m, block.body[0])
        else {
            panic!("expected if");
        };
        assert_eq!(condition, "rst");
        assert_eq!(then_body.len(), 1);
        assert_eq!(else_body.len(), 1);
        let Statement::If {
            condition,
            then_body,
            ..
        } = stmt(&m, else_body[0])
        else {
            panic!("expected nested if");
        };
        assert_eq!(condition, "en");
        match stmt(&m, then_body[0]) {
            Statement::Assign {
                target,
                expr,
                blocking,
                line,
            } => {
                assert_eq!(target, "count");
                assert_eq!(expr, "count + 1");
                assert!(!blocking);
                assert_eq!(*line, 6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn case_statement() {
        let src = "\
module mux(input [1:0] sel, input a, input b, output reg y);
  always @(*) begin
    case (sel)
      2'b00: y = a;
      2'b01, 2'b10: y = b;
      default: y = 0;
    endcase
  end
endmodule";
        let m = parse_module(src).unwrap();
        let block = &m.always_blocks[0];
        let Statement::Case {
            subject,
            arms,
            default,
        } = stmt(&m, block.body[0])
        else {
            panic!("expected case");
        };
        assert_eq!(subject, "sel");
        assert_eq!(arms.len(), 2);
        assert_eq!(arms[1].labels, vec!["2'b01", "2'b10"]);
        assert_eq!(default.len(), 1);
        assert_eq!(m.assigned_targets(&block.body), vec!["y"]);
    }

    #[test]
    fn statement_ids_are_module_wide() {
        let src = "\
module two(input clk, output reg a, output reg b);
  always @(posedge clk) begin a = 1; a = 0; end
  always @(posedge clk) if (a) b = 1; else b = 0;
endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.statements.len(), 5);
        let texts = m.always_blocks[1].statement_text(&m.statements);
        assert_eq!(texts, vec!["if (a) b = 1; else b = 0;"]);
    }

    #[test]
    fn instances() {
        let src = "\
module top(input clk);
  wire [3:0] c;
  counter #(.W(4)) u0 (.clk(clk), .count(c));
  inv u1 (clk, n);
endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.instances.len(), 2);
        assert_eq!(m.instances[0].module_name, "counter");
        assert_eq!(m.instances[0].instance_name, "u0");
        assert_eq!(
            m.instances[0].connections,
            vec![
                ("clk".to_string(), "clk".to_string()),
                ("count".to_string(), "c".to_string())
            ]
        );
        assert_eq!(m.instances[1].connections[1], (String::new(), "n".to_string()));
    }

    #[test]
    fn initial_blocks_are_not_instances() {
        let src = "\
module top(input clk);
  initial $display (\"x\");
  initial begin $dumpvars (0, top); end
  inv u1 (clk, n);
endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.instances.len(), 1);
        assert_eq!(m.instances[0].module_name, "inv");
    }

    #[test]
    fn only_first_module_is_parsed() {
        let src = "module a(input x); endmodule\nmodule b(input y); endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.name, "a");
        assert_eq!(m.ports.len(), 1);
    }

    #[test]
    fn functions_are_skipped() {
        let src = "\
module f(input a, output y);
  function inv; input v; inv = ~v; endfunction
  assign y = a;
endmodule";
        let m = parse_module(src).unwrap();
        assert_eq!(m.ports.len(), 2);
        assert_eq!(m.assigns.len(), 1);
    }

    #[test]
    fn malformed_input_does_not_panic() {
        for src in [
            "module",
            "module m(",
            "module m; always @(",
            "module m; always begin if ( end",
            "module m; case",
            "module m; assign = ;",
            "module m; reg [",
            "module m; always @(posedge clk) case (s) : ; endcase",
            "module m; foo #(",
        ] {
            let _ = parse_module(src);
        }
    }

    #[test]
    fn strip_parens_only_when_wrapping() {
        assert_eq!(strip_outer_parens("(a + b)"), "a + b");
        assert_eq!(strip_outer_parens("(a) & (b)"), "(a) & (b)");
        assert_eq!(strip_outer_parens("a"), "a");
    }
}
