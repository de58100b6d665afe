//! Math formula handling for LaTeX to DOCX conversion
//!
//! A math-mode string is parsed into a [`MathNode`] tree by a small
//! recursive-descent parser, then written out as Office Math Markup
//! (OMML). Symbol commands resolve to glyphs during parsing, so a glyph
//! can be the base of a script (`\nabla_x`) but structural output is never
//! re-scanned.

use std::fmt::Write;

use crate::data::symbols::{function_name, lookup_symbol};

use super::utils::{escape_xml, extract_braced};

/// Nesting limit for braces and structural arguments
const MAX_DEPTH: usize = 64;

/// A node of a parsed math expression
#[derive(Debug, Clone, PartialEq)]
pub enum MathNode {
    /// Literal characters
    Run(String),
    /// Glyph produced by a symbol command
    Symbol(&'static str),
    /// Upright literal text (`\text`, `\mathrm`, `\operatorname`)
    Text(String),
    /// Upright function name (`\sin`, `\log`)
    Function(&'static str),
    /// `\frac{num}{den}`
    Fraction {
        num: Vec<MathNode>,
        den: Vec<MathNode>,
    },
    /// `\sqrt[degree]{body}`
    Radical {
        degree: Vec<MathNode>,
        body: Vec<MathNode>,
    },
    /// `base_sub`
    Subscript {
        base: Vec<MathNode>,
        sub: Vec<MathNode>,
    },
    /// `base^sup`
    Superscript {
        base: Vec<MathNode>,
        sup: Vec<MathNode>,
    },
    /// `base_sub^sup`
    SubSup {
        base: Vec<MathNode>,
        sub: Vec<MathNode>,
        sup: Vec<MathNode>,
    },
    /// `{...}` group, rendered inline but acting as one atom for scripts
    Group(Vec<MathNode>),
}

// =============================================================================
// Parser
// =============================================================================

/// Recursive-descent parser over one math-mode string
pub struct MathParser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> MathParser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse the whole input
    pub fn parse(mut self) -> Vec<MathNode> {
        self.parse_sequence(false)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    /// Parse nodes until end of input, or until a closing brace when `in_group`
    fn parse_sequence(&mut self, in_group: bool) -> Vec<MathNode> {
        let mut nodes = Vec::new();
        while let Some(ch) = self.peek() {
            match ch {
                '}' => {
                    self.bump();
                    if in_group {
                        return nodes;
                    }
                    push_literal(&mut nodes, "}");
                }
                '{' => {
                    let group = self.parse_group();
                    nodes.push(MathNode::Group(group));
                }
                '_' | '^' => {
                    self.bump();
                    let base = pop_base(&mut nodes);
                    let script = self.parse_argument();
                    nodes.push(attach_script(base, ch, script));
                }
                '\\' => {
                    if let Some(node) = self.parse_command() {
                        match node {
                            MathNode::Run(text) => push_literal(&mut nodes, &text),
                            other => nodes.push(other),
                        }
                    }
                }
                '&' => {
                    // alignment marker
                    self.bump();
                }
                '~' => {
                    self.bump();
                    push_literal(&mut nodes, " ");
                }
                _ => {
                    self.bump();
                    let mut buf = [0u8; 4];
                    push_literal(&mut nodes, ch.encode_utf8(&mut buf));
                }
            }
        }
        nodes
    }

    /// Parse a `{...}` group at the current position
    fn parse_group(&mut self) -> Vec<MathNode> {
        if self.depth >= MAX_DEPTH {
            // Too deep: keep the raw text rather than recursing further
            return match extract_braced(self.src, self.pos) {
                Some((inner, end)) => {
                    self.pos = end;
                    vec![MathNode::Run(inner.to_string())]
                }
                None => {
                    let rest = self.src[self.pos + 1..].to_string();
                    self.pos = self.src.len();
                    vec![MathNode::Run(rest)]
                }
            };
        }
        self.bump();
        self.depth += 1;
        let nodes = self.parse_sequence(true);
        self.depth -= 1;
        nodes
    }

    /// Parse one argument: a braced group or a single token
    fn parse_argument(&mut self) -> Vec<MathNode> {
        self.skip_whitespace();
        match self.peek() {
            None => Vec::new(),
            Some('{') => self.parse_group(),
            Some('\\') => self.parse_command().into_iter().collect(),
            Some('}') => Vec::new(),
            Some(ch) => {
                self.bump();
                vec![MathNode::Run(ch.to_string())]
            }
        }
    }

    /// Raw text of one argument, for text-like commands
    fn raw_argument(&mut self) -> String {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => match extract_braced(self.src, self.pos) {
                Some((inner, end)) => {
                    self.pos = end;
                    inner.to_string()
                }
                None => {
                    let rest = self.src[self.pos + 1..].to_string();
                    self.pos = self.src.len();
                    rest
                }
            },
            Some('}') | None => String::new(),
            Some(_) => self.bump().map(String::from).unwrap_or_default(),
        }
    }

    /// Parse `[...]` if present
    fn parse_optional(&mut self) -> Vec<MathNode> {
        self.skip_whitespace();
        if self.peek() != Some('[') {
            return Vec::new();
        }
        self.bump();
        let start = self.pos;
        let end = match self.src[start..].find(']') {
            Some(rel) => start + rel,
            None => self.src.len(),
        };
        self.pos = (end + 1).min(self.src.len());
        let mut inner = MathParser::new(&self.src[start..end]);
        inner.depth = self.depth + 1;
        inner.parse_sequence(false)
    }

    /// Read the command name after a backslash
    fn command_name(&mut self) -> &'a str {
        let src = self.src;
        self.bump();
        let start = self.pos;
        let rest = &src[start..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if len > 0 {
            self.pos += len;
            &src[start..start + len]
        } else {
            match self.bump() {
                Some(ch) => &src[start..start + ch.len_utf8()],
                None => "",
            }
        }
    }

    /// Parse a command at the current backslash; `None` when it renders nothing
    fn parse_command(&mut self) -> Option<MathNode> {
        let name = self.command_name();
        if name.is_empty() {
            return Some(MathNode::Run("\\".to_string()));
        }
        if self.depth >= MAX_DEPTH {
            return Some(MathNode::Run(format!("\\{}", name)));
        }
        self.depth += 1;
        let node = self.command_node(name);
        self.depth -= 1;
        node
    }

    fn command_node(&mut self, name: &'a str) -> Option<MathNode> {
        match name {
            "frac" | "dfrac" | "tfrac" | "cfrac" => {
                let num = self.parse_argument();
                let den = self.parse_argument();
                Some(MathNode::Fraction { num, den })
            }
            "sqrt" => {
                let degree = self.parse_optional();
                let body = self.parse_argument();
                Some(MathNode::Radical { degree, body })
            }
            "text" | "textrm" | "textnormal" | "mathrm" | "operatorname" | "mbox" => {
                Some(MathNode::Text(self.raw_argument()))
            }
            "mathbf" | "mathit" | "mathcal" | "mathbb" | "mathsf" | "boldsymbol" | "bm" => {
                Some(MathNode::Group(self.parse_argument()))
            }
            "left" | "right" | "big" | "Big" | "bigg" | "Bigg" | "bigl" | "bigr" | "Bigl"
            | "Bigr" => {
                self.skip_whitespace();
                if self.peek() == Some('.') {
                    self.bump();
                }
                None
            }
            "limits" | "nolimits" | "displaystyle" | "textstyle" | "scriptstyle" => None,
            _ => {
                let token = format!("\\{}", name);
                if let Some(glyph) = lookup_symbol(&token) {
                    if glyph.is_empty() {
                        None
                    } else {
                        Some(MathNode::Symbol(glyph))
                    }
                } else if let Some(function) = function_name(name) {
                    Some(MathNode::Function(function))
                } else {
                    Some(MathNode::Run(token))
                }
            }
        }
    }
}

/// Append literal text, merging with a preceding run
fn push_literal(nodes: &mut Vec<MathNode>, text: &str) {
    if let Some(MathNode::Run(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(MathNode::Run(text.to_string()));
    }
}

/// Take the atom a script attaches to: the last character of a run, or the last node
fn pop_base(nodes: &mut Vec<MathNode>) -> Vec<MathNode> {
    let Some(last) = nodes.pop() else {
        return Vec::new();
    };
    match last {
        MathNode::Run(mut text) => {
            text.truncate(text.trim_end().len());
            match text.pop() {
                Some(ch) => {
                    if !text.is_empty() {
                        nodes.push(MathNode::Run(text));
                    }
                    vec![MathNode::Run(ch.to_string())]
                }
                None => pop_base(nodes),
            }
        }
        MathNode::Group(children) => children,
        other => vec![other],
    }
}

/// Combine a base and a script, merging `x_a^b` into one node
fn attach_script(base: Vec<MathNode>, op: char, script: Vec<MathNode>) -> MathNode {
    match (base.as_slice(), op) {
        ([MathNode::Subscript { .. }], '^') | ([MathNode::Superscript { .. }], '_') => {
            match base.into_iter().next() {
                Some(MathNode::Subscript { base, sub }) => MathNode::SubSup {
                    base,
                    sub,
                    sup: script,
                },
                Some(MathNode::Superscript { base, sup }) => MathNode::SubSup {
                    base,
                    sub: script,
                    sup,
                },
                _ => unreachable!("matched single script node"),
            }
        }
        (_, '_') => MathNode::Subscript { base, sub: script },
        _ => MathNode::Superscript { base, sup: script },
    }
}

// =============================================================================
// OMML writer
// =============================================================================

/// Write a literal OMML run
fn write_run(out: &mut String, text: &str) {
    let escaped = escape_xml(text);
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        let _ = write!(out, "<m:r><m:t xml:space=\"preserve\">{}</m:t></m:r>", escaped);
    } else {
        let _ = write!(out, "<m:r><m:t>{}</m:t></m:r>", escaped);
    }
}

/// Write a sequence of nodes, coalescing adjacent literal runs and glyphs
pub fn write_nodes(nodes: &[MathNode], out: &mut String) {
    let mut pending = String::new();
    for node in nodes {
        match node {
            MathNode::Run(text) => pending.push_str(text),
            MathNode::Symbol(glyph) => pending.push_str(glyph),
            _ => {
                if !pending.is_empty() {
                    write_run(out, &pending);
                    pending.clear();
                }
                write_node(node, out);
            }
        }
    }
    if !pending.is_empty() {
        write_run(out, &pending);
    }
}

fn write_wrapped(tag: &str, nodes: &[MathNode], out: &mut String) {
    let _ = write!(out, "<m:{}>", tag);
    write_nodes(nodes, out);
    let _ = write!(out, "</m:{}>", tag);
}

fn write_node(node: &MathNode, out: &mut String) {
    match node {
        MathNode::Run(text) => write_run(out, text),
        MathNode::Symbol(glyph) => write_run(out, glyph),
        MathNode::Text(text) => {
            let _ = write!(
                out,
                "<m:r><m:rPr><m:nor/></m:rPr><m:t xml:space=\"preserve\">{}</m:t></m:r>",
                escape_xml(text)
            );
        }
        MathNode::Function(name) => {
            let _ = write!(
                out,
                "<m:r><m:rPr><m:sty m:val=\"p\"/></m:rPr><m:t>{}</m:t></m:r>",
                name
            );
        }
        MathNode::Fraction { num, den } => {
            out.push_str("<m:f>");
            write_wrapped("num", num, out);
            write_wrapped("den", den, out);
            out.push_str("</m:f>");
        }
        MathNode::Radical { degree, body } => {
            out.push_str("<m:rad>");
            if degree.is_empty() {
                out.push_str("<m:radPr><m:degHide m:val=\"1\"/></m:radPr><m:deg/>");
            } else {
                write_wrapped("deg", degree, out);
            }
            write_wrapped("e", body, out);
            out.push_str("</m:rad>");
        }
        MathNode::Subscript { base, sub } => {
            out.push_str("<m:sSub>");
            write_wrapped("e", base, out);
            write_wrapped("sub", sub, out);
            out.push_str("</m:sSub>");
        }
        MathNode::Superscript { base, sup } => {
            out.push_str("<m:sSup>");
            write_wrapped("e", base, out);
            write_wrapped("sup", sup, out);
            out.push_str("</m:sSup>");
        }
        MathNode::SubSup { base, sub, sup } => {
            out.push_str("<m:sSubSup>");
            write_wrapped("e", base, out);
            write_wrapped("sub", sub, out);
            write_wrapped("sup", sup, out);
            out.push_str("</m:sSubSup>");
        }
        MathNode::Group(children) => write_nodes(children, out),
    }
}

// =============================================================================
// Public entry points
// =============================================================================

/// Parse a math-mode string into a node tree
pub fn parse_math(expr: &str) -> Vec<MathNode> {
    MathParser::new(expr.trim()).parse()
}

/// Render a math-mode string as a single `<m:oMath>` element.
///
/// The result always holds exactly one math container with at least one
/// child; input the parser produces nothing for becomes an empty run.
pub fn render_math(expr: &str) -> String {
    let nodes = parse_math(expr);
    let mut out = String::from("<m:oMath>");
    let before = out.len();
    write_nodes(&nodes, &mut out);
    if out.len() == before {
        out.push_str("<m:r><m:t></m:t></m:r>");
    }
    out.push_str("</m:oMath>");
    out
}
