//! Logos-based parser for HTTP path templates.
//!
//! Grammar:
//!
//! ```text
//! Template = "/" Segments [ ":" Verb ]
//! Segments = Segment { "/" Segment }
//! Segment  = "*" | "**" | LITERAL | Variable
//! Variable = "{" FieldPath [ "=" Segments ] "}"
//! ```
//!
//! Problems are collected rather than returned early, so one template can
//! yield several messages.

use logos::Logos;

use crate::diagnostics::Severity;
use crate::graph::PathSegment;

/// Template tokens. Literal text is anything but the five delimiters.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum TemplateToken {
    #[token("/")]
    Slash,
    #[token("*")]
    Star,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("=")]
    Equals,
    #[regex(r"[^/*{}=]+")]
    Literal,
}

const DELIMITERS: &[char] = &['/', '*', '{', '}', '='];

/// A successfully parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTemplate {
    pub segments: Vec<PathSegment>,
    pub custom_verb: Option<String>,
}

impl ParsedTemplate {
    /// Field paths of all variables, outermost first.
    pub fn field_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        collect_field_paths(&self.segments, &mut paths);
        paths
    }
}

fn collect_field_paths<'a>(segments: &'a [PathSegment], out: &mut Vec<&'a str>) {
    for segment in segments {
        if let PathSegment::Variable {
            field_path,
            template,
        } = segment
        {
            out.push(field_path);
            collect_field_paths(template, out);
        }
    }
}

/// A problem found in a template. Messages carry the template as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateProblem {
    pub severity: Severity,
    pub message: String,
}

/// Parse a path template. Returns `None` when an error was found.
pub fn parse_template(template: &str) -> (Option<ParsedTemplate>, Vec<TemplateProblem>) {
    let mut parser = TemplateParser::new(template);
    let parsed = parser.parse();
    (parsed, parser.problems)
}

struct TemplateParser<'t> {
    template: &'t str,
    tokens: Vec<(TemplateToken, &'t str)>,
    pos: usize,
    prev: Option<&'t str>,
    custom_verb: Option<String>,
    slash_before_verb: bool,
    started_with_slash: bool,
    had_errors: bool,
    problems: Vec<TemplateProblem>,
}

impl<'t> TemplateParser<'t> {
    fn new(template: &'t str) -> Self {
        let (path, custom_verb, slash_before_verb) = split_custom_verb(template);
        let mut lexer = TemplateToken::lexer(path);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next() {
            let kind = token.unwrap_or(TemplateToken::Literal);
            tokens.push((kind, lexer.slice().trim()));
        }
        Self {
            template,
            tokens,
            pos: 0,
            prev: None,
            custom_verb: custom_verb.map(str::to_string),
            slash_before_verb,
            started_with_slash: false,
            had_errors: false,
            problems: Vec::new(),
        }
    }

    fn parse(&mut self) -> Option<ParsedTemplate> {
        if self.template == "/" {
            return Some(ParsedTemplate {
                segments: vec![PathSegment::Literal(String::new())],
                custom_verb: None,
            });
        }
        let segments = self.parse_segments(true, false);
        if !self.started_with_slash {
            self.error("effective path must start with leading '/'.".to_string());
        }
        if let Some((_, text)) = self.current() {
            self.error(format!("unrecognized input at '{text}'."));
        }
        if self.slash_before_verb {
            self.warning("Token '/:' before a custom verb is not currently supported.".to_string());
        }
        if self.had_errors {
            return None;
        }
        Some(ParsedTemplate {
            segments,
            custom_verb: self.custom_verb.take(),
        })
    }

    fn parse_segments(&mut self, mut first_segment: bool, sub_path: bool) -> Vec<PathSegment> {
        if self.looking_at(TemplateToken::Slash) {
            self.shift();
            if first_segment {
                first_segment = false;
                self.started_with_slash = true;
            } else {
                self.error("leading '/' only allowed for first segment of path.".to_string());
            }
        }
        let mut segments = Vec::new();
        loop {
            let Some((kind, text)) = self.shift() else {
                break;
            };
            match kind {
                TemplateToken::Star => {
                    if self.looking_at(TemplateToken::Star) {
                        self.shift();
                        segments.push(PathSegment::PathWildcard);
                    } else {
                        segments.push(PathSegment::Wildcard);
                    }
                }
                TemplateToken::LBrace => segments.push(self.parse_variable(first_segment, sub_path)),
                _ => segments.push(PathSegment::Literal(text.to_string())),
            }
            first_segment = false;
            if self.looking_at(TemplateToken::Slash) {
                self.shift();
            } else {
                break;
            }
        }
        segments
    }

    fn parse_variable(&mut self, first_segment: bool, sub_path: bool) -> PathSegment {
        let field_path = self.shift().map(|(_, text)| text.to_string()).unwrap_or_default();
        if self.looking_at(TemplateToken::Equals) {
            self.shift();
            if sub_path {
                self.error("cannot have fields in nested paths.".to_string());
            }
            let template = self.parse_segments(first_segment, true);
            self.expect(TemplateToken::RBrace, "}");
            PathSegment::Variable {
                field_path,
                template,
            }
        } else {
            self.expect(TemplateToken::RBrace, "}");
            PathSegment::Variable {
                field_path,
                template: vec![PathSegment::Wildcard],
            }
        }
    }

    // ============================================================
    // Token Stream
    // ============================================================

    fn current(&self) -> Option<(TemplateToken, &'t str)> {
        self.tokens.get(self.pos).copied()
    }

    fn looking_at(&self, kind: TemplateToken) -> bool {
        self.current().is_some_and(|(k, _)| k == kind)
    }

    fn shift(&mut self) -> Option<(TemplateToken, &'t str)> {
        let current = self.current();
        match current {
            Some((_, text)) => {
                self.prev = Some(text);
                self.pos += 1;
            }
            None => {
                let prev = self.prev.unwrap_or("");
                self.error(format!("unexpected end of input '{prev}'."));
            }
        }
        current
    }

    fn expect(&mut self, kind: TemplateToken, text: &str) {
        if self.looking_at(kind) {
            self.shift();
            return;
        }
        let found = match self.current() {
            Some((_, current)) => format!("'{current}'"),
            None => "end of input".to_string(),
        };
        self.error(format!("expected '{text}', looking at {found}."));
    }

    fn error(&mut self, message: String) {
        self.had_errors = true;
        self.problem(Severity::Error, message);
    }

    fn warning(&mut self, message: String) {
        self.problem(Severity::Warning, message);
    }

    fn problem(&mut self, severity: Severity, message: String) {
        self.problems.push(TemplateProblem {
            severity,
            message: format!("In path template '{}': {}", self.template, message),
        });
    }
}

/// Split a trailing `:verb` off the template.
///
/// The verb is the text after the first colon of the last segment. A single
/// slash right before the colon is dropped with the verb and flagged; after a
/// double slash there is no verb at all.
fn split_custom_verb(template: &str) -> (&str, Option<&str>, bool) {
    let tail_start = template
        .rfind(DELIMITERS)
        .map_or(0, |i| i + 1);
    let Some(colon) = template[tail_start..].find(':').map(|i| tail_start + i) else {
        return (template, None, false);
    };
    let verb = &template[colon + 1..];
    if verb.is_empty() {
        return (template, None, false);
    }
    let before = &template[..colon];
    match before.strip_suffix('/') {
        Some(rest) if rest.ends_with('/') => (template, None, false),
        Some(rest) => (rest, Some(verb), true),
        None => (before, Some(verb), false),
    }
}
