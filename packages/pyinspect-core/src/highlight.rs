//! Python syntax highlighting for source shown in reports.
//!
//! Lines are parsed together with tree-sitter so multi-line strings keep
//! their class across line breaks. Fragments that do not parse on their own
//! (a lone `return x`, half a call) still yield tokens from the
//! error-recovered tree.

use std::ops::Range;

use tree_sitter::{Node, Parser, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    /// A name being defined or called.
    Function,
    Name,
    String,
    Number,
    /// `True`, `False`, `None`
    Constant,
    Operator,
    Comment,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    pub text: String,
}

impl Token {
    fn new(class: TokenClass, text: &str) -> Self {
        Token {
            class,
            text: text.to_string(),
        }
    }
}

const OPERATOR_CHARS: &str = "+-*/%@&|^~<>=!";

fn parse(source: &str) -> Option<Tree> {
    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(tree_sitter_python::language()) {
        log::debug!("failed to load tree-sitter-python: {}", e);
        return None;
    }
    parser.parse(source, None)
}

/// The node is the callee of a call, or the name of a `def`/`class`.
fn is_function_name(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "call" => parent.child_by_field_name("function") == Some(node),
        "function_definition" | "class_definition" => parent.child_by_field_name("name") == Some(node),
        "attribute" => {
            parent.child_by_field_name("attribute") == Some(node)
                && parent
                    .parent()
                    .filter(|call| call.kind() == "call")
                    .and_then(|call| call.child_by_field_name("function"))
                    == Some(parent)
        }
        _ => false,
    }
}

fn node_class(node: Node<'_>) -> Option<TokenClass> {
    let kind = node.kind();
    match kind {
        "string" => Some(TokenClass::String),
        "comment" => Some(TokenClass::Comment),
        "integer" | "float" => Some(TokenClass::Number),
        "true" | "false" | "none" => Some(TokenClass::Constant),
        "identifier" if is_function_name(node) => Some(TokenClass::Function),
        "identifier" => Some(TokenClass::Name),
        _ if node.is_named() => None,
        _ if !kind.is_empty() && kind.chars().all(|c| c.is_ascii_alphabetic()) => Some(TokenClass::Keyword),
        _ if !kind.is_empty() && kind.chars().all(|c| OPERATOR_CHARS.contains(c)) => Some(TokenClass::Operator),
        _ => None,
    }
}

fn collect(node: Node<'_>, spans: &mut Vec<(Range<usize>, TokenClass)>) {
    if let Some(class) = node_class(node) {
        if node.start_byte() < node.end_byte() {
            spans.push((node.byte_range(), class));
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, spans);
    }
}

/// Splits `source` into classed tokens. Concatenating the token texts gives
/// back `source`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut spans = Vec::new();
    if let Some(tree) = parse(source) {
        collect(tree.root_node(), &mut spans);
    }
    spans.sort_by_key(|(range, _)| range.start);

    let mut tokens = Vec::new();
    let mut cursor = 0;
    for (range, class) in spans {
        if range.start < cursor {
            continue;
        }
        let Some(text) = source.get(range.clone()) else {
            continue;
        };
        if range.start > cursor {
            tokens.push(Token::new(TokenClass::Plain, &source[cursor..range.start]));
        }
        tokens.push(Token::new(class, text));
        cursor = range.end;
    }
    if cursor < source.len() {
        tokens.push(Token::new(TokenClass::Plain, &source[cursor..]));
    }
    tokens
}

fn common_indent<S: AsRef<str>>(lines: &[S]) -> usize {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count())
        .min()
        .unwrap_or(0)
}

fn split_margin(line: &str, indent: usize) -> (&str, &str) {
    let at = indent.min(line.len());
    if line.is_char_boundary(at) {
        line.split_at(at)
    } else {
        (line, "")
    }
}

/// Highlights a block of source lines, one token row per input line. The
/// shared indentation is stripped before parsing and kept as plain text.
pub fn highlight_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<Token>> {
    if lines.is_empty() {
        return Vec::new();
    }
    let indent = common_indent(lines);
    let (margins, bodies): (Vec<&str>, Vec<&str>) = lines
        .iter()
        .map(|line| split_margin(line.as_ref(), indent))
        .unzip();

    let mut rows: Vec<Vec<Token>> = vec![Vec::new()];
    for token in tokenize(&bodies.join("\n")) {
        for (i, part) in token.text.split('\n').enumerate() {
            if i > 0 {
                rows.push(Vec::new());
            }
            if part.is_empty() {
                continue;
            }
            if let Some(row) = rows.last_mut() {
                row.push(Token::new(token.class, part));
            }
        }
    }
    rows.resize_with(lines.len(), Vec::new);

    for (row, margin) in rows.iter_mut().zip(margins) {
        if !margin.is_empty() {
            row.insert(0, Token::new(TokenClass::Plain, margin));
        }
    }
    rows
}
