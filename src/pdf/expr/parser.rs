//! Recursive-descent parser for the PDF object notation
//!
//! The notation is a minimal s-expression dialect, fully determined by parentheses and
//! single spaces:
//!
//! ```text
//! expr  := leaf | list
//! leaf  := NAME                       (no space, no parenthesis)
//! list  := "( " HEAD (" " expr)* " )"
//! ```
//!
//! There is no quoting or escaping. `HEAD` is one word: a letter/underscore stem with an
//! optional decimal suffix (`obj12`, `MediaBox`). Leaf names are taken as-is.
//!
//! Parsing never returns a partial tree: the first violation is reported as a
//! [`ParseError`] carrying the byte offset where it was found.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::tree::{alloc, attach, ExprNode, ExprTree, NodeId};

/// Nesting limit used when none is configured
pub const DEFAULT_MAX_DEPTH: usize = 256;

static HEAD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_]+[0-9]*$").unwrap());

/// Errors that can occur while parsing the notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing to parse
    EmptyInput,
    /// The start offset falls inside a multi-byte character
    InvalidOffset { offset: usize },
    /// A mandatory single space is missing
    MissingSeparator { offset: usize },
    /// Input ended before the closing parenthesis
    Unterminated { offset: usize },
    /// A node name with no characters
    EmptyName { offset: usize },
    /// A parenthesis inside a leaf name
    UnexpectedParen { offset: usize },
    /// A list head that is not a single word, typically two tokens run together
    MalformedHead { offset: usize, head: String },
    /// Nesting beyond the configured limit
    TooDeep { offset: usize, limit: usize },
    /// Characters left over after a complete expression
    TrailingInput { offset: usize },
}

impl ParseError {
    /// Byte offset at which the error was detected, if any
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::EmptyInput => None,
            ParseError::InvalidOffset { offset }
            | ParseError::MissingSeparator { offset }
            | ParseError::Unterminated { offset }
            | ParseError::EmptyName { offset }
            | ParseError::UnexpectedParen { offset }
            | ParseError::MalformedHead { offset, .. }
            | ParseError::TooDeep { offset, .. }
            | ParseError::TrailingInput { offset } => Some(*offset),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "Malformed input: empty expression"),
            ParseError::InvalidOffset { offset } => {
                write!(f, "Malformed input: offset {offset} is not a character boundary")
            }
            ParseError::MissingSeparator { offset } => {
                write!(f, "Malformed input: expected a space at offset {offset}")
            }
            ParseError::Unterminated { offset } => {
                write!(f, "Malformed input: unterminated list at offset {offset}")
            }
            ParseError::EmptyName { offset } => {
                write!(f, "Malformed input: empty name at offset {offset}")
            }
            ParseError::UnexpectedParen { offset } => {
                write!(f, "Malformed input: unexpected parenthesis at offset {offset}")
            }
            ParseError::MalformedHead { offset, head } => write!(
                f,
                "Malformed input: '{head}' at offset {offset} is not a single name (missing separator?)"
            ),
            ParseError::TooDeep { offset, limit } => write!(
                f,
                "Malformed input: nesting exceeds {limit} levels at offset {offset}"
            ),
            ParseError::TrailingInput { offset } => {
                write!(f, "Malformed input: trailing characters at offset {offset}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parser with a nesting limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parser {
    max_depth: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse one expression starting at `offset`
    ///
    /// Returns the tree and the offset just past the expression. Anything after that
    /// offset is left for the caller.
    pub fn parse(&self, text: &str, offset: usize) -> Result<(ExprTree, usize), ParseError> {
        if offset >= text.len() {
            return Err(ParseError::EmptyInput);
        }
        // Delimiters are ASCII, so a valid start keeps every later slice on a boundary
        if !text.is_char_boundary(offset) {
            return Err(ParseError::InvalidOffset { offset });
        }
        let mut cursor = Cursor {
            text,
            bytes: text.as_bytes(),
            nodes: Vec::new(),
            max_depth: self.max_depth,
        };
        let (root, next) = cursor.parse_node(offset, 1)?;
        Ok((ExprTree::from_arena(cursor.nodes, root), next))
    }

    /// Parse a whole record line
    ///
    /// A single trailing newline is ignored; any other leftover input is an error.
    pub fn parse_line(&self, line: &str) -> Result<ExprTree, ParseError> {
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);
        let (tree, next) = self.parse(line, 0)?;
        if next != line.len() {
            return Err(ParseError::TrailingInput { offset: next });
        }
        Ok(tree)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one expression at `offset` with the default nesting limit
pub fn parse_expr(text: &str, offset: usize) -> Result<(ExprTree, usize), ParseError> {
    Parser::new().parse(text, offset)
}

/// Parse a whole record line with the default nesting limit
pub fn parse_line(line: &str) -> Result<ExprTree, ParseError> {
    Parser::new().parse_line(line)
}

struct Cursor<'s> {
    text: &'s str,
    bytes: &'s [u8],
    nodes: Vec<ExprNode>,
    max_depth: usize,
}

impl Cursor<'_> {
    fn parse_node(&mut self, offset: usize, depth: usize) -> Result<(NodeId, usize), ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::TooDeep {
                offset,
                limit: self.max_depth,
            });
        }
        match self.bytes.get(offset) {
            None => Err(ParseError::Unterminated { offset }),
            Some(b'(') => self.parse_list(offset, depth),
            Some(_) => self.parse_leaf(offset),
        }
    }

    fn parse_leaf(&mut self, start: usize) -> Result<(NodeId, usize), ParseError> {
        let end = self.scan_name(start);
        let name = &self.text[start..end];
        if name.is_empty() {
            return Err(ParseError::EmptyName { offset: start });
        }
        if let Some(pos) = name.find(['(', ')']) {
            return Err(ParseError::UnexpectedParen { offset: start + pos });
        }
        let id = alloc(&mut self.nodes, ExprNode::new(name, false));
        Ok((id, end))
    }

    fn parse_list(&mut self, start: usize, depth: usize) -> Result<(NodeId, usize), ParseError> {
        let mut offset = start + 1;
        if self.bytes.get(offset) != Some(&b' ') {
            return Err(ParseError::MissingSeparator { offset });
        }
        offset += 1;

        let end = self.scan_name(offset);
        if end == self.bytes.len() {
            return Err(ParseError::Unterminated { offset: end });
        }
        let head = &self.text[offset..end];
        if head.is_empty() {
            return Err(ParseError::EmptyName { offset });
        }
        if !HEAD_REGEX.is_match(head) {
            return Err(ParseError::MalformedHead {
                offset,
                head: head.to_string(),
            });
        }
        let id = alloc(&mut self.nodes, ExprNode::new(head, true));
        offset = end;

        loop {
            match self.bytes.get(offset) {
                Some(b' ') => offset += 1,
                Some(_) => return Err(ParseError::MissingSeparator { offset }),
                None => return Err(ParseError::Unterminated { offset }),
            }
            match self.bytes.get(offset) {
                Some(b')') => return Ok((id, offset + 1)),
                None => return Err(ParseError::Unterminated { offset }),
                Some(_) => {
                    let (child, next) = self.parse_node(offset, depth + 1)?;
                    attach(&mut self.nodes, id, child);
                    offset = next;
                }
            }
        }
    }

    /// Offset of the next space, or the end of input.
    fn scan_name(&self, start: usize) -> usize {
        self.bytes[start..]
            .iter()
            .position(|b| *b == b' ')
            .map_or(self.bytes.len(), |pos| start + pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leaf() {
        let (tree, next) = parse_expr("R7", 0).unwrap();
        assert_eq!(tree.root().name(), "R7");
        assert!(tree.root().is_leaf());
        assert_eq!(next, 2);
    }

    #[test]
    fn test_parse_leaf_stops_at_space() {
        let (tree, next) = parse_expr("I3 )", 0).unwrap();
        assert_eq!(tree.root().name(), "I3");
        assert_eq!(next, 2);
    }

    #[test]
    fn test_parse_from_offset() {
        let text = "( obj1 ( Type I3 ) R2 )";
        let (tree, next) = parse_expr(text, 7).unwrap();
        assert_eq!(tree.to_text(), "( Type I3 )");
        assert_eq!(next, 18);
    }

    #[test]
    fn test_parse_from_offset_inside_character() {
        assert_eq!(
            parse_expr("éR2", 1).unwrap_err(),
            ParseError::InvalidOffset { offset: 1 }
        );
        let (tree, _) = parse_expr("éR2", 2).unwrap();
        assert_eq!(tree.to_text(), "R2");
    }

    #[test]
    fn test_parse_nested() {
        let tree = parse_line("( obj1 ( Type I3 ) R2 )").unwrap();
        let root = tree.root();
        assert_eq!(root.name(), "obj1");
        assert_eq!(root.child_count(), 2);

        let header = root.child(0).unwrap();
        assert_eq!(header.name(), "Type");
        assert_eq!(header.child(0).unwrap().name(), "I3");
        assert_eq!(header.parent().unwrap().name(), "obj1");

        let reference = root.child(1).unwrap();
        assert_eq!(reference.name(), "R2");
        assert!(reference.is_leaf());
    }

    #[test]
    fn test_parse_empty_list() {
        let tree = parse_line("( Count )").unwrap();
        assert_eq!(tree.root().name(), "Count");
        assert!(tree.root().is_leaf());
        assert!(tree.root().is_bracketed());
    }

    #[test]
    fn test_parse_line_strips_newline() {
        assert_eq!(parse_line("( obj1 R2 )\n").unwrap().to_text(), "( obj1 R2 )");
        assert_eq!(parse_line("( obj1 R2 )\r\n").unwrap().to_text(), "( obj1 R2 )");
    }

    #[test]
    fn test_run_together_head_is_malformed() {
        let err = parse_line("( obj1Type I3 )").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedHead {
                offset: 2,
                head: "obj1Type".to_string()
            }
        );
    }

    #[test]
    fn test_missing_space_after_open_paren() {
        assert_eq!(
            parse_line("(obj1 R2 )").unwrap_err(),
            ParseError::MissingSeparator { offset: 1 }
        );
    }

    #[test]
    fn test_double_space_is_empty_name() {
        assert_eq!(
            parse_line("( obj1  R2 )").unwrap_err(),
            ParseError::EmptyName { offset: 7 }
        );
    }

    #[test]
    fn test_close_paren_glued_to_leaf() {
        assert_eq!(
            parse_line("( obj1 R2)").unwrap_err(),
            ParseError::UnexpectedParen { offset: 9 }
        );
    }

    #[test]
    fn test_unterminated_list() {
        assert!(matches!(
            parse_line("( obj1 R2").unwrap_err(),
            ParseError::Unterminated { .. }
        ));
        assert!(matches!(
            parse_line("( obj1 R2 ").unwrap_err(),
            ParseError::Unterminated { .. }
        ));
        assert!(matches!(
            parse_line("( obj1").unwrap_err(),
            ParseError::Unterminated { .. }
        ));
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(
            parse_line("( obj1 R2 ) R3").unwrap_err(),
            ParseError::TrailingInput { offset: 11 }
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_line("").unwrap_err(), ParseError::EmptyInput);
        assert_eq!(parse_line("\n").unwrap_err(), ParseError::EmptyInput);
    }

    #[test]
    fn test_depth_limit() {
        let parser = Parser::with_max_depth(2);
        assert!(parser.parse_line("( obj1 ( Type I3 ) )").is_err());
        assert!(parser.parse_line("( obj1 R2 )").is_ok());

        let err = parser.parse_line("( obj1 ( Kids ( Type I3 ) ) )").unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { limit: 2, .. }));
    }

    #[test]
    fn test_deep_nesting_within_default_limit() {
        let mut text = String::from("( obj1");
        for _ in 0..100 {
            text.push_str(" ( Kids");
        }
        text.push_str(" R2");
        for _ in 0..100 {
            text.push_str(" )");
        }
        text.push_str(" )");
        let tree = parse_line(&text).unwrap();
        assert_eq!(tree.depth(), 102);
        assert_eq!(tree.to_text(), text);
    }

    #[test]
    fn test_error_display_mentions_malformed() {
        let err = parse_line("( obj1Type I3 )").unwrap_err();
        assert!(err.to_string().starts_with("Malformed input"));
        assert_eq!(err.offset(), Some(2));
    }
}
