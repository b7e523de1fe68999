use crate::parser::{Operation, ParseContext, ParseError};

/// A run of comment lines and the declaration that directly follows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// The trimmed declaration line, e.g. `func (c *WishlistController) Get() {`
    pub declaration: String,
    /// Line number of the declaration (0-indexed)
    pub line: usize,
    /// Raw comment lines, comment markers included
    pub lines: Vec<String>,
}

impl CommentBlock {
    /// Compile this block into a fresh operation
    pub fn compile(&self, ctx: &ParseContext<'_>) -> Result<Operation, ParseError> {
        Operation::new()
            .parse_comment(&self.lines, ctx)
            .map_err(ParseError::from)
    }

    /// Whether any line carries a `@router` tag
    pub fn has_router(&self) -> bool {
        self.lines
            .iter()
            .any(|line| crate::parser::is_router_line(line))
    }
}

/// Collect every comment block that is attached to a declaration.
///
/// A block is a run of consecutive `//` lines. A blank line ends the run
/// without attaching it; the first other line becomes its declaration.
pub fn comment_blocks(content: &str) -> Vec<CommentBlock> {
    let mut blocks = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with("//") {
            pending.push(trimmed.to_string());
        } else if trimmed.is_empty() {
            pending.clear();
        } else if !pending.is_empty() {
            blocks.push(CommentBlock {
                declaration: trimmed.to_string(),
                line: idx,
                lines: std::mem::take(&mut pending),
            });
        }
    }

    blocks
}
