//! Parser module — javadoc page to [`TypeDecl`](crate::model::TypeDecl).

pub mod declaration;
pub mod page;
pub mod tags;

pub use page::parse;

/// Options that change how tolerant extraction is.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Drop a member whose tag block has an unrecognized term instead of
    /// ignoring the term.
    pub strict: bool,
}

/// Collapse all whitespace runs (including non-breaking spaces) to single spaces.
pub(crate) fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
