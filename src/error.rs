//! Errors raised while extracting a type declaration from a javadoc page.

use thiserror::Error;

/// Failure to turn a page (or one member of it) into model data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StubError {
    /// A structural anchor the javadoc layout always carries is absent.
    #[error("malformed page: missing {0}")]
    MissingAnchor(&'static str),

    #[error("malformed page: declaration `{0}` is not a class, interface or enum")]
    MissingKind(String),

    #[error("malformed page: declaration `{0}` names more than one of class, interface, enum")]
    AmbiguousKind(String),

    #[error("malformed page: member declaration `{0}` has no parameter list")]
    MissingParameters(String),

    /// Nested types have their own page but are declared inside their
    /// enclosing type's source file.
    #[error("nested type `{0}` has no source file of its own")]
    NestedType(String),

    /// A `<dt>` term outside the known tag vocabulary.
    #[error("unrecognized tag term `{0}`")]
    UnrecognizedTag(String),
}

pub type Result<T> = std::result::Result<T, StubError>;
