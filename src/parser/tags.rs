//! Tag block classifier — `<dl>` term/definition pairs to typed tag slots.

use crate::error::{Result, StubError};
use crate::model::{Decorator, TagKind, Tags};
use crate::parser::{normalize_text, ParseOptions};
use log::warn;
use scraper::ElementRef;

/// Every `<dt>` label the classifier understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagTerm {
    Tag(TagKind),
    Overrides,
    SpecifiedBy,
}

impl TagTerm {
    /// Look up a `<dt>` label such as `Parameters:`.
    pub fn from_label(label: &str) -> Option<Self> {
        let term = match label.trim().trim_end_matches(':').trim_end() {
            "Parameters" => TagTerm::Tag(TagKind::Param),
            "Returns" => TagTerm::Tag(TagKind::Return),
            "Throws" => TagTerm::Tag(TagKind::Throws),
            "Require" | "Requires" => TagTerm::Tag(TagKind::Require),
            "Ensure" | "Ensures" => TagTerm::Tag(TagKind::Ensure),
            "Overrides" => TagTerm::Overrides,
            "Specified by" => TagTerm::SpecifiedBy,
            _ => return None,
        };
        Some(term)
    }
}

/// Classify one `<dl>` into a fresh set of tags.
///
/// Definitions are attached to the most recent term. Under `Overrides:` the
/// definition text is discarded and an `@Override` decorator recorded; under
/// `Specified by:` definitions are dropped. An unknown term is an error in
/// strict mode and a logged no-op otherwise.
pub fn classify(dl: ElementRef<'_>, options: &ParseOptions) -> Result<Tags> {
    let mut tags = Tags::default();
    let mut current: Option<TagTerm> = None;

    for child in dl.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "dt" => {
                let label = normalize_text(&child.text().collect::<String>());
                current = TagTerm::from_label(&label);
                if current.is_none() {
                    if options.strict {
                        return Err(StubError::UnrecognizedTag(label));
                    }
                    warn!("ignoring unrecognized tag term `{}`", label);
                }
            }
            "dd" => match current {
                Some(TagTerm::Tag(kind)) => {
                    let text = normalize_text(&child.text().collect::<String>());
                    tags.add(kind, text.replacen(" - ", " ", 1));
                }
                Some(TagTerm::Overrides) => {
                    tags.add_decorator(Decorator::Override);
                }
                Some(TagTerm::SpecifiedBy) | None => {}
            },
            _ => {}
        }
    }

    Ok(tags)
}
