//! JSON renderer — the extracted model as-is, for inspecting what the
//! locator found on a page.

use crate::model::TypeDecl;
use crate::render::Renderer;
use anyhow::{Context, Result};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, decl: &TypeDecl) -> Result<String> {
        let mut out = serde_json::to_string_pretty(decl)
            .with_context(|| format!("failed to serialize {}", decl.name))?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
