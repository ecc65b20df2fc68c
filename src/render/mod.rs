//! Renderer module — trait-based format dispatch.

pub mod java;
pub mod json;

use crate::model::TypeDecl;
use anyhow::{anyhow, Result};

/// Knobs for the Java emitter. Supplied by the CLI layer.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Put a `// TODO: not yet implemented` line in every stub body.
    pub stub_comment: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            indent_width: 4,
            stub_comment: false,
        }
    }
}

/// Trait for rendering a TypeDecl into a specific output format.
pub trait Renderer {
    fn render(&self, decl: &TypeDecl) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str, options: EmitOptions) -> Result<Box<dyn Renderer>> {
    match format {
        "java" => Ok(Box::new(java::JavaRenderer::new(options))),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use java or json", format)),
    }
}
