//! Java source renderer — a compilable skeleton with javadoc comments and
//! stub bodies.

use crate::model::{Field, Kind, Member, Tags, TypeDecl};
use crate::render::{EmitOptions, Renderer};
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

const STUB_COMMENT: &str = "// TODO: not yet implemented";

static RE_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

// javadoc prints the implicit superclass of an enum; javac rejects it.
static RE_ENUM_SUPERCLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+extends\s+Enum<[^>]*>").unwrap());

pub struct JavaRenderer {
    options: EmitOptions,
}

impl JavaRenderer {
    pub fn new(options: EmitOptions) -> Self {
        JavaRenderer { options }
    }

    fn pad(&self, level: usize) -> String {
        " ".repeat(self.options.indent_width * level)
    }

    /// Enum constants, comma-separated and closed by `;` so body
    /// declarations may follow.
    fn render_constants(&self, decl: &TypeDecl) -> Vec<String> {
        let pad = self.pad(1);
        let mut lines = Vec::new();
        for (i, constant) in decl.constants.iter().enumerate() {
            lines.extend(doc_comment(&constant.description, &Tags::default(), &pad));
            let separator = if i + 1 == decl.constants.len() { ';' } else { ',' };
            lines.push(format!("{}{}{}", pad, constant.name, separator));
        }
        if lines.is_empty() {
            lines.push(format!("{};", pad));
        }
        lines
    }

    fn render_field(&self, owner: &TypeDecl, field: &Field) -> Vec<String> {
        let pad = self.pad(1);
        let mut lines = doc_comment(&field.description, &Tags::default(), &pad);
        match field.initializer(owner) {
            Some(value) => lines.push(format!("{}{} = {};", pad, field.declaration, value)),
            None => lines.push(format!("{}{};", pad, field.declaration)),
        }
        lines
    }

    fn render_member(&self, owner: &TypeDecl, member: &Member) -> Vec<String> {
        let pad = self.pad(1);
        let mut lines = doc_comment(&member.description, &member.tags, &pad);

        if !member.is_constructor {
            for decorator in &member.tags.decorators {
                lines.push(format!("{}{}", pad, decorator.as_str()));
            }
        }

        if !member.has_body(owner) {
            lines.push(format!("{}{};", pad, member.declaration));
            return lines;
        }

        let body_pad = self.pad(2);
        lines.push(format!("{}{} {{", pad, member.declaration));
        if self.options.stub_comment {
            lines.push(format!("{}{}", body_pad, STUB_COMMENT));
        }
        if let Some(value) = member.return_default() {
            lines.push(format!("{}return {};", body_pad, value));
        }
        lines.push(format!("{}}}", pad));
        lines
    }
}

impl Renderer for JavaRenderer {
    fn render(&self, decl: &TypeDecl) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        if !decl.package.is_empty() {
            lines.push(format!("package {};", decl.package));
            lines.push(String::new());
        }

        lines.extend(doc_comment(&decl.description, &Tags::default(), ""));
        lines.push(format!("{} {{", type_header(decl)));
        lines.push(String::new());

        if decl.kind == Kind::Enum {
            lines.extend(self.render_constants(decl));
            lines.push(String::new());
        }

        for field in &decl.fields {
            lines.extend(self.render_field(decl, field));
            lines.push(String::new());
        }

        for member in decl.constructors.iter().chain(&decl.methods) {
            lines.extend(self.render_member(decl, member));
            lines.push(String::new());
        }

        lines.push("}".to_string());

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(normalize_markup(&text))
    }

    fn file_extension(&self) -> &str {
        "java"
    }
}

fn type_header(decl: &TypeDecl) -> String {
    match decl.kind {
        Kind::Enum => RE_ENUM_SUPERCLASS
            .replace(&decl.declaration, "")
            .into_owned(),
        Kind::Class | Kind::Interface => decl.declaration.clone(),
    }
}

/// Build a `/** ... */` block: description lines, then a blank separator and
/// one line per tag if there are any.
fn doc_comment(description: &str, tags: &Tags, pad: &str) -> Vec<String> {
    let description = normalize_markup(description).replace("\n ", "\n");
    let mut body: Vec<String> = description
        .trim()
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();

    if !tags.is_empty() && !body.is_empty() {
        body.push(String::new());
    }
    body.extend(
        tags.iter()
            .map(|(kind, text)| format!("{} {}", kind.javadoc_tag(), text)),
    );

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(format!("{}/**", pad));
    for line in body {
        if line.is_empty() {
            lines.push(format!("{} *", pad));
        } else {
            lines.push(format!("{} * {}", pad, line));
        }
    }
    lines.push(format!("{} */", pad));
    lines
}

/// Replace non-breaking spaces and `<br>` markup left over from the page.
pub fn normalize_markup(text: &str) -> String {
    let text = text.replace('\u{a0}', " ").replace("&nbsp;", " ");
    RE_LINE_BREAK.replace_all(&text, "\n").into_owned()
}
