//! Document locator — finds the type header and member details of a javadoc
//! page and feeds them to the tokenizer and tag classifier.
//!
//! Expects the JDK 8 page layout:
//!
//! - package name in `div.header > div.subTitle` (absent for the default package,
//!   prefixed with a "Package" label by later doclets)
//! - type name, declaration and description in `div.description li.blockList`
//! - one `<a name="*.detail">` (or `<a id="*.detail">`) anchor per member
//!   category, whose parent holds one `ul > li` per member

use crate::error::{Result, StubError};
use crate::model::{Field, Kind, Member, Tags, TypeDecl};
use crate::parser::declaration::flatten;
use crate::parser::{normalize_text, tags, ParseOptions};
use log::{debug, error, warn};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static SEL_PACKAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.header > div.subTitle").unwrap());

static SEL_HEADER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.description li.blockList").unwrap());

static SEL_FIRST_BLOCK_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.blockList").unwrap());

static SEL_TYPE_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.typeNameLabel").unwrap());

static SEL_PRE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("pre").unwrap());

// Javadoc 8 names the anchors, later doclets give them ids.
static SEL_ENUM_CONSTANTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[name="enum.constant.detail"], a[id="enum.constant.detail"]"#).unwrap()
});

static SEL_FIELDS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[name="field.detail"], a[id="field.detail"]"#).unwrap()
});

static SEL_CONSTRUCTORS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[name="constructor.detail"], a[id="constructor.detail"]"#).unwrap()
});

static SEL_METHODS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[name="method.detail"], a[id="method.detail"]"#).unwrap()
});

/// Methods the compiler declares on every enum; redeclaring them is an error.
const IMPLICIT_ENUM_METHODS: &[&str] = &["values()", "valueOf(String)"];

/// A member `<li>` split into its parts.
struct MemberNode<'a> {
    declaration: String,
    description: String,
    tag_lists: Vec<ElementRef<'a>>,
}

/// Extract the type declaration described by one javadoc page.
///
/// `source` identifies the page in diagnostics only.
pub fn parse(source: &str, html: &str, options: &ParseOptions) -> Result<TypeDecl> {
    let document = Html::parse_document(html);

    let package = document
        .select(&SEL_PACKAGE)
        .next()
        .map(|e| package_name(&text_of(e)))
        .unwrap_or_default();

    let header = document
        .select(&SEL_HEADER)
        .next()
        .or_else(|| document.select(&SEL_FIRST_BLOCK_LIST).next())
        .ok_or(StubError::MissingAnchor("type header"))?;
    let name = header
        .select(&SEL_TYPE_NAME)
        .next()
        .ok_or(StubError::MissingAnchor("type name"))?;
    let declaration = header
        .select(&SEL_PRE)
        .next()
        .ok_or(StubError::MissingAnchor("type declaration"))?;

    // A deprecation notice is a block of its own ahead of the description.
    let blocks: Vec<String> = header
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "div" && e.value().classes().any(|c| c == "block"))
        .map(|e| text_of(e).trim().to_string())
        .collect();
    if blocks.is_empty() {
        return Err(StubError::MissingAnchor("type description"));
    }

    let name = simple_name(&text_of(name));
    if name.contains('.') {
        return Err(StubError::NestedType(name));
    }

    let mut decl = TypeDecl::new(
        package,
        name,
        flatten(&text_of(declaration)),
        blocks.join("\n"),
    )?;

    for node in member_nodes(&document, &SEL_ENUM_CONSTANTS) {
        let node = split_member_node(source, node)?;
        decl.constants.push(Field::parse(node.declaration, node.description));
    }

    for node in member_nodes(&document, &SEL_FIELDS) {
        let node = split_member_node(source, node)?;
        if !node.tag_lists.is_empty() {
            debug!("{}: ignoring tag list of field `{}`", source, node.declaration);
        }
        decl.fields.push(Field::parse(node.declaration, node.description));
    }

    for node in member_nodes(&document, &SEL_CONSTRUCTORS) {
        if let Some(member) = parse_member(source, node, options)? {
            decl.constructors.push(member);
        }
    }

    for node in member_nodes(&document, &SEL_METHODS) {
        let Some(member) = parse_member(source, node, options)? else {
            continue;
        };
        if decl.kind == Kind::Enum && IMPLICIT_ENUM_METHODS.contains(&member.signature.as_str()) {
            debug!("{}: skipping implicit enum method {}", source, member.signature);
            continue;
        }
        decl.methods.push(member);
    }

    Ok(decl)
}

/// Parse a constructor or method node. Returns None when a strict-mode tag
/// error drops the member.
fn parse_member(
    source: &str,
    node: ElementRef<'_>,
    options: &ParseOptions,
) -> Result<Option<Member>> {
    let node = split_member_node(source, node)?;
    let mut collected = Tags::default();
    for dl in &node.tag_lists {
        match tags::classify(*dl, options) {
            Ok(block) => collected.append(block),
            Err(err @ StubError::UnrecognizedTag(_)) => {
                error!("{}: dropping `{}`: {}", source, node.declaration, err);
                return Ok(None);
            }
            Err(err) => return Err(err),
        }
    }
    Member::parse(node.declaration, node.description, collected).map(Some)
}

/// Separate a member `<li>` into declaration, description and tag lists.
fn split_member_node<'a>(source: &str, node: ElementRef<'a>) -> Result<MemberNode<'a>> {
    let mut declaration: Option<String> = None;
    let mut blocks: Vec<String> = Vec::new();
    let mut tag_lists = Vec::new();

    for child in node.children().filter_map(ElementRef::wrap) {
        let element = child.value();
        match element.name() {
            "h4" => {}
            "pre" if declaration.is_none() => declaration = Some(flatten(&text_of(child))),
            "div" if element.classes().any(|c| c == "block") => {
                blocks.push(child.inner_html().trim().to_string());
            }
            "dl" => tag_lists.push(child),
            other => warn!(
                "{}: skipping unexpected <{}> in member `{}`",
                source,
                other,
                declaration.as_deref().unwrap_or("?")
            ),
        }
    }

    let declaration = declaration.ok_or(StubError::MissingAnchor("member declaration"))?;
    Ok(MemberNode {
        declaration,
        description: blocks.join("\n"),
        tag_lists,
    })
}

/// The member `<li>` nodes under a detail anchor; empty if the page has none.
fn member_nodes<'a>(document: &'a Html, anchor: &Selector) -> Vec<ElementRef<'a>> {
    let Some(section) = document
        .select(anchor)
        .next()
        .and_then(|a| a.parent())
        .and_then(ElementRef::wrap)
    else {
        return Vec::new();
    };

    section
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "ul")
        .filter_map(|ul| {
            ul.children()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "li")
        })
        .collect()
}

/// `Package com.example` → `com.example`.
fn package_name(subtitle: &str) -> String {
    let text = normalize_text(subtitle);
    match text.strip_prefix("Package ") {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// `Box<T>` → `Box`.
fn simple_name(label: &str) -> String {
    let name = match label.find('<') {
        Some(i) => &label[..i],
        None => label,
    };
    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Decorator, Modifier, TagKind};

    const WIDGET: &str = include_str!("../../tests/fixtures/javadoc/com/example/Widget.html");
    const SHAPE: &str =
        include_str!("../../tests/fixtures/javadoc/com/example/shapes/Shape.html");
    const COLOR: &str = include_str!("../../tests/fixtures/javadoc/Color.html");
    const BROKEN: &str = include_str!("../../tests/fixtures/javadoc/Broken.html");

    fn lenient() -> ParseOptions {
        ParseOptions::default()
    }

    #[test]
    fn class_header() {
        let decl = parse("Widget.html", WIDGET, &lenient()).unwrap();
        assert_eq!(decl.package, "com.example");
        assert_eq!(decl.name, "Widget");
        assert_eq!(decl.declaration, "public class Widget extends Object");
        assert_eq!(decl.kind, Kind::Class);
        assert_eq!(decl.modifiers, vec![Modifier::Public, Modifier::Class]);
        assert!(decl.description.starts_with("A resizable widget."));
    }

    #[test]
    fn class_members_in_documentation_order() {
        let decl = parse("Widget.html", WIDGET, &lenient()).unwrap();

        let fields: Vec<_> = decl.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["MAX_SIZE", "label"]);
        assert_eq!(decl.fields[1].field_type, "String");

        let constructors: Vec<_> = decl.constructors.iter().map(|c| c.signature.as_str()).collect();
        assert_eq!(constructors, vec!["Widget()", "Widget(int)"]);
        assert!(decl.constructors.iter().all(|c| c.is_constructor));

        let methods: Vec<_> = decl.methods.iter().map(|m| m.signature.as_str()).collect();
        assert_eq!(
            methods,
            vec!["size()", "resize(int)", "label(String, int)", "toString()"]
        );
    }

    #[test]
    fn member_tags_and_decorators() {
        let decl = parse("Widget.html", WIDGET, &lenient()).unwrap();

        let size = &decl.methods[0];
        assert_eq!(size.description, "Returns the current size.");
        assert_eq!(size.tags.entries[&TagKind::Return], vec!["the size"]);

        let resize = &decl.methods[1];
        assert_eq!(
            resize.declaration,
            "public void resize(int size) throws IllegalArgumentException"
        );
        assert_eq!(resize.tags.entries[&TagKind::Param], vec!["size the new size"]);
        assert_eq!(
            resize.tags.entries[&TagKind::Throws],
            vec!["java.lang.IllegalArgumentException if size is out of range"]
        );
        assert_eq!(resize.tags.entries[&TagKind::Require], vec!["0 < size <= MAX_SIZE"]);
        assert_eq!(resize.tags.entries[&TagKind::Ensure], vec!["size() == size"]);

        let to_string = &decl.methods[3];
        assert_eq!(to_string.description, "");
        assert_eq!(to_string.tags.decorators, vec![Decorator::Override]);
        assert!(to_string.tags.is_empty());
    }

    #[test]
    fn anomalous_node_keeps_member() {
        let decl = parse("Widget.html", WIDGET, &lenient()).unwrap();
        let label = &decl.methods[2];
        assert_eq!(label.description, "Builds a label for display.");
        assert_eq!(
            label.tags.entries[&TagKind::Param],
            vec!["prefix text placed before the size", "width minimum width"]
        );
    }

    #[test]
    fn strict_mode_drops_member_with_unknown_tag() {
        let decl = parse("Widget.html", WIDGET, &ParseOptions { strict: true }).unwrap();
        let methods: Vec<_> = decl.methods.iter().map(|m| m.signature.as_str()).collect();
        assert_eq!(methods, vec!["size()", "resize(int)", "toString()"]);
    }

    #[test]
    fn interface_page() {
        let decl = parse("Shape.html", SHAPE, &lenient()).unwrap();
        assert_eq!(decl.package, "com.example.shapes");
        assert_eq!(decl.declaration, "public interface Shape");
        assert!(decl.is_interface());
        assert_eq!(decl.fields[0].name, "SIDES");
        assert!(decl.constructors.is_empty());
        assert_eq!(decl.methods.len(), 2);
        assert_eq!(decl.methods[1].signature, "scale(double)");
    }

    #[test]
    fn enum_page_without_package() {
        let decl = parse("Color.html", COLOR, &lenient()).unwrap();
        assert_eq!(decl.package, "");
        assert_eq!(decl.kind, Kind::Enum);
        assert_eq!(decl.declaration, "public enum Color extends Enum<Color>");

        let constants: Vec<_> = decl.constants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(constants, vec!["RED", "BLUE"]);
        assert_eq!(decl.constructors[0].signature, "Color(int)");

        let methods: Vec<_> = decl.methods.iter().map(|m| m.signature.as_str()).collect();
        assert_eq!(methods, vec!["rgb()"]);
    }

    #[test]
    fn missing_header_is_malformed() {
        let err = parse("Broken.html", BROKEN, &lenient()).unwrap_err();
        assert_eq!(err, StubError::MissingAnchor("type header"));
    }

    #[test]
    fn missing_member_declaration_is_malformed() {
        let html = WIDGET.replace("<pre>public&nbsp;int&nbsp;size()</pre>", "");
        let err = parse("Widget.html", &html, &lenient()).unwrap_err();
        assert_eq!(err, StubError::MissingAnchor("member declaration"));
    }

    #[test]
    fn deprecation_notice_keeps_description() {
        let html = WIDGET.replace(
            "<div class=\"block\">A resizable widget.",
            "<div class=\"block\"><span class=\"deprecatedLabel\">Deprecated.</span>&nbsp;\
             <div class=\"block\"><span class=\"deprecationComment\">Use Gadget.</span></div></div>\n\
             <div class=\"block\">A resizable widget.",
        );
        let decl = parse("Widget.html", &html, &lenient()).unwrap();
        assert!(decl.description.starts_with("Deprecated.\u{a0}Use Gadget.\nA resizable widget."));
        assert!(decl.description.ends_with("Widgets are never empty."));
    }

    #[test]
    fn nested_type_page_is_rejected() {
        let html = WIDGET.replace(
            "<span class=\"typeNameLabel\">Widget</span>",
            "<span class=\"typeNameLabel\">Widget.Inner</span>",
        );
        let err = parse("Widget.Inner.html", &html, &lenient()).unwrap_err();
        assert_eq!(err, StubError::NestedType("Widget.Inner".into()));
    }

    #[test]
    fn id_anchors_and_package_label() {
        let html = WIDGET
            .replace("<a name=\"", "<a id=\"")
            .replace(
                "<div class=\"subTitle\">com.example</div>",
                "<div class=\"subTitle\"><span class=\"packageLabelInType\">Package</span>&nbsp;\
                 <a href=\"package-summary.html\">com.example</a></div>",
            );
        let decl = parse("Widget.html", &html, &lenient()).unwrap();
        assert_eq!(decl.package, "com.example");
        assert_eq!(decl.fields.len(), 2);
        assert_eq!(decl.constructors.len(), 2);
        assert_eq!(decl.methods.len(), 4);
    }

    #[test]
    fn package_label_is_stripped() {
        assert_eq!(package_name("Package\u{a0}com.example"), "com.example");
        assert_eq!(package_name("com.example"), "com.example");
    }

    #[test]
    fn generic_type_name() {
        assert_eq!(simple_name("Box<T>"), "Box");
        assert_eq!(simple_name("Widget"), "Widget");
    }
}
