//! Declaration tokenizer.
//!
//! Turns the flattened text of a javadoc `<pre>` block back into modifiers,
//! return type and call signature. Types are kept as literal token text;
//! nothing is resolved.

use crate::error::{Result, StubError};
use crate::model::Modifier;
use regex::Regex;
use std::sync::LazyLock;

static RE_JAVA_LANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bjava\.lang\.([A-Z])").unwrap());

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Structured form of a constructor or method declaration.
#[derive(Debug, PartialEq)]
pub struct Declaration {
    pub modifiers: Vec<Modifier>,
    pub return_type: String,
    pub signature: String,
    pub is_constructor: bool,
}

/// Structured form of a field declaration.
#[derive(Debug, PartialEq)]
pub struct FieldDeclaration {
    pub modifiers: Vec<Modifier>,
    pub field_type: String,
    pub name: String,
}

/// Normalize raw `<pre>` text to a single line: non-breaking spaces and line
/// breaks become single spaces, `java.lang.` prefixes are dropped.
pub fn flatten(raw: &str) -> String {
    let text = raw.replace('\u{a0}', " ");
    let text = RE_JAVA_LANG.replace_all(&text, "$1");
    RE_WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Tokenize a constructor or method declaration.
pub fn parse(declaration: &str) -> Result<Declaration> {
    let signature = parse_signature(declaration)
        .ok_or_else(|| StubError::MissingParameters(declaration.to_string()))?;
    let return_type = parse_return_type(declaration);
    Ok(Declaration {
        modifiers: parse_modifiers(declaration),
        is_constructor: return_type.is_empty(),
        return_type,
        signature,
    })
}

/// Leading modifier tokens, in declaration order.
pub fn parse_modifiers(declaration: &str) -> Vec<Modifier> {
    strip_annotations(declaration)
        .split_whitespace()
        .map_while(Modifier::from_token)
        .collect()
}

/// Tokens between the modifiers and the member name. Empty for constructors.
pub fn parse_return_type(declaration: &str) -> String {
    let tokens: Vec<&str> = strip_annotations(declaration)
        .split_whitespace()
        .skip_while(|t| Modifier::from_token(t).is_some())
        .take_while(|t| !t.contains('('))
        .collect();
    strip_type_parameters(&tokens.join(" ")).to_string()
}

/// `name(Type1, Type2)` with parameter names dropped, or None if the
/// declaration has no parameter list.
pub fn parse_signature(declaration: &str) -> Option<String> {
    let body = strip_annotations(declaration);
    let open = body.find('(')?;
    let name = body[..open].split_whitespace().last()?;
    let close = matching_close(body, open)?;
    let types: Vec<String> = split_top_level(&body[open + 1..close])
        .into_iter()
        .filter_map(parameter_type)
        .collect();
    Some(format!("{}({})", name, types.join(", ")))
}

/// Tokenize a field declaration: the last token is the name, the tokens
/// between the modifiers and the name are the type.
pub fn parse_field(declaration: &str) -> FieldDeclaration {
    let body = strip_annotations(declaration);
    let modifiers: Vec<Modifier> = body
        .split_whitespace()
        .map_while(Modifier::from_token)
        .collect();
    let rest: Vec<&str> = body.split_whitespace().skip(modifiers.len()).collect();
    let (name, field_type) = rest
        .split_last()
        .map(|(name, ty)| (name.to_string(), ty.join(" ")))
        .unwrap_or_default();
    FieldDeclaration {
        modifiers,
        field_type,
        name,
    }
}

/// Skip leading `@Annotation` and `@Annotation(...)` tokens.
fn strip_annotations(declaration: &str) -> &str {
    let mut rest = declaration.trim_start();
    while rest.starts_with('@') {
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '(')
            .unwrap_or(rest.len());
        rest = if rest[end..].starts_with('(') {
            match matching_close(rest, end) {
                Some(close) => &rest[close + 1..],
                None => return rest,
            }
        } else {
            &rest[end..]
        };
        rest = rest.trim_start();
    }
    rest
}

/// Drop a leading generic clause such as `<T>` or `<K, V>`.
fn strip_type_parameters(text: &str) -> &str {
    if !text.starts_with('<') {
        return text;
    }
    match matching_close(text, 0) {
        Some(end) => text[end + 1..].trim_start(),
        None => text,
    }
}

/// Byte index of the bracket that closes the one at `open`.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside `<>`, `()` or `[]`.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// A parameter minus its trailing name.
fn parameter_type(param: &str) -> Option<String> {
    let tokens: Vec<&str> = param.split_whitespace().collect();
    match tokens.len() {
        0 => None,
        1 => Some(tokens[0].to_string()),
        n => Some(tokens[..n - 1].join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Modifier::*;

    #[test]
    fn flatten_pre_text() {
        assert_eq!(
            flatten("public\u{a0}void\u{a0}put(java.lang.String\u{a0}key,\n                int\u{a0}value)"),
            "public void put(String key, int value)"
        );
    }

    #[test]
    fn flatten_keeps_nested_java_lang_packages() {
        assert_eq!(
            flatten("public java.lang.reflect.Method find(java.lang.Class<?> c)"),
            "public java.lang.reflect.Method find(Class<?> c)"
        );
    }

    #[test]
    fn method_with_parameters() {
        let decl = parse("public static synchronized int add(int a, long b)").unwrap();
        assert_eq!(decl.modifiers, vec![Public, Static, Synchronized]);
        assert_eq!(decl.return_type, "int");
        assert_eq!(decl.signature, "add(int, long)");
        assert!(!decl.is_constructor);
    }

    #[test]
    fn empty_parameter_list() {
        let decl = parse("public int size()").unwrap();
        assert_eq!(decl.signature, "size()");
        assert_eq!(parse("void reset()").unwrap().signature, "reset()");
    }

    #[test]
    fn constructor_has_no_return_type() {
        let decl = parse("public Widget(String name, int size)").unwrap();
        assert_eq!(decl.modifiers, vec![Public]);
        assert_eq!(decl.return_type, "");
        assert_eq!(decl.signature, "Widget(String, int)");
        assert!(decl.is_constructor);
    }

    #[test]
    fn generic_types_are_kept_whole() {
        let decl = parse("public Map<String, Integer> merge(Map<String, Integer> left, List<? extends Number> right)")
            .unwrap();
        assert_eq!(decl.return_type, "Map<String, Integer>");
        assert_eq!(decl.signature, "merge(Map<String, Integer>, List<? extends Number>)");
    }

    #[test]
    fn arrays_and_varargs() {
        let decl = parse("public static void main(String[] args, int... extra)").unwrap();
        assert_eq!(decl.signature, "main(String[], int...)");
        assert_eq!(decl.return_type, "void");
    }

    #[test]
    fn type_parameters_are_not_return_type() {
        let decl = parse("public static <T> void fill(List<T> list, T value)").unwrap();
        assert_eq!(decl.return_type, "void");
        assert_eq!(decl.signature, "fill(List<T>, T)");

        let decl = parse("public <K, V> Map<K, V> zip(K key, V value)").unwrap();
        assert_eq!(decl.return_type, "Map<K, V>");

        let decl = parse("public <T> Box(T value)").unwrap();
        assert!(decl.is_constructor);
    }

    #[test]
    fn leading_annotations_are_skipped() {
        let decl = parse("@Deprecated public abstract String describe()").unwrap();
        assert_eq!(decl.modifiers, vec![Public, Abstract]);
        assert_eq!(decl.return_type, "String");
        assert_eq!(decl.signature, "describe()");

        let decl = parse("@SuppressWarnings(value = \"unchecked\") protected Object raw(int i)")
            .unwrap();
        assert_eq!(decl.modifiers, vec![Protected]);
        assert_eq!(decl.signature, "raw(int)");
    }

    #[test]
    fn throws_clause_is_ignored() {
        let decl = parse("public void load(File f) throws IOException").unwrap();
        assert_eq!(decl.signature, "load(File)");
        assert_eq!(decl.return_type, "void");
    }

    #[test]
    fn missing_parameter_list() {
        assert!(matches!(
            parse("public int size"),
            Err(StubError::MissingParameters(_))
        ));
    }

    #[test]
    fn modifiers_stop_at_first_other_token() {
        assert_eq!(
            parse_modifiers("public final class Widget extends Object implements Serializable"),
            vec![Public, Final, Class]
        );
        assert_eq!(parse_modifiers("Widget()"), vec![]);
    }

    #[test]
    fn field_declaration() {
        let field = parse_field("public static final int MAX_SIZE");
        assert_eq!(field.modifiers, vec![Public, Static, Final]);
        assert_eq!(field.field_type, "int");
        assert_eq!(field.name, "MAX_SIZE");

        let field = parse_field("protected Map<String, List<Integer>> index");
        assert_eq!(field.field_type, "Map<String, List<Integer>>");
        assert_eq!(field.name, "index");
    }
}
