//! Data model for an extracted type declaration — format-agnostic.

use crate::error::{Result, StubError};
use crate::parser::declaration;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The three kinds of top-level type a javadoc page can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Class,
    Interface,
    Enum,
}

/// Declaration modifiers, including the kind markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Synchronized,
    Native,
    Strictfp,
    Volatile,
    Transient,
    Default,
    Class,
    Interface,
    Enum,
}

impl Modifier {
    pub fn from_token(token: &str) -> Option<Self> {
        let modifier = match token {
            "public" => Modifier::Public,
            "protected" => Modifier::Protected,
            "private" => Modifier::Private,
            "static" => Modifier::Static,
            "final" => Modifier::Final,
            "abstract" => Modifier::Abstract,
            "synchronized" => Modifier::Synchronized,
            "native" => Modifier::Native,
            "strictfp" => Modifier::Strictfp,
            "volatile" => Modifier::Volatile,
            "transient" => Modifier::Transient,
            "default" => Modifier::Default,
            "class" => Modifier::Class,
            "interface" => Modifier::Interface,
            "enum" => Modifier::Enum,
            _ => return None,
        };
        Some(modifier)
    }

    /// The kind this modifier declares, if it is a kind marker.
    pub fn kind(self) -> Option<Kind> {
        match self {
            Modifier::Class => Some(Kind::Class),
            Modifier::Interface => Some(Kind::Interface),
            Modifier::Enum => Some(Kind::Enum),
            Modifier::Public
            | Modifier::Protected
            | Modifier::Private
            | Modifier::Static
            | Modifier::Final
            | Modifier::Abstract
            | Modifier::Synchronized
            | Modifier::Native
            | Modifier::Strictfp
            | Modifier::Volatile
            | Modifier::Transient
            | Modifier::Default => None,
        }
    }
}

/// Documented aspects of a member. Declaration order is rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Param,
    Return,
    Throws,
    Require,
    Ensure,
}

impl TagKind {
    pub fn javadoc_tag(self) -> &'static str {
        match self {
            TagKind::Param => "@param",
            TagKind::Return => "@return",
            TagKind::Throws => "@throws",
            TagKind::Require => "@require",
            TagKind::Ensure => "@ensure",
        }
    }
}

/// Marker lines emitted above a method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decorator {
    Override,
}

impl Decorator {
    pub fn as_str(self) -> &'static str {
        match self {
            Decorator::Override => "@Override",
        }
    }
}

/// Primitive types with a synthesized default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,
}

impl Primitive {
    /// Exact-text lookup; `int[]` or `Integer` are not primitives.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let primitive = match name {
            "byte" => Primitive::Byte,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            "boolean" => Primitive::Boolean,
            "char" => Primitive::Char,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn default_literal(self) -> &'static str {
        match self {
            Primitive::Byte
            | Primitive::Short
            | Primitive::Int
            | Primitive::Long
            | Primitive::Float
            | Primitive::Double => "0",
            Primitive::Boolean => "true",
            Primitive::Char => "' '",
        }
    }
}

/// Default value expression for a declared type: a primitive literal or `null`.
fn default_value(type_name: &str) -> &'static str {
    Primitive::from_type_name(type_name)
        .map(Primitive::default_literal)
        .unwrap_or("null")
}

/// Tag entries and decorators classified from one or more `<dl>` blocks.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Tags {
    pub entries: BTreeMap<TagKind, Vec<String>>,
    pub decorators: Vec<Decorator>,
}

impl Tags {
    pub fn add(&mut self, kind: TagKind, text: String) {
        self.entries.entry(kind).or_default().push(text);
    }

    /// Record a decorator once; returns false if it was already present.
    pub fn add_decorator(&mut self, decorator: Decorator) -> bool {
        if self.decorators.contains(&decorator) {
            return false;
        }
        self.decorators.push(decorator);
        true
    }

    /// Fold another block into this one, keeping documentation order.
    pub fn append(&mut self, other: Tags) {
        for (kind, texts) in other.entries {
            self.entries.entry(kind).or_default().extend(texts);
        }
        for decorator in other.decorators {
            self.add_decorator(decorator);
        }
    }

    /// All entries in fixed category order.
    pub fn iter(&self) -> impl Iterator<Item = (TagKind, &str)> {
        self.entries
            .iter()
            .flat_map(|(kind, texts)| texts.iter().map(move |t| (*kind, t.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

/// A documented constructor or method.
#[derive(Debug, Clone, Serialize)]
pub struct Member {
    pub declaration: String,
    pub modifiers: Vec<Modifier>,
    /// Empty for constructors.
    pub return_type: String,
    /// `name(Type1, Type2)` with parameter names dropped.
    pub signature: String,
    pub is_constructor: bool,
    /// Raw `div.block` markup.
    pub description: String,
    pub tags: Tags,
}

impl Member {
    pub fn parse(declaration: String, description: String, tags: Tags) -> Result<Self> {
        let parsed = declaration::parse(&declaration)?;
        Ok(Member {
            declaration,
            modifiers: parsed.modifiers,
            return_type: parsed.return_type,
            signature: parsed.signature,
            is_constructor: parsed.is_constructor,
            description,
            tags,
        })
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }

    /// Whether the member gets a stub body when declared inside `owner`.
    /// Native methods are bodiless like abstract ones.
    pub fn has_body(&self, owner: &TypeDecl) -> bool {
        !owner.is_interface() && !self.is_abstract() && !self.modifiers.contains(&Modifier::Native)
    }

    /// The value a stub body returns, or None when no return statement is emitted.
    pub fn return_default(&self) -> Option<&'static str> {
        if self.is_constructor || self.return_type == "void" {
            return None;
        }
        Some(default_value(&self.return_type))
    }
}

/// A documented field.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    pub declaration: String,
    pub modifiers: Vec<Modifier>,
    pub field_type: String,
    pub name: String,
    pub description: String,
}

impl Field {
    pub fn parse(declaration: String, description: String) -> Self {
        let parsed = declaration::parse_field(&declaration);
        Field {
            declaration,
            modifiers: parsed.modifiers,
            field_type: parsed.field_type,
            name: parsed.name,
            description,
        }
    }

    /// Initializer needed for the stub to compile: final fields and
    /// interface constants must be assigned at declaration.
    pub fn initializer(&self, owner: &TypeDecl) -> Option<&'static str> {
        if owner.is_interface() || self.modifiers.contains(&Modifier::Final) {
            Some(default_value(&self.field_type))
        } else {
            None
        }
    }
}

/// One class, interface or enum extracted from a javadoc page.
#[derive(Debug, Clone, Serialize)]
pub struct TypeDecl {
    /// Dot-separated; empty for the default package.
    pub package: String,
    pub name: String,
    pub declaration: String,
    pub description: String,
    pub kind: Kind,
    pub modifiers: Vec<Modifier>,
    /// Enum constants, in documentation order.
    pub constants: Vec<Field>,
    pub fields: Vec<Field>,
    pub constructors: Vec<Member>,
    pub methods: Vec<Member>,
}

impl TypeDecl {
    pub fn new(
        package: String,
        name: String,
        declaration: String,
        description: String,
    ) -> Result<Self> {
        let modifiers = declaration::parse_modifiers(&declaration);
        let mut kinds = modifiers.iter().filter_map(|m| m.kind());
        let kind = match (kinds.next(), kinds.next()) {
            (Some(kind), None) => kind,
            (None, _) => return Err(StubError::MissingKind(declaration)),
            (Some(_), Some(_)) => return Err(StubError::AmbiguousKind(declaration)),
        };
        Ok(TypeDecl {
            package,
            name,
            declaration,
            description,
            kind,
            modifiers,
            constants: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        })
    }

    pub fn is_interface(&self) -> bool {
        self.kind == Kind::Interface
    }

    /// Relative output path: package segments, then `Name.<extension>`.
    pub fn output_path(&self, extension: &str) -> PathBuf {
        let mut path: PathBuf = self
            .package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        path.push(format!("{}.{}", self.name, extension));
        path
    }
}
