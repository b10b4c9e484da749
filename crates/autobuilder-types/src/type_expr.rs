//! Type expressions and their text form.
//!
//! A [`TypeExpr`] names a type the generator can be asked for: a primitive, a
//! registered nominal type (optionally with generic arguments), a generic
//! parameter placeholder used inside generic definitions, or one of the
//! array/nullable/by-reference wrappers.
//!
//! Text form:
//! - Primitive keywords: `bool`, `int`, `float`, `double`, `decimal`, `datetime`, `guid`, `string`
//! - Nominal types: `Team`, `HashMap<string, List<int>>`
//! - Generic parameters: `T0`, `T1`, ...
//! - Wrappers: `int[]`, `int?`, `&Team`
//!
//! # Examples
//!
//! ```
//! use autobuilder_types::TypeExpr;
//!
//! let ty: TypeExpr = "HashMap<string, int[]>".parse().unwrap();
//! assert_eq!(ty.to_string(), "HashMap<string, int[]>");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in scalar kinds with a dedicated generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    Double,
    Decimal,
    DateTime,
    Guid,
    String,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
        PrimitiveKind::DateTime,
        PrimitiveKind::Guid,
        PrimitiveKind::String,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::DateTime => "datetime",
            PrimitiveKind::Guid => "guid",
            PrimitiveKind::String => "string",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.keyword() == keyword)
    }

    /// Text is the only primitive with reference semantics (zero value is null).
    pub fn is_value_type(self) -> bool {
        !matches!(self, PrimitiveKind::String)
    }
}

/// A reference to a type, possibly generic and possibly wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    Primitive { primitive: PrimitiveKind },
    Named { name: String, args: Vec<TypeExpr> },
    /// Positional generic parameter of the enclosing definition (`T0`, `T1`, ...).
    Param { index: usize },
    Array { element: Box<TypeExpr> },
    Nullable { inner: Box<TypeExpr> },
    ByRef { inner: Box<TypeExpr> },
}

impl TypeExpr {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeExpr::Primitive { primitive: kind }
    }

    pub fn bool() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    pub fn int() -> Self {
        Self::primitive(PrimitiveKind::Int)
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Named {
            name: name.into(),
            args,
        }
    }

    pub fn param(index: usize) -> Self {
        TypeExpr::Param { index }
    }

    pub fn array(element: TypeExpr) -> Self {
        TypeExpr::Array {
            element: Box::new(element),
        }
    }

    pub fn nullable(inner: TypeExpr) -> Self {
        TypeExpr::Nullable {
            inner: Box::new(inner),
        }
    }

    pub fn by_ref(inner: TypeExpr) -> Self {
        TypeExpr::ByRef {
            inner: Box::new(inner),
        }
    }

    /// Strip any number of by-reference wrappers.
    pub fn unwrap_ref(&self) -> &TypeExpr {
        let mut current = self;
        while let TypeExpr::ByRef { inner } = current {
            current = inner;
        }
        current
    }

    /// Nominal name, if this is a named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeExpr::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Generic arguments of a named type (empty for everything else).
    pub fn args(&self) -> &[TypeExpr] {
        match self {
            TypeExpr::Named { args, .. } => args,
            _ => &[],
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeExpr::Primitive { primitive } => Some(*primitive),
            _ => None,
        }
    }

    /// Replace every `Param { index }` with `args[index]`.
    ///
    /// Parameters without a corresponding argument are left in place.
    pub fn substitute(&self, args: &[TypeExpr]) -> TypeExpr {
        if args.is_empty() {
            return self.clone();
        }
        match self {
            TypeExpr::Param { index } => args.get(*index).cloned().unwrap_or_else(|| self.clone()),
            TypeExpr::Named { name, args: inner } => TypeExpr::Named {
                name: name.clone(),
                args: inner.iter().map(|a| a.substitute(args)).collect(),
            },
            TypeExpr::Array { element } => TypeExpr::array(element.substitute(args)),
            TypeExpr::Nullable { inner } => TypeExpr::nullable(inner.substitute(args)),
            TypeExpr::ByRef { inner } => TypeExpr::by_ref(inner.substitute(args)),
            TypeExpr::Primitive { .. } => self.clone(),
        }
    }

    /// True if no generic parameter placeholder remains anywhere in the expression.
    pub fn is_closed(&self) -> bool {
        match self {
            TypeExpr::Param { .. } => false,
            TypeExpr::Named { args, .. } => args.iter().all(TypeExpr::is_closed),
            TypeExpr::Array { element } => element.is_closed(),
            TypeExpr::Nullable { inner } | TypeExpr::ByRef { inner } => inner.is_closed(),
            TypeExpr::Primitive { .. } => true,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Primitive { primitive } => f.write_str(primitive.keyword()),
            TypeExpr::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeExpr::Param { index } => write!(f, "T{}", index),
            TypeExpr::Array { element } => write!(f, "{}[]", element),
            TypeExpr::Nullable { inner } => write!(f, "{}?", inner),
            TypeExpr::ByRef { inner } => write!(f, "&{}", inner),
        }
    }
}

/// Error returned when a type string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParseError {
    pub input: String,
    pub reason: String,
}

impl TypeParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid type '{}': {}", self.input, self.reason)
    }
}

impl std::error::Error for TypeParseError {}

impl FromStr for TypeExpr {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_expr(s)
    }
}

/// Parse a type string such as `HashMap<string, Team[]>` into a [`TypeExpr`].
pub fn parse_type_expr(type_str: &str) -> Result<TypeExpr, TypeParseError> {
    let s = type_str.trim();
    if s.is_empty() {
        return Err(TypeParseError::new(type_str, "empty type"));
    }

    if let Some(rest) = s.strip_prefix('&') {
        return Ok(TypeExpr::by_ref(parse_type_expr(rest)?));
    }
    if let Some(rest) = s.strip_suffix("[]") {
        return Ok(TypeExpr::array(parse_type_expr(rest)?));
    }
    if let Some(rest) = s.strip_suffix('?') {
        return Ok(TypeExpr::nullable(parse_type_expr(rest)?));
    }

    if let Some(kind) = PrimitiveKind::from_keyword(s) {
        return Ok(TypeExpr::primitive(kind));
    }

    if let Some(index) = s.strip_prefix('T').and_then(|d| d.parse::<usize>().ok()) {
        return Ok(TypeExpr::param(index));
    }

    let (base, args) = match s.find('<') {
        Some(angle_pos) => {
            let inner = s[angle_pos + 1..]
                .strip_suffix('>')
                .ok_or_else(|| TypeParseError::new(type_str, "unbalanced '<'"))?;
            let mut args = Vec::new();
            for arg in split_type_params(inner) {
                if arg.is_empty() {
                    return Err(TypeParseError::new(type_str, "empty type argument"));
                }
                args.push(parse_type_expr(arg)?);
            }
            (s[..angle_pos].trim(), args)
        }
        None => (s, Vec::new()),
    };

    if !is_valid_name(base) {
        return Err(TypeParseError::new(
            type_str,
            format!("'{}' is not a valid type name", base),
        ));
    }

    Ok(TypeExpr::generic(base, args))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == ':')
}

/// Split type parameters respecting nested angle brackets.
///
/// Given "A, B<C, D>, E", returns ["A", "B<C, D>", "E"] by tracking bracket depth.
pub fn split_type_params(s: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                result.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    if start < s.len() {
        result.push(s[start..].trim());
    }

    result
}
