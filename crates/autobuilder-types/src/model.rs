//! Type definitions and the type model registry.
//!
//! A [`TypeDef`] describes everything generation needs to know about a nominal
//! type: its kind, the generic collection shape it *is* (interfaces only), the
//! generic interfaces it implements, its constructors, its members and its
//! `add` accumulation entry points. Inside a generic definition, `T0`, `T1`, ...
//! refer to the definition's own type parameters.
//!
//! [`TypeModel`] is an immutable-after-setup registry keyed by type name.

use crate::builtins;
use crate::type_expr::{PrimitiveKind, TypeExpr};
use crate::value::{Decimal, EnumValue, Object, Value};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Constructor body: receives the closed type being constructed and the generated arguments.
pub type ConstructFn = Arc<dyn Fn(&TypeExpr, Vec<Value>) -> anyhow::Result<Value> + Send + Sync>;

/// Custom member setter.
pub type SetterFn = Arc<dyn Fn(&mut Object, Value) -> anyhow::Result<()> + Send + Sync>;

/// Accumulation entry point (`add`): receives the container and the arguments.
pub type AddFn = Arc<dyn Fn(&mut Value, Vec<Value>) -> anyhow::Result<()> + Send + Sync>;

/// Name of the accumulation method looked up on read-only container members.
pub const ADD_METHOD: &str = "add";

/// Generic collection shape a type exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionShape {
    Dictionary,
    ReadOnlyDictionary,
    List,
    Set,
    Collection,
    Enumerable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Reference type: zero value is null.
    Class,
    /// Value type: zero value is an object of zeroed members.
    Struct,
    Interface,
    Enum(Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    ReadWrite,
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

/// Value a member holds right after record construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initializer {
    /// Zero value of the member type (null for reference types).
    Zero,
    /// Fresh empty instance of the member type, e.g. `public List<T> Items { get; } = new()`.
    NewInstance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    pub name: String,
    pub ty: TypeExpr,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone)]
pub struct ConstructorDef {
    pub params: Vec<ParamDef>,
    /// Without a body, construction builds a record from the type's members.
    pub body: Option<ConstructFn>,
}

impl ConstructorDef {
    /// Zero-argument record constructor.
    pub fn empty() -> Self {
        Self {
            params: Vec::new(),
            body: None,
        }
    }

    /// Record constructor assigning each parameter to the member with the same name.
    pub fn with_params(params: Vec<ParamDef>) -> Self {
        Self { params, body: None }
    }

    pub fn custom<F>(params: Vec<ParamDef>, body: F) -> Self
    where
        F: Fn(&TypeExpr, Vec<Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            params,
            body: Some(Arc::new(body)),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Debug for ConstructorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDef")
            .field("params", &self.params)
            .field("custom_body", &self.body.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct MemberDef {
    pub name: String,
    pub ty: TypeExpr,
    pub kind: MemberKind,
    pub access: Access,
    pub visibility: Visibility,
    pub init: Initializer,
    pub setter: Option<SetterFn>,
}

impl MemberDef {
    /// Public read-write property.
    pub fn property(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: MemberKind::Property,
            access: Access::ReadWrite,
            visibility: Visibility::Public,
            init: Initializer::Zero,
            setter: None,
        }
    }

    /// Public field.
    pub fn field(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            kind: MemberKind::Field,
            ..Self::property(name, ty)
        }
    }

    /// Getter-only property initialized with a fresh instance of its type.
    pub fn read_only(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            access: Access::ReadOnly,
            init: Initializer::NewInstance,
            ..Self::property(name, ty)
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn initialized(mut self, init: Initializer) -> Self {
        self.init = init;
        self
    }

    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut Object, Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    /// Directly assignable from outside the type.
    pub fn is_writable(&self) -> bool {
        match self.kind {
            MemberKind::Field => self.visibility == Visibility::Public,
            MemberKind::Property => {
                self.visibility == Visibility::Public && self.access == Access::ReadWrite
            }
        }
    }
}

impl fmt::Debug for MemberDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("kind", &self.kind)
            .field("access", &self.access)
            .field("visibility", &self.visibility)
            .field("init", &self.init)
            .field("custom_setter", &self.setter.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<TypeExpr>,
    pub body: AddFn,
}

impl MethodDef {
    pub fn new<F>(name: impl Into<String>, params: Vec<TypeExpr>, body: F) -> Self
    where
        F: Fn(&mut Value, Vec<Value>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            body: Arc::new(body),
        }
    }

    pub fn add<F>(params: Vec<TypeExpr>, body: F) -> Self
    where
        F: Fn(&mut Value, Vec<Value>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::new(ADD_METHOD, params, body)
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    /// Number of generic parameters (`T0..Tn`).
    pub type_params: usize,
    pub kind: TypeKind,
    /// Collection shape this type *is* (set on the shape interfaces themselves).
    pub shape: Option<CollectionShape>,
    /// Implemented generic interfaces, expressed over this type's own parameters.
    pub interfaces: Vec<TypeExpr>,
    pub constructors: Vec<ConstructorDef>,
    pub members: Vec<MemberDef>,
    pub methods: Vec<MethodDef>,
}

impl TypeDef {
    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            type_params: 0,
            kind,
            shape: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            members: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Class with no constructors yet. Add one with [`TypeDef::constructor`].
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }

    /// Class with a zero-argument record constructor.
    pub fn record(name: impl Into<String>) -> Self {
        Self::class(name).constructor(ConstructorDef::empty())
    }

    /// Value type with a zero-argument record constructor.
    pub fn structure(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Struct).constructor(ConstructorDef::empty())
    }

    pub fn interface(name: impl Into<String>, type_params: usize) -> Self {
        Self::with_kind(name, TypeKind::Interface).generic(type_params)
    }

    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_kind(
            name,
            TypeKind::Enum(variants.into_iter().map(Into::into).collect()),
        )
    }

    pub fn generic(mut self, type_params: usize) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn shaped(mut self, shape: CollectionShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn implements(mut self, interface: TypeExpr) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn constructor(mut self, ctor: ConstructorDef) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn member(mut self, member: MemberDef) -> Self {
        self.members.push(member);
        self
    }

    pub fn property(self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.member(MemberDef::property(name, ty))
    }

    pub fn field(self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.member(MemberDef::field(name, ty))
    }

    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct | TypeKind::Enum(_))
    }

    pub fn variants(&self) -> Option<&[String]> {
        match &self.kind {
            TypeKind::Enum(variants) => Some(variants),
            _ => None,
        }
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }

    pub fn default_constructor(&self) -> Option<&ConstructorDef> {
        self.constructors.iter().find(|c| c.params.is_empty())
    }
}

/// Registry of type definitions, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TypeModel {
    types: HashMap<String, Arc<TypeDef>>,
}

/// Structs nested deeper than this zero to null (guards self-referencing value types).
const MAX_ZERO_DEPTH: usize = 32;

impl TypeModel {
    /// Model pre-seeded with the builtin container families.
    pub fn new() -> Self {
        let mut model = Self::empty();
        builtins::register_builtins(&mut model);
        model
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Register (or replace) a type definition.
    pub fn register(&mut self, def: TypeDef) -> &mut Self {
        self.types.insert(def.name.clone(), Arc::new(def));
        self
    }

    pub fn with_type(mut self, def: TypeDef) -> Self {
        self.register(def);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.types.get(name)
    }

    /// Definition behind a named type expression (by-reference wrappers are ignored).
    pub fn get_type(&self, ty: &TypeExpr) -> Option<&Arc<TypeDef>> {
        ty.unwrap_ref().name().and_then(|name| self.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// True for value types (primitives other than text, structs, enums, nullable wrappers).
    pub fn is_value_type(&self, ty: &TypeExpr) -> bool {
        match ty.unwrap_ref() {
            TypeExpr::Primitive { primitive } => primitive.is_value_type(),
            TypeExpr::Nullable { .. } => true,
            TypeExpr::Named { .. } => self.get_type(ty).is_some_and(|def| def.is_value_type()),
            _ => false,
        }
    }

    /// Default value of a type, as held by an unpopulated member.
    pub fn zero_value(&self, ty: &TypeExpr) -> Value {
        self.zero_value_at(ty, 0)
    }

    fn zero_value_at(&self, ty: &TypeExpr, depth: usize) -> Value {
        match ty.unwrap_ref() {
            TypeExpr::Primitive { primitive } => match primitive {
                PrimitiveKind::Bool => Value::Bool(false),
                PrimitiveKind::Int => Value::Int(0),
                PrimitiveKind::Float => Value::Float(0.0),
                PrimitiveKind::Double => Value::Double(0.0),
                PrimitiveKind::Decimal => Value::Decimal(Decimal::ZERO),
                PrimitiveKind::DateTime => Value::DateTime(DateTime::<Utc>::MIN_UTC),
                PrimitiveKind::Guid => Value::Guid(Uuid::nil()),
                PrimitiveKind::String => Value::Null,
            },
            TypeExpr::Named { args, .. } => {
                let Some(def) = self.get_type(ty) else {
                    return Value::Null;
                };
                match &def.kind {
                    TypeKind::Enum(variants) => match variants.first() {
                        Some(first) => Value::Enum(EnumValue {
                            type_name: def.name.clone(),
                            variant: first.clone(),
                        }),
                        None => Value::Null,
                    },
                    TypeKind::Struct if depth < MAX_ZERO_DEPTH => {
                        let mut object = Object::new(ty.unwrap_ref().clone());
                        for member in &def.members {
                            let member_ty = member.ty.substitute(args);
                            object.set(member.name.clone(), self.zero_value_at(&member_ty, depth + 1));
                        }
                        Value::Object(object)
                    }
                    _ => Value::Null,
                }
            }
            _ => Value::Null,
        }
    }
}
