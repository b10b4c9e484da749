//! Type model for the autobuilder workspace.
//!
//! This crate holds everything that describes *what* can be generated, with no
//! generation logic of its own:
//!
//! - [`TypeExpr`] - type expressions, parsed from and printed as text
//! - [`TypeDef`] / [`TypeModel`] - nominal type definitions (constructors, members,
//!   `add` accumulation methods, implemented interfaces) and their registry
//! - [`Value`] - the dynamic value tree that generation produces
//! - [`builtins`] - the standard container families every [`TypeModel::new`] starts with

pub mod builtins;
pub mod env_utils;
pub mod model;
pub mod type_expr;
pub mod value;

pub use model::{
    Access, AddFn, CollectionShape, ConstructFn, ConstructorDef, Initializer, MemberDef,
    MemberKind, MethodDef, ParamDef, SetterFn, TypeDef, TypeKind, TypeModel, Visibility,
    ADD_METHOD,
};
pub use type_expr::{parse_type_expr, PrimitiveKind, TypeExpr, TypeParseError};
pub use value::{Decimal, EnumValue, MapValue, Object, Sequence, Value};
