//! AutoBuilder
//!
//! Randomized, structurally valid test fixtures for types described in a
//! [`TypeModel`]:
//!
//! - **Generation**: primitives, enums, arrays, lists, sets, dictionaries and
//!   composite records, recursively
//! - **Skip declarations**: leave chosen members at their zero value, per type
//!   or narrowed to a field of a collection's elements
//! - **Reproducibility**: seeded generation, including parallel batches
//! - **Typed output**: deserialize a generated tree into any `serde` type
//!
//! See [`AutoBuilder`] for the entry point. The lower-level pieces live in
//! [`autobuilder_core`] and [`autobuilder_types`].

#![allow(clippy::result_large_err)]

pub mod builder;
pub mod skip;

pub use builder::AutoBuilder;
pub use skip::SkipMembers;

pub use autobuilder_core::{
    ExclusionPaths, GenerateContext, GenerateError, GenerateResult, GeneratorConfig, Randomizer,
    Resolver,
};
pub use autobuilder_types::{
    ConstructorDef, MemberDef, MethodDef, ParamDef, TypeDef, TypeExpr, TypeModel, Value,
};
