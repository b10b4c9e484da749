//! Generation strategies.
//!
//! The [`Resolver`](crate::resolver::Resolver) picks one strategy per type and
//! caches it. Strategies are stateless apart from the type arguments they were
//! built for; all mutable state lives in the [`GenerateContext`].

use crate::context::GenerateContext;
use crate::error::GenerateResult;
use autobuilder_types::Value;

mod composite;
mod dictionary;
mod enumeration;
mod nullable;
mod primitive;
mod sequence;

pub use composite::CompositeGenerator;
pub use dictionary::{DictionaryGenerator, ReadOnlyDictionaryGenerator};
pub use enumeration::EnumGenerator;
pub use nullable::NullableGenerator;
pub use primitive::PrimitiveGenerator;
pub use sequence::{ArrayGenerator, EnumerableGenerator, ListGenerator, SetGenerator};

/// One generation strategy.
///
/// `Value::Null` is a legal result: it means "could not be constructed" and
/// is never an error.
pub trait Generator: Send + Sync {
    /// Short strategy name, for logging and diagnostics.
    fn name(&self) -> &'static str;

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value>;
}
