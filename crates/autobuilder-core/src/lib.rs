//! Autobuilder Core
//!
//! Randomized value generation over a [`TypeModel`](autobuilder_types::TypeModel).
//!
//! # Features
//!
//! - **Classification**: every type maps to exactly one structural category
//! - **Resolution**: one memoized generation strategy per type
//! - **Binding**: composite construction followed by member population, with
//!   per-member exclusion paths
//! - **Randomizer**: seedable primitive source (numbers, text, dates, enums, selections)
//!
//! # Core Modules
//!
//! - [`classifier`]: TypeClassifier and the category precedence rules
//! - [`resolver`]: Resolver, the memoized strategy registry
//! - [`context`]: GenerateContext threaded through one generation call
//! - [`binder`]: constructor selection and member population
//! - [`generators`]: one strategy per category
//! - [`randomizer`]: the random source
//!
//! # Example
//!
//! ```ignore
//! use autobuilder_core::{ExclusionPaths, GenerateContext, GeneratorConfig, Resolver};
//! use autobuilder_types::{TypeDef, TypeExpr, TypeModel};
//!
//! let model = TypeModel::new().with_type(TypeDef::record("Point").property("X", TypeExpr::int()));
//! let resolver = Resolver::new(std::sync::Arc::new(model));
//! let config = GeneratorConfig::default().with_seed(7);
//!
//! let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());
//! let point = ctx.generate(&TypeExpr::named("Point"))?;
//! ```

#![allow(clippy::result_large_err)]

pub mod binder;
pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
pub mod generators;
pub mod randomizer;
pub mod resolver;

pub use binder::Binder;
pub use classifier::{ShapeMatch, TypeCategory, TypeClassifier};
pub use config::{GeneratorConfig, DEFAULT_STRING_POOL};
pub use context::{ExclusionPaths, GenerateContext};
pub use error::{GenerateError, GenerateResult};
pub use generators::Generator;
pub use randomizer::{Randomizer, MAX_DATE_WINDOW_DAYS};
pub use resolver::Resolver;
