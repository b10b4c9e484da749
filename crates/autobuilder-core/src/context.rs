//! Per-call generation context.
//!
//! One [`GenerateContext`] is created per top-level generate call and threaded
//! through the whole recursion. The current target type changes as generation
//! descends; the exclusion paths never change after creation.

use crate::binder::Binder;
use crate::classifier::TypeClassifier;
use crate::config::GeneratorConfig;
use crate::error::{GenerateError, GenerateResult};
use crate::randomizer::Randomizer;
use crate::resolver::Resolver;
use autobuilder_types::{TypeExpr, TypeModel, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::trace;

/// Immutable set of `"<TypeName>.<MemberName>"` paths whose members are never populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionPaths {
    paths: Arc<BTreeSet<String>>,
}

impl ExclusionPaths {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, type_name: &str, member: &str) -> bool {
        self.paths.contains(&format!("{}.{}", type_name, member))
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionPaths {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: Arc::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

pub struct GenerateContext<'a> {
    resolver: &'a Resolver,
    config: &'a GeneratorConfig,
    binder: Binder,
    skip_members: ExclusionPaths,
    generate_type: Option<TypeExpr>,
    random: Randomizer,
    depth: usize,
}

impl<'a> GenerateContext<'a> {
    /// New context with its own random source, seeded from `config.seed`.
    pub fn new(
        resolver: &'a Resolver,
        config: &'a GeneratorConfig,
        skip_members: ExclusionPaths,
    ) -> Self {
        Self {
            resolver,
            config,
            binder: Binder,
            skip_members,
            generate_type: None,
            random: Randomizer::from_seed(config.seed),
            depth: 0,
        }
    }

    /// Use a specific (possibly shared) random source instead of a fresh one.
    pub fn with_randomizer(mut self, random: Randomizer) -> Self {
        self.random = random;
        self
    }

    /// Type currently being generated. `None` before the first call to
    /// [`generate`](Self::generate).
    pub fn generate_type(&self) -> Option<&TypeExpr> {
        self.generate_type.as_ref()
    }

    pub fn skip_members(&self) -> &ExclusionPaths {
        &self.skip_members
    }

    pub fn random(&self) -> &Randomizer {
        &self.random
    }

    pub fn config(&self) -> &'a GeneratorConfig {
        self.config
    }

    pub fn resolver(&self) -> &'a Resolver {
        self.resolver
    }

    pub fn model(&self) -> &'a TypeModel {
        self.resolver.model()
    }

    pub fn classifier(&self) -> &'a TypeClassifier {
        self.resolver.classifier()
    }

    pub fn binder(&self) -> Binder {
        self.binder
    }

    /// Current recursion depth (0 at the root call).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Element count used by container strategies.
    pub fn collection_count(&self) -> usize {
        self.config.collection_count
    }

    /// Generate one value of `ty`. `Value::Null` means it could not be constructed.
    pub fn generate(&mut self, ty: &TypeExpr) -> GenerateResult<Value> {
        if let Some(max_depth) = self.config.max_depth {
            if self.depth >= max_depth {
                return Err(GenerateError::DepthExceeded {
                    type_name: ty.to_string(),
                    max_depth,
                });
            }
        }

        self.generate_type = Some(ty.clone());
        let generator = self.resolver.resolve(ty);
        trace!(ty = %ty, strategy = generator.name(), depth = self.depth, "generating");

        self.depth += 1;
        let result = generator.generate(self);
        self.depth -= 1;
        result
    }

    /// Generate `count` values, keeping only non-null results.
    pub fn generate_many(&mut self, ty: &TypeExpr, count: usize) -> GenerateResult<Vec<Value>> {
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let item = self.generate(ty)?;
            if !item.is_null() {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// Best-effort "unique" generation: the same bounded loop as
    /// [`generate_many`](Self::generate_many), with no deduplication. Callers
    /// that need distinct values (dictionary keys) must tolerate duplicates.
    pub fn generate_unique_many(
        &mut self,
        ty: &TypeExpr,
        count: usize,
    ) -> GenerateResult<Vec<Value>> {
        self.generate_many(ty, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autobuilder_types::TypeDef;

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(
            TypeModel::new()
                .with_type(TypeDef::class("Sealed"))
                .with_type(TypeDef::record("Node").property("Next", TypeExpr::named("Node"))),
        ))
    }

    #[test]
    fn test_exclusion_paths() {
        let paths: ExclusionPaths = ["Team.Members", "Member.Name"].into_iter().collect();
        assert!(paths.contains("Team", "Members"));
        assert!(paths.contains_path("Member.Name"));
        assert!(!paths.contains("Team", "Name"));
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_generate_sets_target_type() {
        let resolver = resolver();
        let config = GeneratorConfig::default().with_seed(1);
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());
        assert_eq!(ctx.generate_type(), None);

        ctx.generate(&TypeExpr::int()).unwrap();
        assert_eq!(ctx.generate_type(), Some(&TypeExpr::int()));
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_generate_many_skips_nulls() {
        let resolver = resolver();
        let config = GeneratorConfig::default().with_seed(1);
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());

        let sealed = ctx.generate_many(&TypeExpr::named("Sealed"), 5).unwrap();
        assert!(sealed.is_empty());

        let ints = ctx.generate_many(&TypeExpr::int(), 5).unwrap();
        assert_eq!(ints.len(), 5);
    }

    #[test]
    fn test_unique_many_does_not_deduplicate() {
        let resolver = resolver();
        let config = GeneratorConfig::default().with_seed(5);
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());

        let flags = ctx.generate_unique_many(&TypeExpr::bool(), 20).unwrap();
        assert_eq!(flags.len(), 20);
        let trues = flags.iter().filter(|v| **v == Value::Bool(true)).count();
        assert!(trues > 0 && trues < 20);
    }

    #[test]
    fn test_depth_guard_stops_self_reference() {
        let resolver = resolver();
        let config = GeneratorConfig::default().with_seed(1).with_max_depth(8);
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());

        let err = ctx.generate(&TypeExpr::named("Node")).unwrap_err();
        assert!(matches!(err, GenerateError::DepthExceeded { max_depth: 8, .. }));
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_same_seed_same_output() {
        let resolver = resolver();
        let config = GeneratorConfig::default().with_seed(99);
        let first = GenerateContext::new(&resolver, &config, ExclusionPaths::empty())
            .generate_many(&TypeExpr::string(), 3)
            .unwrap();
        let second = GenerateContext::new(&resolver, &config, ExclusionPaths::empty())
            .generate_many(&TypeExpr::string(), 3)
            .unwrap();
        assert_eq!(first, second);
    }
}
