//! The generation façade.
//!
//! An [`AutoBuilder`] ties together a type model (through a shared
//! [`Resolver`]), a target type, skip declarations and a [`GeneratorConfig`].
//! Each call to [`generate`](AutoBuilder::generate) creates a fresh context,
//! so one builder can be used repeatedly and from several threads.

use crate::skip::SkipMembers;
use anyhow::{Context, Result};
use autobuilder_core::{GenerateContext, GenerateResult, GeneratorConfig, Resolver};
use autobuilder_types::{TypeExpr, TypeModel, Value};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AutoBuilder {
    resolver: Arc<Resolver>,
    target: TypeExpr,
    skip: SkipMembers,
    config: GeneratorConfig,
}

impl AutoBuilder {
    pub fn new(model: Arc<TypeModel>, target: TypeExpr) -> Self {
        Self::with_resolver(Arc::new(Resolver::new(model)), target)
    }

    /// Reuse an existing resolver (and its memoized strategies).
    pub fn with_resolver(resolver: Arc<Resolver>, target: TypeExpr) -> Self {
        Self {
            resolver,
            target,
            skip: SkipMembers::new(),
            config: GeneratorConfig::default(),
        }
    }

    /// Builder for a target given in text form, e.g. `"HashMap<string, Team>"`.
    pub fn for_type(model: Arc<TypeModel>, target: &str) -> Result<Self> {
        let target: TypeExpr = target
            .parse()
            .with_context(|| format!("invalid target type '{}'", target))?;
        Ok(Self::new(model, target))
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Skip a member of the target type.
    pub fn with_skip(mut self, member: &str) -> Self {
        let type_name = self.target_name();
        self.skip.with_skip(&type_name, member);
        self
    }

    /// Skip a member of any type in the generated graph.
    pub fn with_skip_on(mut self, type_name: &str, member: &str) -> Self {
        self.skip.with_skip(type_name, member);
        self
    }

    /// Narrow the most recent skip to one member of the skipped member's element type.
    pub fn with_specific_field(mut self, element_type: &str, member: &str) -> Self {
        self.skip.with_specific_field(element_type, member);
        self
    }

    pub fn target(&self) -> &TypeExpr {
        &self.target
    }

    pub fn skip_members(&self) -> &SkipMembers {
        &self.skip
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<Resolver> {
        &self.resolver
    }

    /// Generate one value of the target type. `Value::Null` when the target
    /// cannot be constructed.
    pub fn generate(&self) -> GenerateResult<Value> {
        self.config.validate()?;
        self.generate_with(&self.config)
    }

    /// Generate and deserialize into `T` through the JSON form of the value.
    pub fn generate_as<T: DeserializeOwned>(&self) -> Result<T> {
        let value = self
            .generate()
            .with_context(|| format!("failed to generate '{}'", self.target))?;
        serde_json::from_value(value.to_json())
            .with_context(|| format!("generated '{}' does not match the requested type", self.target))
    }

    /// Generate `count` values in parallel. With a seed, item `i` uses
    /// `seed + i`, so the batch is reproducible.
    pub fn generate_batch(&self, count: usize) -> GenerateResult<Vec<Value>> {
        self.config.validate()?;
        debug!(ty = %self.target, count, "generating batch");

        (0..count)
            .into_par_iter()
            .map(|index| {
                let mut config = self.config.clone();
                config.seed = self.config.seed.map(|seed| seed.wrapping_add(index as u64));
                self.generate_with(&config)
            })
            .collect()
    }

    fn generate_with(&self, config: &GeneratorConfig) -> GenerateResult<Value> {
        let mut ctx =
            GenerateContext::new(&self.resolver, config, self.skip.to_exclusion_paths());
        ctx.generate(&self.target)
    }

    fn target_name(&self) -> String {
        match self.resolver.model().get_type(&self.target) {
            Some(def) => def.name.clone(),
            None => self.target.to_string(),
        }
    }
}
