use super::Generator;
use crate::context::GenerateContext;
use crate::error::{GenerateError, GenerateResult};
use anyhow::anyhow;
use autobuilder_types::builtins::{FROZEN_MAP, HASH_MAP};
use autobuilder_types::{CollectionShape, MapValue, TypeExpr, Value};
use tracing::debug;

/// Mutable dictionaries: up to `collection_count` entries with distinct keys.
#[derive(Debug, Clone)]
pub struct DictionaryGenerator {
    key: TypeExpr,
    value: TypeExpr,
}

impl DictionaryGenerator {
    pub fn new(key: TypeExpr, value: TypeExpr) -> Self {
        Self { key, value }
    }

    fn default_type(&self) -> TypeExpr {
        TypeExpr::generic(HASH_MAP, vec![self.key.clone(), self.value.clone()])
    }

    /// Instantiate `declared` as a plain map and fill it. Falls back to the
    /// default map when `declared` does not produce one.
    fn build(&self, ctx: &mut GenerateContext<'_>, declared: &TypeExpr) -> GenerateResult<MapValue> {
        let map = match ctx.binder().create_empty(declared, ctx) {
            Value::Map(map) => map,
            _ => self.fallback(declared),
        };
        self.fill(ctx, declared, map)
    }

    fn fallback(&self, declared: &TypeExpr) -> MapValue {
        let fallback = self.default_type();
        debug!(ty = %declared, fallback = %fallback, "declared dictionary not instantiable");
        MapValue::new(fallback)
    }

    fn fill(
        &self,
        ctx: &mut GenerateContext<'_>,
        declared: &TypeExpr,
        mut map: MapValue,
    ) -> GenerateResult<MapValue> {
        for (key, value) in self.entries(ctx)? {
            if !map.try_insert(key, value) {
                debug!(ty = %declared, "duplicate generated key skipped");
            }
        }
        Ok(map)
    }

    /// Dictionary types that are not backed by a plain map: each entry goes
    /// through the type's own two-argument `add`.
    fn fill_through_add(
        &self,
        ctx: &mut GenerateContext<'_>,
        declared: &TypeExpr,
        mut instance: Value,
    ) -> GenerateResult<Value> {
        let arg_types = [self.key.clone(), self.value.clone()];
        let Some(add) = ctx.classifier().find_add_method(declared, &arg_types) else {
            debug!(ty = %declared, "dictionary type has no add method, leaving it empty");
            return Ok(instance);
        };

        let mut added: Vec<Value> = Vec::new();
        for (key, value) in self.entries(ctx)? {
            if added.contains(&key) {
                debug!(ty = %declared, "duplicate generated key skipped");
                continue;
            }
            add(&mut instance, vec![key.clone(), value])
                .map_err(|e| GenerateError::construction(declared.to_string(), e))?;
            added.push(key);
        }
        Ok(instance)
    }

    /// Candidate entries: `collection_count` keys, each paired with a generated
    /// value. Entries whose value is null are dropped.
    fn entries(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Vec<(Value, Value)>> {
        let count = ctx.collection_count();
        let keys = ctx.generate_unique_many(&self.key, count)?;
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let value = ctx.generate(&self.value)?;
            if !value.is_null() {
                entries.push((key, value));
            }
        }
        Ok(entries)
    }
}

impl Generator for DictionaryGenerator {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let declared = ctx
            .generate_type()
            .cloned()
            .unwrap_or_else(|| self.default_type());
        match ctx.binder().create_empty(&declared, ctx) {
            Value::Map(map) => Ok(Value::Map(self.fill(ctx, &declared, map)?)),
            Value::Null => {
                let map = self.fallback(&declared);
                Ok(Value::Map(self.fill(ctx, &declared, map)?))
            }
            instance => self.fill_through_add(ctx, &declared, instance),
        }
    }
}

/// Read-only dictionaries: fill a mutable map, then wrap it with the target
/// type's map-taking constructor.
#[derive(Debug, Clone)]
pub struct ReadOnlyDictionaryGenerator {
    inner: DictionaryGenerator,
}

impl ReadOnlyDictionaryGenerator {
    pub fn new(key: TypeExpr, value: TypeExpr) -> Self {
        Self {
            inner: DictionaryGenerator::new(key, value),
        }
    }

    fn args(&self) -> Vec<TypeExpr> {
        vec![self.inner.key.clone(), self.inner.value.clone()]
    }
}

impl Generator for ReadOnlyDictionaryGenerator {
    fn name(&self) -> &'static str {
        "read_only_dictionary"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let frozen = TypeExpr::generic(FROZEN_MAP, self.args());
        let declared = ctx.generate_type().cloned().unwrap_or_else(|| frozen.clone());
        let model = ctx.model();
        let target = match model.get_type(&declared) {
            Some(def) if !def.is_interface() => declared,
            _ => frozen,
        };

        let backing = self.inner.build(ctx, &self.inner.default_type())?;

        let found = model.get_type(&target).and_then(|def| {
            def.constructors
                .iter()
                .find(|c| {
                    c.arity() == 1
                        && model
                            .get_type(&c.params[0].ty)
                            .is_some_and(|p| p.shape == Some(CollectionShape::Dictionary))
                })
                .map(|ctor| (def, ctor))
        });
        let Some((def, ctor)) = found else {
            return Err(GenerateError::construction(
                target.to_string(),
                anyhow!("no constructor accepting a dictionary"),
            ));
        };
        ctx.binder()
            .invoke(def, ctor, &target, vec![Value::Map(backing)], ctx)
    }
}
