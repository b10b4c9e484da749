use super::Generator;
use crate::context::GenerateContext;
use crate::error::{GenerateError, GenerateResult};
use autobuilder_types::builtins::{HASH_SET, ITERABLE, VEC};
use autobuilder_types::{Sequence, TypeExpr, Value};
use tracing::debug;

/// `T[]`: exactly `collection_count` attempts, nulls dropped.
#[derive(Debug, Clone)]
pub struct ArrayGenerator {
    element: TypeExpr,
}

impl ArrayGenerator {
    pub fn new(element: TypeExpr) -> Self {
        Self { element }
    }
}

impl Generator for ArrayGenerator {
    fn name(&self) -> &'static str {
        "array"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let count = ctx.collection_count();
        Ok(Value::Array(ctx.generate_many(&self.element, count)?))
    }
}

/// Lists and plain collections: instantiate the declared type (or the default
/// list when it is an interface) and fill it.
#[derive(Debug, Clone)]
pub struct ListGenerator {
    element: TypeExpr,
}

impl ListGenerator {
    pub fn new(element: TypeExpr) -> Self {
        Self { element }
    }
}

impl Generator for ListGenerator {
    fn name(&self) -> &'static str {
        "list"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let declared = ctx
            .generate_type()
            .cloned()
            .unwrap_or_else(|| TypeExpr::generic(VEC, vec![self.element.clone()]));
        fill(ctx, &declared, &self.element, VEC)
    }
}

/// Sets: like lists, but duplicates are dropped on insert.
#[derive(Debug, Clone)]
pub struct SetGenerator {
    element: TypeExpr,
}

impl SetGenerator {
    pub fn new(element: TypeExpr) -> Self {
        Self { element }
    }
}

impl Generator for SetGenerator {
    fn name(&self) -> &'static str {
        "set"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let declared = ctx
            .generate_type()
            .cloned()
            .unwrap_or_else(|| TypeExpr::generic(HASH_SET, vec![self.element.clone()]));
        fill(ctx, &declared, &self.element, HASH_SET)
    }
}

/// The bare enumerable interface: a read-only sequence of generated items.
#[derive(Debug, Clone)]
pub struct EnumerableGenerator {
    element: TypeExpr,
}

impl EnumerableGenerator {
    pub fn new(element: TypeExpr) -> Self {
        Self { element }
    }
}

impl Generator for EnumerableGenerator {
    fn name(&self) -> &'static str {
        "enumerable"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let count = ctx.collection_count();
        let items = ctx.generate_many(&self.element, count)?;
        let mut seq = Sequence::new(TypeExpr::generic(ITERABLE, vec![self.element.clone()]));
        seq.items = items;
        Ok(Value::Sequence(seq))
    }
}

fn fill(
    ctx: &mut GenerateContext<'_>,
    declared: &TypeExpr,
    element: &TypeExpr,
    fallback: &str,
) -> GenerateResult<Value> {
    let mut instance = ctx.binder().create_empty(declared, ctx);
    if !matches!(instance, Value::Sequence(_)) && !instance.is_null() {
        return fill_through_add(ctx, declared, element, instance);
    }
    if instance.is_null() {
        let concrete = TypeExpr::generic(fallback, vec![element.clone()]);
        debug!(ty = %declared, fallback = %concrete, "declared collection not instantiable");
        instance = Value::Sequence(if fallback == HASH_SET {
            Sequence::set(concrete)
        } else {
            Sequence::new(concrete)
        });
    }

    let count = ctx.collection_count();
    let items = ctx.generate_many(element, count)?;
    if let Value::Sequence(seq) = &mut instance {
        for item in items {
            seq.insert(item);
        }
    }
    Ok(instance)
}

/// Custom collection types that are not backed by a plain sequence: items go
/// through the type's own `add`.
fn fill_through_add(
    ctx: &mut GenerateContext<'_>,
    declared: &TypeExpr,
    element: &TypeExpr,
    mut instance: Value,
) -> GenerateResult<Value> {
    let classifier = ctx.classifier();
    let arg_types = classifier.accumulation_arg_types(declared);
    let Some(add) = classifier.find_add_method(declared, &arg_types) else {
        debug!(ty = %declared, "collection type has no add method, leaving it empty");
        return Ok(instance);
    };

    let count = ctx.collection_count();
    for item in ctx.generate_many(element, count)? {
        add(&mut instance, vec![item])
            .map_err(|e| GenerateError::construction(declared.to_string(), e))?;
    }
    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::context::ExclusionPaths;
    use crate::resolver::Resolver;
    use autobuilder_types::{ConstructorDef, MethodDef, Object, TypeDef, TypeModel};
    use std::sync::Arc;

    fn ty(text: &str) -> TypeExpr {
        text.parse().unwrap()
    }

    fn generate(model: TypeModel, text: &str, count: usize) -> Value {
        let resolver = Resolver::new(Arc::new(model));
        let config = GeneratorConfig::default()
            .with_seed(11)
            .with_collection_count(count);
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());
        ctx.generate(&ty(text)).unwrap()
    }

    #[test]
    fn test_array_length_matches_count() {
        let value = generate(TypeModel::new(), "int[]", 4);
        assert!(matches!(&value, Value::Array(items) if items.len() == 4));
    }

    #[test]
    fn test_array_drops_unconstructible_elements() {
        let model = TypeModel::new().with_type(TypeDef::class("Sealed"));
        assert_eq!(generate(model, "Sealed[]", 3), Value::Array(Vec::new()));
    }

    #[test]
    fn test_list_interface_uses_default_list() {
        let value = generate(TypeModel::new(), "List<string>", 5);
        let seq = value.as_sequence().unwrap();
        assert_eq!(seq.ty, ty("Vec<string>"));
        assert_eq!(seq.len(), 5);
        assert!(!seq.unique);
    }

    #[test]
    fn test_concrete_list_keeps_declared_type() {
        let value = generate(TypeModel::new(), "Vec<int>", 2);
        assert_eq!(value.as_sequence().unwrap().ty, ty("Vec<int>"));
    }

    #[test]
    fn test_set_never_repeats() {
        let value = generate(TypeModel::new(), "Set<bool>", 12);
        let seq = value.as_sequence().unwrap();
        assert!(seq.unique);
        assert!(seq.len() <= 2);
    }

    #[test]
    fn test_enumerable_is_read_only_sequence() {
        let value = generate(TypeModel::new(), "Iterable<int>", 3);
        let seq = value.as_sequence().unwrap();
        assert_eq!(seq.ty, ty("Iterable<int>"));
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_custom_collection_filled_through_add() {
        let model = TypeModel::new().with_type(
            TypeDef::class("Tally")
                .implements(ty("Collection<int>"))
                .constructor(ConstructorDef::custom(Vec::new(), |ty, _| {
                    let mut tally = Object::new(ty.clone());
                    tally.set("Count", Value::Int(0));
                    Ok(Value::Object(tally))
                }))
                .method(MethodDef::add(vec![TypeExpr::int()], |target, _| {
                    if let Some(Value::Int(n)) = target.as_object_mut().and_then(|o| o.get_mut("Count")) {
                        *n += 1;
                    }
                    Ok(())
                })),
        );
        let value = generate(model, "Tally", 6);
        assert_eq!(value.field("Count"), Some(&Value::Int(6)));
    }
}
