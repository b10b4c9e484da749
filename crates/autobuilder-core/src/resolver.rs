//! Generator registry and resolution.
//!
//! Maps a type to its generation strategy. Both the classification and the
//! strategy are memoized per type expression, so repeated requests for the
//! same type during a deep recursion cost one read-lock lookup.

use crate::classifier::{TypeCategory, TypeClassifier};
use crate::generators::{
    ArrayGenerator, CompositeGenerator, DictionaryGenerator, EnumGenerator, EnumerableGenerator,
    Generator, ListGenerator, NullableGenerator, PrimitiveGenerator, ReadOnlyDictionaryGenerator,
    SetGenerator,
};
use autobuilder_types::{PrimitiveKind, TypeExpr, TypeModel};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct Resolver {
    classifier: TypeClassifier,
    categories: RwLock<HashMap<TypeExpr, TypeCategory>>,
    generators: RwLock<HashMap<TypeExpr, Arc<dyn Generator>>>,
    primitives: HashMap<PrimitiveKind, Arc<dyn Generator>>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("types", &self.classifier.model().len())
            .field("cached_generators", &self.generators.read().len())
            .finish()
    }
}

impl Resolver {
    pub fn new(model: Arc<TypeModel>) -> Self {
        let primitives = PrimitiveKind::ALL
            .into_iter()
            .map(|kind| (kind, Arc::new(PrimitiveGenerator::new(kind)) as Arc<dyn Generator>))
            .collect();
        Self {
            classifier: TypeClassifier::new(model),
            categories: RwLock::new(HashMap::new()),
            generators: RwLock::new(HashMap::new()),
            primitives,
        }
    }

    pub fn model(&self) -> &TypeModel {
        self.classifier.model()
    }

    pub fn shared_model(&self) -> Arc<TypeModel> {
        Arc::clone(self.classifier.model())
    }

    pub fn classifier(&self) -> &TypeClassifier {
        &self.classifier
    }

    /// Memoized classification.
    pub fn classify(&self, ty: &TypeExpr) -> TypeCategory {
        let key = ty.unwrap_ref();
        if let Some(category) = self.categories.read().get(key) {
            return category.clone();
        }
        let category = self.classifier.classify(key);
        self.categories
            .write()
            .entry(key.clone())
            .or_insert(category)
            .clone()
    }

    /// Memoized strategy for `ty`. Never fails: unknown types get the composite
    /// strategy, which yields null when nothing can be constructed.
    pub fn resolve(&self, ty: &TypeExpr) -> Arc<dyn Generator> {
        let key = ty.unwrap_ref();
        if let Some(generator) = self.generators.read().get(key) {
            return Arc::clone(generator);
        }

        let category = self.classify(key);
        let generator = self.build(&category, key);
        debug!(ty = %key, category = category.name(), strategy = generator.name(), "resolved generator");

        Arc::clone(
            self.generators
                .write()
                .entry(key.clone())
                .or_insert(generator),
        )
    }

    /// Number of memoized strategies.
    pub fn cached_generators(&self) -> usize {
        self.generators.read().len()
    }

    fn build(&self, category: &TypeCategory, ty: &TypeExpr) -> Arc<dyn Generator> {
        match category {
            TypeCategory::Array { element } => Arc::new(ArrayGenerator::new(element.clone())),
            TypeCategory::Enum { name } => Arc::new(EnumGenerator::new(name.clone())),
            TypeCategory::Nullable { inner } => Arc::new(NullableGenerator::new(inner.clone())),
            TypeCategory::ReadOnlyDictionary { key, value } => {
                Arc::new(ReadOnlyDictionaryGenerator::new(key.clone(), value.clone()))
            }
            TypeCategory::Dictionary { key, value } => {
                Arc::new(DictionaryGenerator::new(key.clone(), value.clone()))
            }
            TypeCategory::List { element } | TypeCategory::Collection { element } => {
                Arc::new(ListGenerator::new(element.clone()))
            }
            TypeCategory::Set { element } => Arc::new(SetGenerator::new(element.clone())),
            TypeCategory::Enumerable { element } => {
                Arc::new(EnumerableGenerator::new(element.clone()))
            }
            TypeCategory::Primitive { kind } => match self.primitives.get(kind) {
                Some(generator) => Arc::clone(generator),
                None => Arc::new(PrimitiveGenerator::new(*kind)),
            },
            TypeCategory::Composite { .. } => Arc::new(CompositeGenerator::new(ty.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autobuilder_types::TypeDef;

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(
            TypeModel::new()
                .with_type(TypeDef::record("Team"))
                .with_type(TypeDef::enumeration("Color", ["Red", "Green"])),
        ))
    }

    fn ty(text: &str) -> TypeExpr {
        text.parse().unwrap()
    }

    #[test]
    fn test_strategy_per_category() {
        let r = resolver();
        let cases = [
            ("int", "int"),
            ("string", "string"),
            ("Team[]", "array"),
            ("Color", "enum"),
            ("int?", "nullable"),
            ("HashMap<string, int>", "dictionary"),
            ("FrozenMap<string, int>", "read_only_dictionary"),
            ("List<int>", "list"),
            ("Collection<int>", "list"),
            ("HashSet<int>", "set"),
            ("Iterable<int>", "enumerable"),
            ("Team", "composite"),
            ("Unregistered", "composite"),
        ];
        for (text, expected) in cases {
            assert_eq!(r.resolve(&ty(text)).name(), expected, "strategy for {}", text);
        }
    }

    #[test]
    fn test_resolution_is_memoized() {
        let r = resolver();
        let first = r.resolve(&ty("HashMap<string, Team>"));
        let second = r.resolve(&ty("&HashMap<string, Team>"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(r.cached_generators(), 1);
        assert_eq!(r.classify(&ty("Team")), r.classify(&ty("Team")));
    }

    #[test]
    fn test_primitive_table_is_shared() {
        let r = resolver();
        let a = r.resolve(&ty("int"));
        let b = r.resolve(&ty("&int"));
        assert!(Arc::ptr_eq(&a, &b));
    }
}
