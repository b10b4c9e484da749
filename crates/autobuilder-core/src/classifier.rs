//! Structural classification of types.
//!
//! Every type maps to exactly one [`TypeCategory`]. Collection shapes are
//! collected from the type itself (when it is one of the shape interfaces) and
//! from every interface it implements, transitively, with generic arguments
//! substituted. When several shapes apply the precedence is
//! Dictionary > ReadOnlyDictionary > List > Set > Collection > Enumerable.

use autobuilder_types::builtins;
use autobuilder_types::{
    AddFn, CollectionShape, PrimitiveKind, TypeDef, TypeExpr, TypeKind, TypeModel, ADD_METHOD,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Structural category of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum TypeCategory {
    Primitive { kind: PrimitiveKind },
    Array { element: TypeExpr },
    Enum { name: String },
    /// Nullable wrapper over a value type.
    Nullable { inner: TypeExpr },
    Dictionary { key: TypeExpr, value: TypeExpr },
    ReadOnlyDictionary { key: TypeExpr, value: TypeExpr },
    List { element: TypeExpr },
    Set { element: TypeExpr },
    Collection { element: TypeExpr },
    /// Only the bare enumerable interface itself.
    Enumerable { element: TypeExpr },
    /// Anything else: built by the composite binder.
    Composite { ty: TypeExpr },
}

impl TypeCategory {
    pub fn name(&self) -> &'static str {
        match self {
            TypeCategory::Primitive { .. } => "primitive",
            TypeCategory::Array { .. } => "array",
            TypeCategory::Enum { .. } => "enum",
            TypeCategory::Nullable { .. } => "nullable",
            TypeCategory::Dictionary { .. } => "dictionary",
            TypeCategory::ReadOnlyDictionary { .. } => "read_only_dictionary",
            TypeCategory::List { .. } => "list",
            TypeCategory::Set { .. } => "set",
            TypeCategory::Collection { .. } => "collection",
            TypeCategory::Enumerable { .. } => "enumerable",
            TypeCategory::Composite { .. } => "composite",
        }
    }
}

/// A collection shape exposed by a type, with its closed type arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatch {
    pub shape: CollectionShape,
    pub args: Vec<TypeExpr>,
}

/// Classifies types against a [`TypeModel`].
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    model: Arc<TypeModel>,
}

impl TypeClassifier {
    pub fn new(model: Arc<TypeModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<TypeModel> {
        &self.model
    }

    pub fn classify(&self, ty: &TypeExpr) -> TypeCategory {
        let ty = ty.unwrap_ref();
        match ty {
            TypeExpr::Array { element } => {
                return TypeCategory::Array {
                    element: element.as_ref().clone(),
                }
            }
            TypeExpr::Nullable { inner } => {
                // Nullable of a reference type is just the reference type.
                if self.model.is_value_type(inner) {
                    return TypeCategory::Nullable {
                        inner: inner.as_ref().clone(),
                    };
                }
                return self.classify(inner);
            }
            TypeExpr::Primitive { primitive } => {
                return TypeCategory::Primitive { kind: *primitive }
            }
            TypeExpr::Named { .. } => {}
            TypeExpr::Param { .. } | TypeExpr::ByRef { .. } => {
                return TypeCategory::Composite { ty: ty.clone() }
            }
        }

        let Some(def) = self.model.get_type(ty) else {
            return TypeCategory::Composite { ty: ty.clone() };
        };
        if let TypeKind::Enum(_) = def.kind {
            return TypeCategory::Enum {
                name: def.name.clone(),
            };
        }

        self.collection_category(ty, def)
            .unwrap_or_else(|| TypeCategory::Composite { ty: ty.clone() })
    }

    fn collection_category(&self, ty: &TypeExpr, def: &TypeDef) -> Option<TypeCategory> {
        let shapes = self.collection_shapes(ty);
        let find = |shape: CollectionShape| shapes.iter().find(|m| m.shape == shape);
        let key_value = |m: &ShapeMatch| Some((m.args.first()?.clone(), m.args.get(1)?.clone()));
        let element = |m: &ShapeMatch| m.args.first().cloned();

        let dictionary = find(CollectionShape::Dictionary);
        let read_only = find(CollectionShape::ReadOnlyDictionary);
        // A read-only shape only counts when the type really has no `add`.
        let has_add = def.has_method(ADD_METHOD);
        match (dictionary, read_only) {
            (_, Some(ro)) if !has_add => {
                if let Some((key, value)) = key_value(ro) {
                    return Some(TypeCategory::ReadOnlyDictionary { key, value });
                }
            }
            (Some(m), _) | (None, Some(m)) => {
                if let Some((key, value)) = key_value(m) {
                    return Some(TypeCategory::Dictionary { key, value });
                }
            }
            (None, None) => {}
        }

        if let Some(element) = find(CollectionShape::List).and_then(element) {
            return Some(TypeCategory::List { element });
        }
        if let Some(element) = find(CollectionShape::Set).and_then(element) {
            return Some(TypeCategory::Set { element });
        }
        if let Some(element) = find(CollectionShape::Collection).and_then(element) {
            return Some(TypeCategory::Collection { element });
        }
        if def.shape == Some(CollectionShape::Enumerable) {
            if let Some(element) = ty.args().first() {
                return Some(TypeCategory::Enumerable {
                    element: element.clone(),
                });
            }
        }
        None
    }

    /// All collection shapes the type exposes, in discovery order.
    pub fn collection_shapes(&self, ty: &TypeExpr) -> Vec<ShapeMatch> {
        let mut found = Vec::new();
        let mut visited = HashSet::new();
        self.walk_shapes(ty.unwrap_ref(), &mut found, &mut visited);
        found
    }

    fn walk_shapes(
        &self,
        ty: &TypeExpr,
        found: &mut Vec<ShapeMatch>,
        visited: &mut HashSet<TypeExpr>,
    ) {
        if !visited.insert(ty.clone()) {
            return;
        }
        let Some(def) = self.model.get_type(ty) else {
            return;
        };
        if let Some(shape) = def.shape {
            found.push(ShapeMatch {
                shape,
                args: ty.args().to_vec(),
            });
        }
        for interface in &def.interfaces {
            self.walk_shapes(&interface.substitute(ty.args()), found, visited);
        }
    }

    pub fn exposes(&self, ty: &TypeExpr, shape: CollectionShape) -> bool {
        self.collection_shapes(ty).iter().any(|m| m.shape == shape)
    }

    /// Read-only members of dictionary-like types are populated through `add`.
    pub fn is_dictionary_like(&self, ty: &TypeExpr) -> bool {
        self.exposes(ty, CollectionShape::Dictionary)
    }

    /// Read-only members of collection-like types are populated through `add`.
    pub fn is_collection_like(&self, ty: &TypeExpr) -> bool {
        self.collection_shapes(ty).iter().any(|m| {
            matches!(
                m.shape,
                CollectionShape::Collection | CollectionShape::List | CollectionShape::Set
            )
        })
    }

    /// Argument types of the `add` entry point for a container type: its generic
    /// arguments, or for a non-generic container the arguments of its shape.
    pub fn accumulation_arg_types(&self, ty: &TypeExpr) -> Vec<TypeExpr> {
        let ty = ty.unwrap_ref();
        if !ty.args().is_empty() {
            return ty.args().to_vec();
        }
        let shapes = self.collection_shapes(ty);
        let dictionary = shapes.iter().find(|m| m.shape == CollectionShape::Dictionary);
        dictionary
            .or_else(|| shapes.iter().find(|m| m.shape == CollectionShape::Collection))
            .map(|m| m.args.clone())
            .unwrap_or_default()
    }

    /// Find the `add` method whose parameters equal `arg_types`: on the type
    /// itself first, then on implemented interfaces, recursively.
    pub fn find_add_method(&self, ty: &TypeExpr, arg_types: &[TypeExpr]) -> Option<AddFn> {
        let mut visited = HashSet::new();
        self.find_add_in(ty.unwrap_ref(), arg_types, &mut visited)
    }

    fn find_add_in(
        &self,
        ty: &TypeExpr,
        arg_types: &[TypeExpr],
        visited: &mut HashSet<TypeExpr>,
    ) -> Option<AddFn> {
        if !visited.insert(ty.clone()) {
            return None;
        }
        let def = self.model.get_type(ty)?;
        let args = ty.args();
        let own = def.methods.iter().find(|m| {
            m.name == ADD_METHOD
                && m.params.len() == arg_types.len()
                && m.params
                    .iter()
                    .zip(arg_types)
                    .all(|(param, arg)| &param.substitute(args) == arg)
        });
        if let Some(method) = own {
            return Some(method.body.clone());
        }
        def.interfaces
            .iter()
            .find_map(|interface| self.find_add_in(&interface.substitute(args), arg_types, visited))
    }

    /// Concrete type to use when `ty` is an interface or cannot be instantiated.
    pub fn default_concrete(&self, ty: &TypeExpr) -> Option<TypeExpr> {
        let (shape, args) = match self.classify(ty) {
            TypeCategory::List { element } => (CollectionShape::List, vec![element]),
            TypeCategory::Collection { element } => (CollectionShape::Collection, vec![element]),
            TypeCategory::Enumerable { element } => (CollectionShape::Enumerable, vec![element]),
            TypeCategory::Set { element } => (CollectionShape::Set, vec![element]),
            TypeCategory::Dictionary { key, value } => (CollectionShape::Dictionary, vec![key, value]),
            TypeCategory::ReadOnlyDictionary { key, value } => {
                (CollectionShape::ReadOnlyDictionary, vec![key, value])
            }
            _ => return None,
        };
        Some(builtins::default_concrete(shape, &args))
    }
}
