//! Builtin container families registered by [`TypeModel::new`].
//!
//! | Name          | Kind      | Shape              | `add` |
//! |---------------|-----------|--------------------|-------|
//! | `Iterable<T>` | interface | Enumerable         | no    |
//! | `Collection<T>` | interface | Collection       | yes   |
//! | `List<T>`     | interface | List               | via Collection |
//! | `Set<T>`      | interface | Set                | yes   |
//! | `Map<K, V>`   | interface | Dictionary         | yes   |
//! | `ReadOnlyMap<K, V>` | interface | ReadOnlyDictionary | no |
//! | `Vec<T>`      | class     | List               | yes   |
//! | `HashSet<T>`  | class     | Set                | yes   |
//! | `HashMap<K, V>` | class   | Dictionary + ReadOnlyDictionary | yes |
//! | `FrozenMap<K, V>` | class | Dictionary + ReadOnlyDictionary | no (map constructor only) |
//!
//! [`TypeModel::new`]: crate::model::TypeModel::new

use crate::model::{
    CollectionShape, ConstructorDef, MethodDef, ParamDef, TypeDef, TypeModel,
};
use crate::type_expr::TypeExpr;
use crate::value::{MapValue, Sequence, Value};
use anyhow::{anyhow, bail};

pub const ITERABLE: &str = "Iterable";
pub const COLLECTION: &str = "Collection";
pub const LIST: &str = "List";
pub const SET: &str = "Set";
pub const MAP: &str = "Map";
pub const READ_ONLY_MAP: &str = "ReadOnlyMap";
pub const VEC: &str = "Vec";
pub const HASH_SET: &str = "HashSet";
pub const HASH_MAP: &str = "HashMap";
pub const FROZEN_MAP: &str = "FrozenMap";

fn t0() -> TypeExpr {
    TypeExpr::param(0)
}

fn t1() -> TypeExpr {
    TypeExpr::param(1)
}

fn one_of(name: &str) -> TypeExpr {
    TypeExpr::generic(name, vec![t0()])
}

fn two_of(name: &str) -> TypeExpr {
    TypeExpr::generic(name, vec![t0(), t1()])
}

/// Concrete type substituted when an interface (or failed instantiation) is requested.
pub fn default_concrete(shape: CollectionShape, args: &[TypeExpr]) -> TypeExpr {
    let name = match shape {
        CollectionShape::List | CollectionShape::Collection | CollectionShape::Enumerable => VEC,
        CollectionShape::Set => HASH_SET,
        CollectionShape::Dictionary => HASH_MAP,
        CollectionShape::ReadOnlyDictionary => FROZEN_MAP,
    };
    TypeExpr::generic(name, args.to_vec())
}

fn single(args: Vec<Value>) -> anyhow::Result<Value> {
    let [item]: [Value; 1] = args
        .try_into()
        .map_err(|a: Vec<Value>| anyhow!("expected 1 argument, got {}", a.len()))?;
    Ok(item)
}

fn pair(args: Vec<Value>) -> anyhow::Result<(Value, Value)> {
    let [key, value]: [Value; 2] = args
        .try_into()
        .map_err(|a: Vec<Value>| anyhow!("expected 2 arguments, got {}", a.len()))?;
    Ok((key, value))
}

fn sequence_add() -> MethodDef {
    MethodDef::add(vec![t0()], |target, args| {
        let item = single(args)?;
        match target {
            Value::Sequence(seq) => {
                seq.insert(item);
                Ok(())
            }
            other => bail!("cannot add an element to a {} value", other.kind_name()),
        }
    })
}

fn map_add() -> MethodDef {
    MethodDef::add(vec![t0(), t1()], |target, args| {
        let (key, value) = pair(args)?;
        match target {
            Value::Map(map) if map.read_only => bail!("map is read-only"),
            Value::Map(map) => {
                if !map.try_insert(key, value) {
                    bail!("an item with the same key has already been added");
                }
                Ok(())
            }
            other => bail!("cannot add an entry to a {} value", other.kind_name()),
        }
    })
}

fn sequence_items(source: Value) -> anyhow::Result<Vec<Value>> {
    match source {
        Value::Array(items) => Ok(items),
        Value::Sequence(seq) => Ok(seq.items),
        other => bail!("expected a sequence, got {}", other.kind_name()),
    }
}

fn sequence_class(name: &str, shape_interface: &str, unique: bool) -> TypeDef {
    let empty = ConstructorDef::custom(Vec::new(), move |ty, _| {
        Ok(Value::Sequence(Sequence {
            ty: ty.clone(),
            items: Vec::new(),
            unique,
        }))
    });
    let copy = ConstructorDef::custom(
        vec![ParamDef::new("items", one_of(ITERABLE))],
        move |ty, args| {
            let mut seq = Sequence {
                ty: ty.clone(),
                items: Vec::new(),
                unique,
            };
            for item in sequence_items(single(args)?)? {
                seq.insert(item);
            }
            Ok(Value::Sequence(seq))
        },
    );

    TypeDef::class(name)
        .generic(1)
        .implements(one_of(shape_interface))
        .constructor(empty)
        .constructor(copy)
        .method(sequence_add())
}

fn copy_map(ty: &TypeExpr, args: Vec<Value>, read_only: bool) -> anyhow::Result<Value> {
    match single(args)? {
        Value::Map(source) => Ok(Value::Map(MapValue {
            ty: ty.clone(),
            entries: source.entries,
            read_only,
        })),
        other => bail!("expected a map, got {}", other.kind_name()),
    }
}

pub(crate) fn register_builtins(model: &mut TypeModel) {
    model
        .register(TypeDef::interface(ITERABLE, 1).shaped(CollectionShape::Enumerable))
        .register(
            TypeDef::interface(COLLECTION, 1)
                .shaped(CollectionShape::Collection)
                .implements(one_of(ITERABLE))
                .method(sequence_add()),
        )
        .register(
            TypeDef::interface(LIST, 1)
                .shaped(CollectionShape::List)
                .implements(one_of(COLLECTION)),
        )
        .register(
            TypeDef::interface(SET, 1)
                .shaped(CollectionShape::Set)
                .implements(one_of(COLLECTION))
                .method(sequence_add()),
        )
        .register(
            TypeDef::interface(MAP, 2)
                .shaped(CollectionShape::Dictionary)
                .method(map_add()),
        )
        .register(TypeDef::interface(READ_ONLY_MAP, 2).shaped(CollectionShape::ReadOnlyDictionary))
        .register(sequence_class(VEC, LIST, false))
        .register(sequence_class(HASH_SET, SET, true))
        .register(
            TypeDef::class(HASH_MAP)
                .generic(2)
                .implements(two_of(MAP))
                .implements(two_of(READ_ONLY_MAP))
                .constructor(ConstructorDef::custom(Vec::new(), |ty, _| {
                    Ok(Value::Map(MapValue::new(ty.clone())))
                }))
                .constructor(ConstructorDef::custom(
                    vec![ParamDef::new("entries", two_of(MAP))],
                    |ty, args| copy_map(ty, args, false),
                ))
                .method(map_add()),
        )
        .register(
            TypeDef::class(FROZEN_MAP)
                .generic(2)
                .implements(two_of(MAP))
                .implements(two_of(READ_ONLY_MAP))
                .constructor(ConstructorDef::custom(
                    vec![ParamDef::new("entries", two_of(MAP))],
                    |ty, args| copy_map(ty, args, true),
                )),
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn construct(model: &TypeModel, ty: &TypeExpr, arity: usize, args: Vec<Value>) -> Value {
        let def = model.get_type(ty).unwrap();
        let ctor = def.constructors.iter().find(|c| c.arity() == arity).unwrap();
        (ctor.body.as_ref().unwrap())(ty, args).unwrap()
    }

    #[test]
    fn test_vec_add_appends() {
        let model = TypeModel::new();
        let ty = TypeExpr::generic(VEC, vec![TypeExpr::int()]);
        let mut list = construct(&model, &ty, 0, vec![]);
        let add = &model.get(VEC).unwrap().methods[0];
        (add.body)(&mut list, vec![Value::Int(3)]).unwrap();
        (add.body)(&mut list, vec![Value::Int(3)]).unwrap();
        assert_eq!(list.len(), Some(2));
    }

    #[test]
    fn test_hash_map_add_rejects_duplicate_key() {
        let model = TypeModel::new();
        let ty = TypeExpr::generic(HASH_MAP, vec![TypeExpr::string(), TypeExpr::int()]);
        let mut map = construct(&model, &ty, 0, vec![]);
        let add = &model.get(HASH_MAP).unwrap().methods[0];
        (add.body)(&mut map, vec![Value::Text("k".into()), Value::Int(1)]).unwrap();
        let err = (add.body)(&mut map, vec![Value::Text("k".into()), Value::Int(2)]).unwrap_err();
        assert!(err.to_string().contains("same key"));
    }

    #[test]
    fn test_frozen_map_wraps_backing_map() {
        let model = TypeModel::new();
        let args = vec![TypeExpr::string(), TypeExpr::int()];
        let mut backing = MapValue::new(TypeExpr::generic(HASH_MAP, args.clone()));
        backing.try_insert(Value::Text("a".into()), Value::Int(1));

        let ty = TypeExpr::generic(FROZEN_MAP, args);
        let frozen = construct(&model, &ty, 1, vec![Value::Map(backing)]);
        let map = frozen.as_map().unwrap();
        assert!(map.read_only);
        assert_eq!(map.len(), 1);
        assert!(!model.get(FROZEN_MAP).unwrap().has_method("add"));
    }

    #[test]
    fn test_default_concrete() {
        let e = vec![TypeExpr::int()];
        assert_eq!(default_concrete(CollectionShape::List, &e).name(), Some(VEC));
        assert_eq!(default_concrete(CollectionShape::Set, &e).name(), Some(HASH_SET));
        assert_eq!(
            default_concrete(CollectionShape::ReadOnlyDictionary, &e).name(),
            Some(FROZEN_MAP)
        );
    }
}
