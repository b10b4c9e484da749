//! Composite construction and member population.
//!
//! [`Binder::construct`] picks a constructor, generates its arguments and
//! invokes it. [`Binder::populate`] then fills in every eligible member that is
//! not excluded. Construction always completes before population starts, and
//! a type with no usable constructor yields `Value::Null` rather than an error.

use crate::classifier::TypeClassifier;
use crate::context::GenerateContext;
use crate::error::{GenerateError, GenerateResult};
use anyhow::anyhow;
use autobuilder_types::{
    CollectionShape, ConstructorDef, Initializer, MemberDef, Object, TypeDef, TypeExpr, TypeModel,
    Value, Visibility,
};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct Binder;

impl Binder {
    /// Construct an instance of `ty` from generated constructor arguments.
    ///
    /// Returns `Value::Null` when the type is not registered or has no constructor.
    pub fn construct(&self, ty: &TypeExpr, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let ty = ty.unwrap_ref();
        let model = ctx.model();
        let Some(def) = model.get_type(ty) else {
            warn!(ty = %ty, "type is not registered, cannot construct");
            return Ok(Value::Null);
        };
        let Some(ctor) = self.select_constructor(def, ty, ctx.classifier(), model) else {
            warn!(ty = %ty, "no usable constructor");
            return Ok(Value::Null);
        };
        trace!(ty = %ty, arity = ctor.arity(), "selected constructor");

        let mut args = Vec::with_capacity(ctor.arity());
        for param in &ctor.params {
            args.push(ctx.generate(&param.ty.substitute(ty.args()))?);
        }
        self.invoke(def, ctor, ty, args, ctx)
    }

    /// Constructor choice: for dictionary-like (or enumerable) types a single
    /// argument constructor taking the matching generic interface, then the
    /// zero-argument constructor, then the first declared one.
    pub fn select_constructor<'d>(
        &self,
        def: &'d TypeDef,
        ty: &TypeExpr,
        classifier: &TypeClassifier,
        model: &TypeModel,
    ) -> Option<&'d ConstructorDef> {
        let typed_shape = if classifier.is_dictionary_like(ty) {
            Some(CollectionShape::Dictionary)
        } else if classifier.exposes(ty, CollectionShape::Enumerable) {
            Some(CollectionShape::Enumerable)
        } else {
            None
        };

        if let Some(shape) = typed_shape {
            let typed = def.constructors.iter().find(|c| {
                c.arity() == 1
                    && model
                        .get_type(&c.params[0].ty)
                        .is_some_and(|param_def| param_def.shape == Some(shape))
            });
            if typed.is_some() {
                return typed;
            }
        }

        def.default_constructor().or_else(|| def.constructors.first())
    }

    /// Run `ctor` with already generated arguments. Constructors without a
    /// body build a record from their parameters.
    pub fn invoke(
        &self,
        def: &TypeDef,
        ctor: &ConstructorDef,
        ty: &TypeExpr,
        args: Vec<Value>,
        ctx: &GenerateContext<'_>,
    ) -> GenerateResult<Value> {
        match &ctor.body {
            Some(body) => body(ty, args).map_err(|e| GenerateError::construction(ty.to_string(), e)),
            None => Ok(self.build_record(def, ctor, ty, args, ctx)),
        }
    }

    /// Record construction: members start at their initializer value, then each
    /// argument is assigned to the member whose name matches its parameter.
    fn build_record(
        &self,
        def: &TypeDef,
        ctor: &ConstructorDef,
        ty: &TypeExpr,
        args: Vec<Value>,
        ctx: &GenerateContext<'_>,
    ) -> Value {
        let mut object = Object::new(ty.clone());
        for member in &def.members {
            let member_ty = member.ty.substitute(ty.args());
            let initial = match member.init {
                Initializer::Zero => ctx.model().zero_value(&member_ty),
                Initializer::NewInstance => self.create_empty(&member_ty, ctx),
            };
            object.set(member.name.clone(), initial);
        }
        for (param, arg) in ctor.params.iter().zip(args) {
            if let Some(member) = def
                .members
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(&param.name))
            {
                object.set(member.name.clone(), arg);
            }
        }
        Value::Object(object)
    }

    /// Empty instance through the zero-argument constructor. Interfaces and
    /// failed instantiations fall back to the default concrete container;
    /// anything else is `Value::Null`.
    pub fn create_empty(&self, ty: &TypeExpr, ctx: &GenerateContext<'_>) -> Value {
        let ty = ty.unwrap_ref();
        if let Some(def) = ctx.model().get_type(ty) {
            if let Some(ctor) = def.default_constructor() {
                match self.invoke(def, ctor, ty, Vec::new(), ctx) {
                    Ok(value) => return value,
                    Err(e) => debug!(ty = %ty, error = %e, "zero-argument construction failed"),
                }
            }
        }
        match ctx.classifier().default_concrete(ty) {
            Some(concrete) if &concrete != ty => {
                debug!(ty = %ty, concrete = %concrete, "substituting default container");
                self.create_empty(&concrete, ctx)
            }
            _ => Value::Null,
        }
    }

    /// Populate the members of a constructed instance.
    ///
    /// With `members`, exactly those members are populated; otherwise every
    /// writable member plus read-only dictionary/collection members. Excluded
    /// paths are skipped. Errors while assigning are wrapped with the member path.
    pub fn populate(
        &self,
        instance: &mut Value,
        ty: &TypeExpr,
        ctx: &mut GenerateContext<'_>,
        members: Option<&[String]>,
    ) -> GenerateResult<()> {
        let ty = ty.unwrap_ref();
        let Some(def) = ctx.model().get_type(ty) else {
            return Ok(());
        };
        let Value::Object(object) = instance else {
            return Ok(());
        };

        for member in self.members_to_populate(def, ty, ctx.classifier(), members) {
            if ctx.skip_members().contains(&def.name, &member.name) {
                debug!(ty = %def.name, member = %member.name, "skipping excluded member");
                continue;
            }
            let path = format!("{}.{}", def.name, member.name);
            let member_ty = member.ty.substitute(ty.args());
            trace!(member = %path, ty = %member_ty, "populating member");

            let value = ctx.generate(&member_ty)?;
            self.assign(object, member, &member_ty, value, ctx.classifier())
                .map_err(|e| GenerateError::population(path, e))?;
        }
        Ok(())
    }

    /// Members eligible for population, deduplicated by name (first wins).
    pub fn members_to_populate<'d>(
        &self,
        def: &'d TypeDef,
        ty: &TypeExpr,
        classifier: &TypeClassifier,
        members: Option<&[String]>,
    ) -> Vec<&'d MemberDef> {
        if let Some(names) = members {
            return names
                .iter()
                .filter_map(|name| def.members.iter().find(|m| &m.name == name))
                .collect();
        }

        let mut seen = HashSet::new();
        let mut eligible = Vec::new();
        for member in def.members.iter().filter(|m| m.is_writable()) {
            if seen.insert(member.name.as_str()) {
                eligible.push(member);
            }
        }
        for member in def
            .members
            .iter()
            .filter(|m| !m.is_writable() && m.visibility == Visibility::Public)
        {
            let member_ty = member.ty.substitute(ty.args());
            let accumulates =
                classifier.is_dictionary_like(&member_ty) || classifier.is_collection_like(&member_ty);
            if accumulates && seen.insert(member.name.as_str()) {
                eligible.push(member);
            }
        }
        eligible
    }

    fn assign(
        &self,
        object: &mut Object,
        member: &MemberDef,
        member_ty: &TypeExpr,
        value: Value,
        classifier: &TypeClassifier,
    ) -> anyhow::Result<()> {
        if member.is_writable() {
            return match &member.setter {
                Some(setter) => setter(object, value),
                None => {
                    object.set(member.name.clone(), value);
                    Ok(())
                }
            };
        }

        // Read-only container: accumulate into the existing instance through `add`.
        let Some(target) = object.get_mut(&member.name) else {
            return Ok(());
        };
        if target.is_null() {
            return Ok(());
        }
        let arg_types = classifier.accumulation_arg_types(member_ty);
        let Some(add) = classifier.find_add_method(member_ty, &arg_types) else {
            debug!(member = %member.name, ty = %member_ty, "no add method, leaving member unpopulated");
            return Ok(());
        };

        if classifier.is_dictionary_like(member_ty) {
            if let Value::Map(map) = value {
                for (key, item) in map.entries {
                    add(&mut *target, vec![key, item])?;
                }
            }
        } else if classifier.is_collection_like(member_ty) {
            let items = match value {
                Value::Sequence(seq) => seq.items,
                Value::Array(items) => items,
                _ => return Ok(()),
            };
            for item in items {
                add(&mut *target, vec![item])?;
            }
        } else {
            return Err(anyhow!(
                "member '{}' is read-only and not a container",
                member.name
            ));
        }
        Ok(())
    }
}
