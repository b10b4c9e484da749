use super::Generator;
use crate::context::GenerateContext;
use crate::error::GenerateResult;
use autobuilder_types::{TypeExpr, Value};

/// Everything that is not a primitive, enum or container: construct, then populate.
#[derive(Debug, Clone)]
pub struct CompositeGenerator {
    ty: TypeExpr,
}

impl CompositeGenerator {
    pub fn new(ty: TypeExpr) -> Self {
        Self { ty }
    }
}

impl Generator for CompositeGenerator {
    fn name(&self) -> &'static str {
        "composite"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let binder = ctx.binder();
        let mut instance = binder.construct(&self.ty, ctx)?;
        if instance.is_null() {
            return Ok(instance);
        }
        binder.populate(&mut instance, &self.ty, ctx, None)?;
        Ok(instance)
    }
}
