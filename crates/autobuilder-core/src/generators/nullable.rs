use super::Generator;
use crate::context::GenerateContext;
use crate::error::GenerateResult;
use autobuilder_types::{TypeExpr, Value};

/// `T?` over a value type: always a present value of `T`.
#[derive(Debug, Clone)]
pub struct NullableGenerator {
    inner: TypeExpr,
}

impl NullableGenerator {
    pub fn new(inner: TypeExpr) -> Self {
        Self { inner }
    }
}

impl Generator for NullableGenerator {
    fn name(&self) -> &'static str {
        "nullable"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        ctx.generate(&self.inner)
    }
}
