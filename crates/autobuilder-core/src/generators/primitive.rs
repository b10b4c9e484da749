use super::Generator;
use crate::context::GenerateContext;
use crate::error::GenerateResult;
use autobuilder_types::{PrimitiveKind, Value};

/// Fixed strategy for one primitive kind.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveGenerator {
    kind: PrimitiveKind,
}

impl PrimitiveGenerator {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }
}

impl Generator for PrimitiveGenerator {
    fn name(&self) -> &'static str {
        self.kind.keyword()
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let random = ctx.random();
        let config = ctx.config();
        Ok(match self.kind {
            PrimitiveKind::Bool => Value::Bool(random.bool()),
            PrimitiveKind::Int => Value::Int(random.number(i32::MIN, i32::MAX)?),
            PrimitiveKind::Float => Value::Float(random.float_between(0.0, 1.0)?),
            PrimitiveKind::Double => Value::Double(random.double()),
            PrimitiveKind::Decimal => Value::Decimal(random.decimal_between(0.0, 1.0)?),
            PrimitiveKind::DateTime => {
                Value::DateTime(random.date(config.date_window_days, config.reference_time)?)
            }
            PrimitiveKind::Guid => Value::Guid(random.uuid()),
            PrimitiveKind::String => {
                Value::Text(random.string_from_pool(config.string_length, &config.string_pool)?)
            }
        })
    }
}
