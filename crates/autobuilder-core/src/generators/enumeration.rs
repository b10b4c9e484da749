use super::Generator;
use crate::context::GenerateContext;
use crate::error::{GenerateError, GenerateResult};
use autobuilder_types::{EnumValue, Value};

/// Uniform choice among the declared variants minus the configured exclusions.
#[derive(Debug, Clone)]
pub struct EnumGenerator {
    type_name: String,
}

impl EnumGenerator {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

impl Generator for EnumGenerator {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn generate(&self, ctx: &mut GenerateContext<'_>) -> GenerateResult<Value> {
        let variants = ctx
            .model()
            .get(&self.type_name)
            .and_then(|def| def.variants())
            .ok_or_else(|| GenerateError::EnumExhausted {
                type_name: self.type_name.clone(),
            })?;
        let exclude = ctx.config().excluded_variants(&self.type_name);
        let variant = ctx.random().enum_value(&self.type_name, variants, exclude)?;
        Ok(Value::Enum(EnumValue {
            type_name: self.type_name.clone(),
            variant,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::context::ExclusionPaths;
    use crate::resolver::Resolver;
    use autobuilder_types::{TypeDef, TypeExpr, TypeModel};
    use std::sync::Arc;

    fn resolver() -> Resolver {
        Resolver::new(Arc::new(TypeModel::new().with_type(TypeDef::enumeration(
            "Status",
            ["Active", "Suspended", "Closed"],
        ))))
    }

    #[test]
    fn test_excluded_variants_never_chosen() {
        let resolver = resolver();
        let config = GeneratorConfig::default()
            .with_seed(4)
            .exclude_enum_value("Status", "Closed");
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());
        for _ in 0..50 {
            let value = ctx.generate(&TypeExpr::named("Status")).unwrap();
            let Value::Enum(e) = value else {
                panic!("expected an enum value");
            };
            assert_ne!(e.variant, "Closed");
            assert_eq!(e.type_name, "Status");
        }
    }

    #[test]
    fn test_every_variant_excluded() {
        let resolver = resolver();
        let config = GeneratorConfig::default()
            .with_seed(4)
            .exclude_enum_value("Status", "Active")
            .exclude_enum_value("Status", "Suspended")
            .exclude_enum_value("Status", "Closed");
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());
        let err = ctx.generate(&TypeExpr::named("Status")).unwrap_err();
        assert!(matches!(err, GenerateError::EnumExhausted { ref type_name } if type_name == "Status"));
    }
}
