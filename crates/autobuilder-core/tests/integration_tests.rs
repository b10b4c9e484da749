//! Integration tests for end-to-end generation
//!
//! Test coverage areas:
//! - Full pipeline: classifier -> resolver -> binder -> generators
//! - Read-only container accumulation
//! - Error propagation out of nested population
//! - Configuration driving generation (counts, exclusions, seeds)

use std::sync::Arc;

use autobuilder_core::{
    ExclusionPaths, GenerateContext, GenerateError, GenerateResult, GeneratorConfig, Resolver,
};
use autobuilder_types::{
    ConstructorDef, MemberDef, ParamDef, TypeDef, TypeExpr, TypeModel, Value,
};

fn ty(text: &str) -> TypeExpr {
    text.parse().expect("type expression should parse")
}

fn library_model() -> TypeModel {
    TypeModel::new()
        .with_type(TypeDef::enumeration("Genre", ["Fiction", "History", "Poetry"]))
        .with_type(
            TypeDef::record("Book")
                .property("Title", TypeExpr::string())
                .property("Genre", ty("Genre"))
                .property("Pages", TypeExpr::int())
                .property("Rating", ty("double?")),
        )
        .with_type(
            TypeDef::record("Shelf")
                .property("Label", TypeExpr::string())
                .member(MemberDef::read_only("Books", ty("List<Book>")))
                .member(MemberDef::read_only("Index", ty("HashMap<string, Book>"))),
        )
        .with_type(
            TypeDef::class("Library")
                .property("Shelves", ty("Shelf[]"))
                .property("Catalog", ty("ReadOnlyMap<string, int>"))
                .constructor(ConstructorDef::with_params(vec![ParamDef::new(
                    "name",
                    TypeExpr::string(),
                )]))
                .property("Name", TypeExpr::string()),
        )
}

fn generate_with(
    model: TypeModel,
    config: &GeneratorConfig,
    skip: &[&str],
    target: &str,
) -> GenerateResult<Value> {
    let resolver = Resolver::new(Arc::new(model));
    let mut ctx = GenerateContext::new(&resolver, config, skip.iter().copied().collect());
    ctx.generate(&ty(target))
}

// =============================================================================
// End-to-End Pipeline Tests
// =============================================================================

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_nested_graph_is_fully_populated() {
        let config = GeneratorConfig::default().with_seed(42).with_collection_count(2);
        let library = generate_with(library_model(), &config, &[], "Library")
            .expect("library should generate");

        assert_eq!(library.field("Name").and_then(Value::as_str).map(str::len), Some(10));

        let Some(Value::Array(shelves)) = library.field("Shelves") else {
            panic!("Shelves should be an array");
        };
        assert_eq!(shelves.len(), 2);
        for shelf in shelves {
            let books = shelf.field("Books").and_then(Value::as_sequence).unwrap();
            assert_eq!(books.len(), 2);
            for book in &books.items {
                assert!(matches!(book.field("Genre"), Some(Value::Enum(_))));
                assert!(matches!(book.field("Rating"), Some(Value::Double(_))));
            }
            let index = shelf.field("Index").and_then(Value::as_map).unwrap();
            assert!(index.len() <= 2);
        }

        let catalog = library.field("Catalog").and_then(Value::as_map).unwrap();
        assert!(catalog.read_only);
    }

    #[test]
    fn test_same_seed_same_graph() {
        let config = GeneratorConfig::default().with_seed(1234).with_collection_count(3);
        let first = generate_with(library_model(), &config, &[], "Library").unwrap();
        let second = generate_with(library_model(), &config, &[], "Library").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_writable_members_are_rarely_left_at_default() {
        let model = library_model();
        let book = model.get("Book").expect("Book should be registered");
        let defaults: Vec<(String, Value)> = book
            .members
            .iter()
            .map(|m| (m.name.clone(), model.zero_value(&m.ty)))
            .collect();

        let runs = 50;
        let mut changed = vec![0usize; defaults.len()];
        for seed in 0..runs {
            let config = GeneratorConfig::default().with_seed(seed);
            let value = generate_with(library_model(), &config, &[], "Book").unwrap();
            for (slot, (name, default)) in changed.iter_mut().zip(&defaults) {
                if value.field(name) != Some(default) {
                    *slot += 1;
                }
            }
        }

        for ((name, _), count) in defaults.iter().zip(&changed) {
            // Genre's default is its first variant, one of three possible picks.
            let threshold = if name == "Genre" { 20 } else { 45 };
            assert!(
                *count >= threshold,
                "{} was non-default in only {} of {} runs",
                name,
                count,
                runs
            );
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = GeneratorConfig::default().with_seed(1);
        let b = GeneratorConfig::default().with_seed(2);
        let first = generate_with(library_model(), &a, &[], "Book").unwrap();
        let second = generate_with(library_model(), &b, &[], "Book").unwrap();
        assert_ne!(first, second);
    }
}

// =============================================================================
// Exclusion Path Tests
// =============================================================================

mod exclusion_tests {
    use super::*;

    #[test]
    fn test_excluded_paths_apply_at_every_depth() {
        let config = GeneratorConfig::default().with_seed(5).with_collection_count(2);
        let library = generate_with(
            library_model(),
            &config,
            &["Book.Title", "Shelf.Index"],
            "Library",
        )
        .unwrap();

        let Some(Value::Array(shelves)) = library.field("Shelves") else {
            panic!("Shelves should be an array");
        };
        for shelf in shelves {
            assert_eq!(shelf.field("Index").and_then(Value::len), Some(0));
            for book in &shelf.field("Books").and_then(Value::as_sequence).unwrap().items {
                assert_eq!(book.field("Title"), Some(&Value::Null));
                assert!(book.field("Pages").and_then(Value::as_i32).is_some());
            }
        }
    }

    #[test]
    fn test_exclusion_is_by_declaring_type() {
        let config = GeneratorConfig::default().with_seed(5);
        // "Library.Title" names no member; Book titles are still generated.
        let book = generate_with(library_model(), &config, &["Library.Title"], "Book").unwrap();
        assert!(book.field("Title").and_then(Value::as_str).is_some());
    }
}

// =============================================================================
// Failure Propagation Tests
// =============================================================================

mod failure_tests {
    use super::*;

    #[test]
    fn test_enum_exhaustion_surfaces_from_nested_member() {
        let config = GeneratorConfig::default()
            .with_seed(9)
            .exclude_enum_value("Genre", "Fiction")
            .exclude_enum_value("Genre", "History")
            .exclude_enum_value("Genre", "Poetry");
        let err = generate_with(library_model(), &config, &[], "Shelf").unwrap_err();
        assert!(matches!(err, GenerateError::EnumExhausted { .. }));
    }

    #[test]
    fn test_setter_failure_is_wrapped_once_with_path() {
        let model = library_model().with_type(
            TypeDef::record("Audit").member(
                MemberDef::property("Book", ty("Book"))
                    .with_setter(|_, _| Err(anyhow::anyhow!("audit log is sealed"))),
            ),
        );
        let config = GeneratorConfig::default().with_seed(3);
        let err = generate_with(model, &config, &[], "Audit").unwrap_err();
        assert_eq!(err.member_path(), Some("Audit.Book"));
        assert!(err.to_string().contains("audit log is sealed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_date_window_past_calendar_range_is_argument_error() {
        let model = TypeModel::new().with_type(
            TypeDef::record("Event").property("At", ty("datetime")),
        );
        let config = GeneratorConfig {
            date_window_days: 1_000_000_000,
            ..GeneratorConfig::default().with_seed(3)
        };
        assert!(config.validate().is_err());

        let err = generate_with(model, &config, &[], "Event").unwrap_err();
        assert!(err.is_argument_error());
        assert!(err.to_string().contains("days"));
    }

    #[test]
    fn test_unconstructible_root_is_null() {
        let model = TypeModel::new().with_type(TypeDef::class("Opaque").property("A", TypeExpr::int()));
        let config = GeneratorConfig::default().with_seed(3);
        assert_eq!(generate_with(model, &config, &[], "Opaque").unwrap(), Value::Null);
    }

    #[test]
    fn test_self_reference_hits_depth_guard() {
        let model = TypeModel::new().with_type(TypeDef::record("Chain").property("Next", ty("Chain")));
        let config = GeneratorConfig::default().with_seed(3).with_max_depth(16);
        let err = generate_with(model, &config, &[], "Chain").unwrap_err();
        assert!(matches!(err, GenerateError::DepthExceeded { max_depth: 16, .. }));
    }

    #[test]
    fn test_self_reference_excluded_terminates() {
        let model = TypeModel::new().with_type(TypeDef::record("Chain").property("Next", ty("Chain")));
        let config = GeneratorConfig::default().with_seed(3);
        let chain = generate_with(model, &config, &["Chain.Next"], "Chain").unwrap();
        assert_eq!(chain.field("Next"), Some(&Value::Null));
    }
}

// =============================================================================
// Configuration Tests
// =============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_collection_count_drives_every_container() {
        let config = GeneratorConfig::default().with_seed(77).with_collection_count(5);
        let model = TypeModel::new().with_type(
            TypeDef::record("Bag")
                .property("Numbers", ty("int[]"))
                .property("Names", ty("List<string>"))
                .property("Seen", ty("Iterable<guid>")),
        );
        let bag = generate_with(model, &config, &[], "Bag").unwrap();
        assert_eq!(bag.field("Numbers").and_then(Value::len), Some(5));
        assert_eq!(bag.field("Names").and_then(Value::len), Some(5));
        assert_eq!(bag.field("Seen").and_then(Value::len), Some(5));
    }

    #[test]
    fn test_string_settings_from_json() {
        let config = GeneratorConfig::from_json_str(
            r#"{ "seed": 8, "string_length": 4, "string_pool": "xy" }"#,
        )
        .expect("config should parse");
        let resolver = Resolver::new(Arc::new(TypeModel::new()));
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());
        let text = ctx.generate(&TypeExpr::string()).unwrap();
        let text = text.as_str().unwrap();
        assert_eq!(text.len(), 4);
        assert!(text.chars().all(|c| c == 'x' || c == 'y'));
    }

    #[test]
    fn test_resolver_shared_across_contexts() {
        let resolver = Resolver::new(Arc::new(library_model()));
        let config = GeneratorConfig::default().with_seed(6);
        for _ in 0..3 {
            let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());
            ctx.generate(&ty("Shelf")).unwrap();
        }
        let cached = resolver.cached_generators();
        let mut ctx = GenerateContext::new(&resolver, &config, ExclusionPaths::empty());
        ctx.generate(&ty("Shelf")).unwrap();
        assert_eq!(resolver.cached_generators(), cached);
    }
}
