//! Type models shared by the integration tests.

use autobuilder::{MemberDef, TypeDef, TypeExpr, TypeModel};
use std::sync::Arc;

fn ty(text: &str) -> TypeExpr {
    text.parse().expect("fixture type should parse")
}

/// `Point { X: int, Y: int }` as a value type.
pub fn point_model() -> TypeModel {
    TypeModel::new().with_type(
        TypeDef::structure("Point")
            .field("X", TypeExpr::int())
            .field("Y", TypeExpr::int()),
    )
}

/// `Team { Name: string, Members: List<string> }`.
pub fn team_model() -> TypeModel {
    TypeModel::new().with_type(
        TypeDef::record("Team")
            .property("Name", TypeExpr::string())
            .property("Members", ty("List<string>")),
    )
}

/// A team whose members are records, plus a self-referencing `Node`.
///
/// `Roster.Members` is read-only, so it is filled through `add`.
pub fn roster_model() -> TypeModel {
    TypeModel::new()
        .with_type(TypeDef::enumeration("Role", ["Lead", "Engineer", "Designer"]))
        .with_type(
            TypeDef::record("Member")
                .property("Name", TypeExpr::string())
                .property("Email", TypeExpr::string())
                .property("Role", ty("Role"))
                .property("Joined", ty("datetime")),
        )
        .with_type(
            TypeDef::record("Roster")
                .property("Title", TypeExpr::string())
                .property("Lead", ty("Member"))
                .member(MemberDef::read_only("Members", ty("List<Member>"))),
        )
        .with_type(
            TypeDef::record("Node")
                .property("Value", TypeExpr::int())
                .property("Next", ty("Node")),
        )
}

pub fn shared_model(model: TypeModel) -> Arc<TypeModel> {
    Arc::new(model)
}
