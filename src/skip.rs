//! Skip declarations.
//!
//! Members are declared as skipped by type and member name. The most recently
//! marked member is remembered so that a following
//! [`with_specific_field`](SkipMembers::with_specific_field) can narrow the
//! exclusion from the whole member to one field of its element type.

use autobuilder_core::ExclusionPaths;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipMembers {
    paths: Vec<String>,
    parent: Option<(String, String)>,
}

impl SkipMembers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude `type_name.member`. A path that is already present is not added
    /// again and does not change the most recently marked member.
    pub fn with_skip(&mut self, type_name: &str, member: &str) -> &mut Self {
        if member.trim().is_empty() {
            return self;
        }
        let path = format!("{}.{}", type_name, member);
        if !self.paths.contains(&path) {
            self.parent = Some((type_name.to_string(), member.to_string()));
            self.paths.push(path);
        }
        self
    }

    /// Replace the most recently marked member's path with
    /// `element_type.member`, so the parent member is generated again and only
    /// `member` of its elements is skipped. No-op when the parent path is gone.
    pub fn with_specific_field(&mut self, element_type: &str, member: &str) -> &mut Self {
        let Some((parent_type, parent_member)) = &self.parent else {
            return self;
        };
        let parent_path = format!("{}.{}", parent_type, parent_member);
        if let Some(slot) = self.paths.iter_mut().find(|p| **p == parent_path) {
            *slot = format!("{}.{}", element_type, member);
        }
        self
    }

    /// Most recently marked `(type, member)`.
    pub fn parent(&self) -> Option<(&str, &str)> {
        self.parent
            .as_ref()
            .map(|(ty, member)| (ty.as_str(), member.as_str()))
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn to_exclusion_paths(&self) -> ExclusionPaths {
        self.paths.iter().cloned().collect()
    }
}
