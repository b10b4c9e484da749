#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: type models used across test files
//! - `assertions`: assertion helpers with descriptive failure messages

pub mod assertions;
pub mod fixtures;

pub use fixtures::{point_model, roster_model, shared_model, team_model};

pub use assertions::{
    assert_error_contains, assert_field_populated, assert_in_range, assert_lowercase_text,
    assert_ok,
};
