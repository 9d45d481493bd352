//! Shared test helpers for integration tests.

#![allow(dead_code)]

pub mod package_fixture;
pub mod source_fixtures;
