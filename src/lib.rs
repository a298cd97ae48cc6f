//! projconf — project configuration normalizer (library crate).
//!
//! Turns a `project.json` description of an app-shell web project into an
//! immutable, validated [`config::ProjectConfig`] shared by build, bundling
//! and lint tools.

pub mod builds;
pub mod config;
pub mod constants;
pub mod env;
pub mod lint;
pub mod paths;
pub mod sources;
