//! Integration tests for bundle imports against an on-disk store.

mod common;
mod import_tests;
mod scenario_tests;
