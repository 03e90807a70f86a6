//! Platform configuration.

pub mod paths;
