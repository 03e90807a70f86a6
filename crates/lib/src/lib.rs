//! lanserve-lib: server bundle import for the LAN-party launcher
//!
//! A bundle is a zip archive carrying a desired-state manifest for one game
//! server, its script bodies and its working-directory files. Importing a
//! bundle reconciles the manifest against the locally stored server:
//! - `manifest`: decoding and validation of `Manifest.yml`
//! - `reconcile`: identity-keyed add/update/remove of nested collections
//! - `materialize`: contained extraction of `Files/` into the working directory
//! - `import`: the orchestrator tying locate, lock, reconcile and commit together

pub mod archive;
pub mod consts;
pub mod import;
pub mod import_lock;
pub mod locate;
pub mod manifest;
pub mod materialize;
pub mod model;
pub mod platform;
pub mod reconcile;
pub mod store;
pub mod util;
