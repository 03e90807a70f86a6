pub const APP_NAME: &str = "lanserve";

/// Well-known location of the manifest inside a bundle.
pub const MANIFEST_FILENAME: &str = "Manifest.yml";

/// Namespace holding the server's working-directory tree.
pub const FILES_PREFIX: &str = "Files/";

/// Namespace holding one raw-text entry per script, named by script ID.
pub const SCRIPTS_PREFIX: &str = "Scripts/";
