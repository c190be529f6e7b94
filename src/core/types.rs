//! Type aliases for domain concepts.

/// A mounted secret engine name (e.g. `kv`, `secret`), without trailing '/'.
pub type EngineName = String;

/// One entry of a directory listing: `name/` for directories, `name` for leaves.
pub type ChildName = String;

/// A '/'-separated path inside an engine. Directory paths end with '/';
/// the engine root is the empty string.
pub type SecretPath = String;

/// Key/value pairs of a leaf as display strings.
pub type SecretData = std::collections::BTreeMap<String, String>;
