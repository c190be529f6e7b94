//! Constants used throughout vaultview.

/// Separator between path segments; a trailing one marks a directory.
pub const SEPARATOR: char = '/';

/// Path of an engine's root directory.
pub const ROOT: &str = "";

/// Placeholder shown for missing metadata.
pub const NA_VALUE: &str = "n/a";

/// Default mask shown instead of a secret value.
pub const MASK: &str = "*****";

/// How long a status notice stays visible, in seconds.
pub const STATUS_TTL_SECS: u64 = 5;

/// Display format for creation timestamps (e.g. `Jan 2, 2006 3:04 PM`).
pub const DATE_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

/// Config directory name under the platform config dir.
pub const CONFIG_DIR: &str = "vaultview";

/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable naming the secret-tree store file.
pub const STORE_ENV: &str = "VAULTVIEW_STORE";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "VAULTVIEW_LOG";
