//! Test fixtures and constants.

/// File name of the store inside a test's temp dir.
pub const STORE_FILE: &str = "secrets.toml";

/// A store with no engines at all.
pub const EMPTY_STORE: &str = "";

/// Two populated engines, an empty one, nested directories and mixed value
/// types.
pub const SAMPLE_STORE: &str = r#"
engines = ["scratch"]

[[secret]]
engine = "kv"
path = "app/db/creds"
version = 3
created_time = "2024-03-05T14:07:09Z"

[secret.data]
username = "admin"
password = "hunter2"
port = 5432

[[secret]]
engine = "kv"
path = "app/api"

[secret.data]
token = "tok-123"
enabled = true

[[secret]]
engine = "kv"
path = "infra/dns"

[secret.data]
zone = "example.com"

[[secret]]
engine = "team"
path = "shared"

[secret.data]
note = "hello"
"#;

/// A store file whose leaf path is a directory path.
pub const BROKEN_STORE: &str = r#"
[[secret]]
engine = "kv"
path = "app/"
"#;

/// Pairs seeded into in-process stores by session tests.
pub const DB_CREDS: &[(&str, &str)] = &[("username", "admin"), ("password", "hunter2")];
