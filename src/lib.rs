//! Vaultview - browse and edit a hierarchical secret store from the terminal.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── browse        # Interactive browser
//! │   ├── commands      # ls / engines / show / set
//! │   ├── output        # Styled terminal output
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── path          # Directory path rules
//!     ├── cache         # Listing cache keyed by engine:path
//!     ├── navigator     # Directory navigation over the cache
//!     ├── edit          # Edit session for one leaf
//!     ├── machine       # EngineSelect / PathBrowse / LeafDetail
//!     ├── job, worker   # Ticketed store jobs on background threads
//!     ├── session       # Machine + worker + status notices
//!     ├── config        # ~/.config/vaultview/config.toml
//!     └── store/        # Secret store backends
//!         ├── mod       # SecretStore trait
//!         ├── memory    # In-process tree
//!         └── file      # TOML secret-tree file
//! ```
//!
//! The core is sans-IO: the navigator and state machine describe the store
//! calls they need as jobs and apply the replies, so only the worker ever
//! blocks on the store and late replies for abandoned requests are dropped.

pub mod cli;
pub mod core;
pub mod error;
