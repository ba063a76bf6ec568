//! Infrastructure layer: stores and providers behind the gate's ports, plus
//! configuration loading.
//!
//! Everything here is in-memory; a production host plugs its own adapters
//! into the same traits.

pub mod config;
pub mod content;
pub mod editors;
pub mod meta;
pub mod nonces;
pub mod options;
pub mod sessions;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use content::{CommercePageIds, ContentDirectory, ContentItem, ContentKind, SiteSeed};
pub use editors::EditorRegistry;
pub use meta::{FORCE_LOGIN_META, ResourceMeta};
pub use nonces::NonceRegistry;
pub use options::{OptionTable, activate, import_options, read_json_file};
pub use sessions::SessionRegistry;
