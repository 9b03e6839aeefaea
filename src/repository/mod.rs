//! Encrypted macro file storage.
//!
//! - `format`: plaintext payload layout and atomic writes
//! - `store`: `MacroRepository`, the save/load/list/delete API
//! - `info`: metadata returned without decrypting

pub mod format;
pub mod info;
pub mod store;

pub use format::{EnvelopeMetadata, FORMAT_VERSION, MACRO_SUFFIX};
pub use info::FileInfo;
pub use store::MacroRepository;

/// An opaque macro record: whatever JSON object the caller stored.
pub type Record = serde_json::Map<String, serde_json::Value>;
