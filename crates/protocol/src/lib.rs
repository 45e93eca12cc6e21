//! # Tabs Protocol
//!
//! Value types passed between tab producers, the index coordinator and
//! whatever host evaluates queries against the merged index.
//!
//! ```text
//! list program ──> RawTabRecord (one JSON line)
//!                     └─> SourceRecord (tagged with its source)
//!                            └─> IndexedItem (searchable, activatable)
//! ```

mod item;
mod record;
mod source;

pub use item::{ActivationRef, IndexedItem, PLACEHOLDER_TEXT, SUBTITLE_MARKER};
pub use record::{RawTabRecord, SourceRecord};
pub use source::{find_known_source, Engine, KnownSource, KNOWN_SOURCES};
