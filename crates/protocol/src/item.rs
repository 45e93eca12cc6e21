use crate::record::SourceRecord;
use serde::{Deserialize, Serialize};

/// Text of the single item shown while the very first refresh is running.
pub const PLACEHOLDER_TEXT: &str = "Browser tabs are being indexed...";

/// Prefix put in front of every subtitle.
pub const SUBTITLE_MARKER: &str = "⧉ ";

/// Everything an activation sink needs to bring a tab back to focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRef {
    pub source: String,
    pub window_id: i64,
    pub tab_index: u32,
}

impl From<&SourceRecord> for ActivationRef {
    fn from(record: &SourceRecord) -> Self {
        Self {
            source: record.source.clone(),
            window_id: record.window_id,
            tab_index: record.tab_index,
        }
    }
}

/// A searchable entry of the merged index.
///
/// Items are built once per refresh cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedItem {
    /// Identity key, the tab url.
    pub id: String,
    pub display_text: String,
    pub subtitle: String,
    pub search_string: String,
    /// `None` only for the indexing placeholder.
    pub activation: Option<ActivationRef>,
    pub icon_hint: String,
}

impl IndexedItem {
    /// Builds the item for `record`; the search string is computed by the caller.
    #[must_use]
    pub fn from_record(record: &SourceRecord, search_string: String) -> Self {
        let display_text = if record.title.is_empty() {
            record.url.clone()
        } else {
            record.title.clone()
        };
        Self {
            id: record.url.clone(),
            display_text,
            subtitle: display_subtitle(&record.url),
            search_string,
            activation: Some(ActivationRef::from(record)),
            icon_hint: record.icon_hint.clone(),
        }
    }

    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            display_text: PLACEHOLDER_TEXT.to_string(),
            subtitle: String::new(),
            search_string: String::new(),
            activation: None,
            icon_hint: String::new(),
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.activation.is_none()
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.activation.as_ref().map(|a| a.source.as_str())
    }
}

fn display_subtitle(url: &str) -> String {
    let rest = url.find("://").map_or(url, |pos| &url[pos + 3..]);
    format!("{SUBTITLE_MARKER}{rest}")
}
