use serde::{Deserialize, Serialize};

/// One line emitted by a list program, before it is tagged with a source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTabRecord {
    #[serde(default)]
    pub title: String,
    pub url: String,
    pub window_id: i64,
    pub tab_index: u32,
    #[serde(default, alias = "iconUrl")]
    pub icon_hint: String,
}

impl RawTabRecord {
    #[must_use]
    pub fn into_record(self, source: impl Into<String>) -> SourceRecord {
        SourceRecord {
            source: source.into(),
            title: self.title,
            url: self.url,
            tab_index: self.tab_index,
            window_id: self.window_id,
            icon_hint: self.icon_hint,
        }
    }
}

/// A single open tab together with the source that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRecord {
    pub source: String,
    pub title: String,
    pub url: String,
    pub tab_index: u32,
    pub window_id: i64,
    pub icon_hint: String,
}

impl SourceRecord {
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        window_id: i64,
        tab_index: u32,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            url: url.into(),
            tab_index,
            window_id,
            icon_hint: String::new(),
        }
    }

    #[must_use]
    pub fn with_icon_hint(mut self, icon_hint: impl Into<String>) -> Self {
        self.icon_hint = icon_hint.into();
        self
    }
}
