use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a media asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: AssetId,
    pub original_path: String,
    /// Path of the resized rendition used as inference input. Absent until
    /// thumbnail generation has run.
    pub resize_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Asset {
    #[must_use]
    pub fn new(id: impl Into<AssetId>, original_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            original_path: original_path.into(),
            resize_path: None,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_resize_path(mut self, resize_path: impl Into<String>) -> Self {
        self.resize_path = Some(resize_path.into());
        self
    }

    /// The resize path, if one exists and is non-empty.
    #[must_use]
    pub fn renderable_path(&self) -> Option<&str> {
        self.resize_path.as_deref().filter(|path| !path.is_empty())
    }
}

/// Derived property an asset may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WithoutProperty {
    ObjectTags,
    ClipEncoding,
}

impl std::fmt::Display for WithoutProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ObjectTags => write!(f, "object-tags"),
            Self::ClipEncoding => write!(f, "clip-encoding"),
        }
    }
}
