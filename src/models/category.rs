//! Category model

use serde::{Deserialize, Serialize};

/// Category content is filed under
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Category {
    pub fn has_avatar(&self) -> bool {
        self.avatar_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}
