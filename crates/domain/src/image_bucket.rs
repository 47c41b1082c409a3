use std::fmt::{Display, Formatter};
use std::str::FromStr;

use inkdesk_core::AppError;
use serde::{Deserialize, Serialize};

/// Public image collections shown on the studio site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageBucket {
    /// Finished work.
    Gallery,
    /// Ready-to-tattoo flash designs.
    Flash,
}

impl ImageBucket {
    /// Returns the object-store bucket name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Flash => "flash",
        }
    }

    /// Returns all known buckets.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Gallery, Self::Flash]
    }
}

impl Display for ImageBucket {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ImageBucket {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "gallery" => Ok(Self::Gallery),
            "flash" => Ok(Self::Flash),
            _ => Err(AppError::NotFound(format!("unknown image bucket '{value}'"))),
        }
    }
}
