use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const IMAGE_BASE_URL: &str = "https://images.igdb.com/igdb/image/upload";

/// Image size presets served by the IGDB image CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Thumb,
    CoverSmall,
    CoverBig,
    ScreenshotMed,
    ScreenshotBig,
    ScreenshotHuge,
    Hd720,
    Hd1080,
}

impl ImageSize {
    fn as_str(self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::CoverSmall => "cover_small",
            Self::CoverBig => "cover_big",
            Self::ScreenshotMed => "screenshot_med",
            Self::ScreenshotBig => "screenshot_big",
            Self::ScreenshotHuge => "screenshot_huge",
            Self::Hd720 => "720p",
            Self::Hd1080 => "1080p",
        }
    }
}

/// Builds a CDN URL for an IGDB `image_id`
pub fn image_url(image_id: &str, size: ImageSize) -> String {
    format!("{}/t_{}/{}.jpg", IMAGE_BASE_URL, size.as_str(), image_id)
}

/// Game cover art
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    #[serde(default)]
    pub id: Option<u64>,
    pub image_id: String,
}

impl Cover {
    pub fn url(&self, size: ImageSize) -> String {
        image_url(&self.image_id, size)
    }
}

/// Platform reference expanded with `platforms.name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Genre reference expanded with `genres.name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// A game from the `/games` resource
///
/// Only `id` is always present; everything else depends on the fields the
/// query selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cover: Option<Cover>,
    /// Unix timestamp in seconds
    #[serde(default)]
    pub first_release_date: Option<i64>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub franchises: Vec<u64>,
    #[serde(default)]
    pub total_rating: Option<f64>,
}

impl Game {
    /// Returns the first release date as a UTC timestamp
    pub fn release_date(&self) -> Option<DateTime<Utc>> {
        self.first_release_date
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Returns the cover URL at the given size
    pub fn cover_url(&self, size: ImageSize) -> Option<String> {
        self.cover.as_ref().map(|c| c.url(size))
    }
}

/// A screenshot from the `/screenshots` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: u64,
    #[serde(default)]
    pub game: Option<u64>,
    pub image_id: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Screenshot {
    pub fn url(&self, size: ImageSize) -> String {
        image_url(&self.image_id, size)
    }
}

/// A franchise from the `/franchises` resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Franchise {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub games: Vec<u64>,
}

/// Completion time estimates from the `/game_time_to_beats` resource
///
/// Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeToBeat {
    pub id: u64,
    pub game_id: u64,
    #[serde(default)]
    pub hastily: Option<u64>,
    #[serde(default)]
    pub normally: Option<u64>,
    #[serde(default)]
    pub completely: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl TimeToBeat {
    /// Formats a duration in seconds as hours, rounded to the nearest half hour
    pub fn format_hours(seconds: u64) -> String {
        let half_hours = (seconds + 900) / 1800;
        if half_hours % 2 == 0 {
            format!("{}h", half_hours / 2)
        } else {
            format!("{}.5h", half_hours / 2)
        }
    }
}
