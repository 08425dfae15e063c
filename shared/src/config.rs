use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::itunes::{DEFAULT_ARTWORK_SIZE, DEFAULT_CATALOG_ENDPOINT};
use crate::picsum::DEFAULT_IMAGE_ENDPOINT;
use crate::pool::AlbumPool;

/// Id of the target that is a background when its config entry leaves
/// `kind` out.
pub const DEFAULT_BACKGROUND_ID: &str = "hero-bg";

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Gets a random picture sized to the target.
    Background,
    /// Gets album artwork plus a title and text underneath.
    Card,
}

impl TargetKind {
    fn for_id(id: &str) -> Self {
        if id == DEFAULT_BACKGROUND_ID {
            TargetKind::Background
        } else {
            TargetKind::Card
        }
    }
}

#[derive(Deserialize)]
struct RawTarget {
    id: String,
    width: u32,
    height: u32,
    kind: Option<TargetKind>,
}

impl From<RawTarget> for VisualTarget {
    fn from(raw: RawTarget) -> Self {
        let kind = raw.kind.unwrap_or_else(|| TargetKind::for_id(&raw.id));
        Self {
            id: raw.id,
            width: raw.width,
            height: raw.height,
            kind,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(from = "RawTarget")]
pub struct VisualTarget {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub kind: TargetKind,
}

impl VisualTarget {
    pub fn new(id: &str, width: u32, height: u32, kind: TargetKind) -> Self {
        Self {
            id: id.to_string(),
            width,
            height,
            kind,
        }
    }
}

pub fn default_targets() -> Vec<VisualTarget> {
    vec![
        VisualTarget::new(
            DEFAULT_BACKGROUND_ID,
            1400,
            500,
            TargetKind::Background,
        ),
        VisualTarget::new("card-img-1", 500, 500, TargetKind::Card),
        VisualTarget::new("card-img-2", 500, 500, TargetKind::Card),
    ]
}

fn default_image_endpoint() -> String {
    DEFAULT_IMAGE_ENDPOINT.to_string()
}

fn default_catalog_endpoint() -> String {
    DEFAULT_CATALOG_ENDPOINT.to_string()
}

fn default_artwork_size() -> u32 {
    DEFAULT_ARTWORK_SIZE
}

/// Page layout and endpoints, read from JSON. Every field is optional.
///
/// A target entry without `kind` is a card, except `hero-bg` which is the
/// background.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PageConfig {
    #[serde(rename = "imageEndpoint", default = "default_image_endpoint")]
    pub image_endpoint: String,
    #[serde(rename = "catalogEndpoint", default = "default_catalog_endpoint")]
    pub catalog_endpoint: String,
    #[serde(rename = "artworkSize", default = "default_artwork_size")]
    pub artwork_size: u32,

    #[serde(default = "default_targets")]
    pub targets: Vec<VisualTarget>,
    #[serde(default)]
    pub pool: AlbumPool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            image_endpoint: default_image_endpoint(),
            catalog_endpoint: default_catalog_endpoint(),
            artwork_size: default_artwork_size(),
            targets: default_targets(),
            pool: AlbumPool::default(),
        }
    }
}

impl PageConfig {
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        let s = read_to_string(path).map_err(Error::ReadConfig)?;
        Self::from_json(&s)
            .map_err(|e| Error::InvalidConfig(path.to_path_buf(), e))
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<PageConfig>(s)
    }
}
