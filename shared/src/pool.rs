use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct CatalogEntry {
    pub artist: String,
    pub album: String,
}

impl CatalogEntry {
    pub fn new(artist: &str, album: &str) -> Self {
        Self {
            artist: artist.to_string(),
            album: album.to_string(),
        }
    }

    /// The free-text search term sent to the catalog.
    pub fn term(&self) -> String {
        format!("{} {}", self.artist, self.album)
    }
}

// NOTE: Albums
const DEFAULT_ALBUMS: &[(&str, &str)] = &[
    ("The Beatles", "Abbey Road"),
    ("Geese", "3D Country"),
    ("Thelonious Monk", "Underground"),
    ("Fleetwood Mac", "Rumours"),
    ("Radiohead", "In Rainbows"),
    ("Nick Drake", "Bryter Layter"),
    ("Junior H", "$AD BOYZ 4 LIFE II"),
    ("Talk Talk", "Laughing Stock"),
    ("Sufjan Stevens", "Seven Swans"),
    ("Kendrick Lamar", "To Pimp a Butterfly"),
    ("black midi", "schlagenheim"),
    ("Belle and Sebastian", "If You’re Feeling Sinister"),
    ("Kate Bush", "Hounds of Love"),
    ("Dry Cleaning", "Secret Love"),
    ("Arthur Russell", "World of Echo"),
    ("The Strokes", "Is This It"),
    ("Fiona Apple", "Fetch the Bolt Cutters"),
    ("Sonic Youth", "Daydream Nation"),
    ("Kanye West", "My Beautiful Dark Twisted Fantasy"),
    ("The Velvet Underground", "The Velvet Underground & Nico"),
];

/// Fixed, non-empty list of albums the cards are drawn from.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(try_from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct AlbumPool {
    entries: Vec<CatalogEntry>,
}

impl AlbumPool {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyPool);
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn pick_random(&self) -> &CatalogEntry {
        let index = rand::thread_rng().gen_range(0..self.entries.len());
        &self.entries[index]
    }
}

impl Default for AlbumPool {
    fn default() -> Self {
        let entries = DEFAULT_ALBUMS
            .iter()
            .map(|(artist, album)| CatalogEntry::new(artist, album))
            .collect();

        Self { entries }
    }
}

impl TryFrom<Vec<CatalogEntry>> for AlbumPool {
    type Error = Error;

    fn try_from(value: Vec<CatalogEntry>) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AlbumPool> for Vec<CatalogEntry> {
    fn from(value: AlbumPool) -> Self {
        value.entries
    }
}
