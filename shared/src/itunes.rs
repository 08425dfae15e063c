use async_trait::async_trait;
use log::{debug, trace};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::picsum::log_status_error;
use crate::pool::{AlbumPool, CatalogEntry};

pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://itunes.apple.com";
pub const DEFAULT_ARTWORK_SIZE: u32 = 600;

// NOTE: The catalog only hands out 100x100 artwork urls, bigger variants
// live at the same path with this token swapped out.
const ARTWORK_SIZE_TOKEN: &str = "100x100";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AlbumResult {
    pub image_url: String,
    pub artist_name: String,
    pub album_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchResult {
    #[serde(rename = "artworkUrl100")]
    pub artwork_url: String,
    #[serde(rename = "artistName")]
    pub artist_name: String,
    #[serde(rename = "collectionName")]
    pub collection_name: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchResponse {
    #[serde(rename = "resultCount")]
    pub result_count: usize,
    pub results: Vec<SearchResult>,
}

#[async_trait]
pub trait AlbumSource: Send + Sync {
    async fn fetch_album_data(
        &self,
        entry: &CatalogEntry,
        size: u32,
    ) -> Result<AlbumResult>;
}

/// Rewrites a 100x100 artwork url into its `size`x`size` variant.
///
/// This is a plain text substitution of the first `100x100` in the url.
/// Urls without the token come back unchanged, still at the small size.
pub fn upsize_artwork(url: &str, size: u32) -> String {
    if !url.contains(ARTWORK_SIZE_TOKEN) {
        debug!("'{}' has no size token, keeping original artwork", url);
        return url.to_string();
    }

    url.replacen(ARTWORK_SIZE_TOKEN, &format!("{}x{}", size, size), 1)
}

pub fn album_from_response(
    res: SearchResponse,
    size: u32,
    term: &str,
) -> Result<AlbumResult> {
    if res.result_count == 0 {
        return Err(Error::NotFound {
            term: term.to_string(),
        });
    }

    let result = res.results.into_iter().next().ok_or_else(|| {
        Error::NotFound {
            term: term.to_string(),
        }
    })?;

    Ok(AlbumResult {
        image_url: upsize_artwork(&result.artwork_url, size),
        artist_name: result.artist_name,
        album_name: result.collection_name,
    })
}

/// Picks an album from `pool` and returns just its artwork url.
pub async fn fetch_album_cover(
    source: &dyn AlbumSource,
    pool: &AlbumPool,
    size: u32,
) -> Result<String> {
    let entry = pool.pick_random();
    let album = source.fetch_album_data(entry, size).await?;

    Ok(album.image_url)
}

#[derive(Clone, Debug)]
pub struct ITunes {
    endpoint: String,
    client: Client,
}

impl ITunes {
    pub fn new(endpoint: String) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    pub fn with_client(endpoint: String, client: Client) -> Self {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        Self { endpoint, client }
    }

    pub fn search_url(&self, entry: &CatalogEntry) -> String {
        format!(
            "{}/search?term={}&entity=album&limit=1",
            self.endpoint,
            urlencoding::encode(&entry.term())
        )
    }
}

#[async_trait]
impl AlbumSource for ITunes {
    async fn fetch_album_data(
        &self,
        entry: &CatalogEntry,
        size: u32,
    ) -> Result<AlbumResult> {
        debug!("fetch_album_data('{}')", entry.term());

        let url = self.search_url(entry);
        trace!("URL: {}", url);

        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(Error::SendRequestFailed)?;

        let status = res.status();

        if status.is_success() {
            let res = res
                .json::<SearchResponse>()
                .await
                .map_err(Error::ResponseParseFailed)?;

            album_from_response(res, size, &entry.term())
        } else {
            log_status_error("fetch_album_data", status);
            Err(Error::Http {
                status: status.as_u16(),
            })
        }
    }
}
