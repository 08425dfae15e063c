use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::config::{PageConfig, TargetKind, VisualTarget};
use crate::error::Result;
use crate::itunes::AlbumSource;
use crate::page::{bind_image, bind_text, set_loading, ElementRegistry};
use crate::picsum::ImageSource;
use crate::pool::AlbumPool;

/// How a single target's refresh ended.
#[derive(Debug)]
pub struct Settled {
    pub target: String,
    pub outcome: Result<()>,
}

/// The card number a target id ends with, `card-img-2` -> `2`.
pub fn card_index(id: &str) -> &str {
    id.rsplit('-').next().unwrap_or(id)
}

pub fn card_title_id(index: &str) -> String {
    format!("card-title-{}", index)
}

pub fn card_text_id(index: &str) -> String {
    format!("card-text-{}", index)
}

pub struct Refresher {
    registry: Arc<dyn ElementRegistry>,
    images: Arc<dyn ImageSource>,
    albums: Arc<dyn AlbumSource>,

    targets: Vec<VisualTarget>,
    pool: AlbumPool,
    artwork_size: u32,
}

impl Refresher {
    pub fn new(
        registry: Arc<dyn ElementRegistry>,
        images: Arc<dyn ImageSource>,
        albums: Arc<dyn AlbumSource>,
        config: &PageConfig,
    ) -> Self {
        Self {
            registry,
            images,
            albums,

            targets: config.targets.clone(),
            pool: config.pool.clone(),
            artwork_size: config.artwork_size,
        }
    }

    /// Refreshes every target at once and waits for all of them to settle.
    /// A failing target is logged and put back into its idle state, it
    /// never stops the others.
    pub async fn refresh_all(&self) -> Vec<Settled> {
        for target in self.targets.iter() {
            set_loading(self.registry.as_ref(), &target.id, true);
        }

        let tasks = self.targets.iter().map(|target| async move {
            let outcome = self.refresh_target(target).await;

            if let Err(e) = &outcome {
                warn!("Failed to load image for '{}': {}", target.id, e);
                set_loading(self.registry.as_ref(), &target.id, false);
            }

            Settled {
                target: target.id.clone(),
                outcome,
            }
        });

        let settled = join_all(tasks).await;

        let failed = settled.iter().filter(|s| s.outcome.is_err()).count();
        info!(
            "Refreshed {} target(s), {} failed",
            settled.len() - failed,
            failed
        );

        settled
    }

    async fn refresh_target(&self, target: &VisualTarget) -> Result<()> {
        let registry = self.registry.as_ref();

        match target.kind {
            TargetKind::Background => {
                let url =
                    self.images.fetch_image(target.width, target.height).await?;
                debug!("'{}' -> {}", target.id, url);

                bind_image(registry, &target.id, &url);
            }

            TargetKind::Card => {
                let entry = self.pool.pick_random();
                let album = self
                    .albums
                    .fetch_album_data(entry, self.artwork_size)
                    .await?;
                debug!(
                    "'{}' -> {} - {} ({})",
                    target.id, album.artist_name, album.album_name, album.image_url
                );

                bind_image(registry, &target.id, &album.image_url);

                let index = card_index(&target.id);
                bind_text(registry, &card_title_id(index), &album.artist_name);
                bind_text(registry, &card_text_id(index), &album.album_name);
            }
        }

        Ok(())
    }
}
