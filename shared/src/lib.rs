pub use error::{Error, Result};

pub mod app;
pub mod config;
pub mod error;
pub mod itunes;
pub mod page;
pub mod picsum;
pub mod pool;
pub mod refresh;

pub use app::{App, PageEvent};
pub use config::{PageConfig, TargetKind, VisualTarget};
pub use itunes::{AlbumResult, AlbumSource, ITunes};
pub use picsum::{ImageSource, Picsum};
pub use pool::{AlbumPool, CatalogEntry};
pub use refresh::{Refresher, Settled};
