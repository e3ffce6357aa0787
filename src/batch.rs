//! # Batch Pipeline
//!
//! Turns a list of news items into finished cards.
//!
//! ```text
//! items ──► resolve_images   (async, placeholder on failure)
//!       ──► render_all       (blocking, rayon, one composition per item)
//!       ──► CardSink::deliver
//! ```
//!
//! The two stages are separate calls so the CPU-bound stage never runs on an
//! async executor thread: drive `resolve_images` on a runtime, then call
//! `render_all` from plain synchronous code (or `spawn_blocking` /
//! `block_in_place` when already inside a runtime).
//!
//! Items are isolated from each other: a failure while composing, encoding or
//! delivering one card is logged and recorded in the [`BatchReport`], and the
//! rest of the batch carries on.

use image::DynamicImage;
use rayon::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::CardError;
use crate::config::CardConfig;
use crate::fetch::{ImageFetcher, ImageSource, placeholder_image};
use crate::preset::{NewsTemplate, source_line};
use crate::render::{Composer, encode, write_card};

fn default_title() -> String {
    "No Title".to_string()
}

fn default_source() -> String {
    "Unknown Source".to_string()
}

fn default_summary() -> String {
    "No Summary Found".to_string()
}

/// One story from the upstream feed.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_summary")]
    pub summary: String,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default, alias = "custom_img")]
    pub image: Option<ImageSource>,
}

impl NewsItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source: default_source(),
            summary: default_summary(),
            publish_date: None,
            image: None,
        }
    }

    /// The "Source: … | date | Photo: Generated" line for this item.
    pub fn source_text(&self) -> String {
        source_line(&self.source, self.publish_date.as_deref())
    }

    /// Read a JSON array of items.
    pub fn load_all(path: &Path) -> Result<Vec<NewsItem>, CardError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Receives each finished card.
pub trait CardSink: Send + Sync {
    fn deliver(&self, index: usize, item: &NewsItem, card: &[u8]) -> Result<(), CardError>;
}

/// Writes `card_<index>.<ext>` files into the configured output directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    config: CardConfig,
}

impl DirectorySink {
    pub fn new(config: CardConfig) -> Self {
        Self { config }
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.config.card_path(index)
    }
}

impl CardSink for DirectorySink {
    fn deliver(&self, index: usize, _item: &NewsItem, card: &[u8]) -> Result<(), CardError> {
        write_card(&self.path_for(index), card)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    /// `(item index, error message)` for every card that didn't make it.
    pub failures: Vec<(usize, String)>,
}

pub struct BatchRunner {
    composer: Composer,
    template: NewsTemplate,
    fetcher: ImageFetcher,
    config: CardConfig,
}

impl BatchRunner {
    pub fn new(template: NewsTemplate, config: CardConfig) -> Result<Self, CardError> {
        config.validate()?;
        Ok(Self {
            composer: Composer::from_config(&config)?,
            fetcher: ImageFetcher::new(&config)?,
            template,
            config,
        })
    }

    /// Fetch or load every item's image, substituting the placeholder for
    /// anything that can't be had. Returns one image per item, in order.
    pub async fn resolve_images(&self, items: &[NewsItem]) -> Vec<Arc<DynamicImage>> {
        let mut images = Vec::with_capacity(items.len());
        for item in items {
            images.push(self.resolve_image(item).await);
        }
        images
    }

    /// Compose, encode and deliver every item on the rayon pool.
    ///
    /// `images[i]` is the resolved image for `items[i]`. Blocks until the
    /// whole batch is done; an item with no matching image is a failure.
    pub fn render_all(
        &self,
        items: &[NewsItem],
        images: &[Arc<DynamicImage>],
        sink: &dyn CardSink,
    ) -> BatchReport {
        let results: Vec<Result<(), CardError>> = items
            .par_iter()
            .enumerate()
            .map(|(index, item)| match images.get(index) {
                Some(image) => self.render_one(index, item, image.clone(), sink),
                None => Err(CardError::Image(format!("no resolved image for item {}", index))),
            })
            .collect();

        let mut report = BatchReport {
            total: items.len(),
            ..BatchReport::default()
        };
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    warn!(index, error = %e, "card failed");
                    report.failures.push((index, e.to_string()));
                }
            }
        }
        info!(
            succeeded = report.succeeded,
            total = report.total,
            "batch finished"
        );
        report
    }

    async fn resolve_image(&self, item: &NewsItem) -> Arc<DynamicImage> {
        let label = Some(self.template.small_font.as_ref());
        match &item.image {
            Some(source) => self.fetcher.fetch_or_placeholder(source, label).await,
            None => {
                warn!(title = %item.title, "item has no image");
                Arc::new(placeholder_image(self.config.placeholder_size, label))
            }
        }
    }

    fn render_one(
        &self,
        index: usize,
        item: &NewsItem,
        image: Arc<DynamicImage>,
        sink: &dyn CardSink,
    ) -> Result<(), CardError> {
        let title: String = item.title.chars().take(50).collect();
        info!(index, title = %title, "composing card");
        let preset = self.template.build(&item.title, &item.source_text(), image);
        let canvas = self.composer.compose(&preset)?;
        let bytes = encode(&canvas, self.config.format, self.config.jpeg_quality)?;
        sink.deliver(index, item, &bytes)
    }
}
