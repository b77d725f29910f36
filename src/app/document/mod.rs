// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/document/mod.rs
//
// Page image sources and asynchronous page loading.

#[cfg(feature = "portable")]
pub mod portable;
pub mod raster;

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::DocResult;
use crate::config::EditorConfig;

pub use self::raster::PageImage;

/// Where page images come from.
///
/// `page_url` must be deterministic: the editor compares URLs to decide
/// whether a finished load still belongs to the page on screen.
pub trait PageSource: Send + Sync {
    /// Address of the image for `page`.
    fn page_url(&self, page: u32) -> String;

    /// Fetch the encoded image behind `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = DocResult<Vec<u8>>> + Send;

    /// Number of pages, when the source knows it.
    fn page_count(&self) -> Option<u32> {
        None
    }
}

/// A single outstanding image load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub url: String,
}

impl PageRequest {
    pub fn for_page<S: PageSource>(source: &S, page: u32) -> Self {
        Self {
            page,
            url: source.page_url(page),
        }
    }
}

/// Fetch and decode one page. Errors name the failing URL.
pub async fn load_page<S: PageSource>(
    source: &S,
    request: &PageRequest,
) -> DocResult<PageImage> {
    let bytes = source
        .fetch(&request.url)
        .await
        .with_context(|| format!("Failed to load page image {}", request.url))?;

    let page = request.page;
    let url = request.url.clone();
    tokio::task::spawn_blocking(move || PageImage::decode(page, url, &bytes))
        .await
        .context("Image decode task failed")?
        .with_context(|| format!("Failed to load page image {}", request.url))
}

/// Page images stored as files in one directory, named by a pattern.
#[derive(Debug, Clone)]
pub struct DirectoryPageSource {
    dir: PathBuf,
    config: EditorConfig,
}

impl DirectoryPageSource {
    pub fn new(dir: impl Into<PathBuf>, config: &EditorConfig) -> Self {
        Self {
            dir: dir.into(),
            config: config.clone(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PageSource for DirectoryPageSource {
    fn page_url(&self, page: u32) -> String {
        self.dir
            .join(self.config.page_file_name(page))
            .to_string_lossy()
            .into_owned()
    }

    fn fetch(&self, url: &str) -> impl Future<Output = DocResult<Vec<u8>>> + Send {
        let path = PathBuf::from(url);
        async move {
            tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))
        }
    }
}
