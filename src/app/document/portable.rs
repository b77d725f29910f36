// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/document/portable.rs
//
// Portable documents (PDF) rendered with poppler straight into pixel space.

use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use cairo::{Context, Format, ImageSurface};
use poppler::PopplerDocument;

use super::PageSource;
use crate::DocResult;
use crate::constant::POINT_TO_PIXEL;

/// Serves the pages of one PDF as PNG rasters at 200 DPI, so region
/// coordinates converted with [`POINT_TO_PIXEL`] line up with the image.
#[derive(Debug, Clone)]
pub struct PdfPageSource {
    path: PathBuf,
    page_count: u32,
}

impl PdfPageSource {
    /// Open a PDF and read its page count.
    pub fn open(path: &Path) -> DocResult<Self> {
        let document = PopplerDocument::new_from_file(path, None)
            .map_err(|e| anyhow::anyhow!("Failed to parse PDF: {e}"))?;

        let page_count = Self::checked_page_count(document.get_n_pages())?;

        Ok(Self {
            path: path.to_path_buf(),
            page_count,
        })
    }

    fn checked_page_count<N>(pages: N) -> DocResult<u32>
    where
        N: TryInto<u32> + Copy + std::fmt::Display,
    {
        match pages.try_into() {
            Ok(0) => Err(anyhow::anyhow!("PDF has no pages")),
            Ok(count) => Ok(count),
            Err(_) => Err(anyhow::anyhow!("Invalid page count {pages}")),
        }
    }

    /// Pixel size of a page rendered at `scale`; fractions truncate.
    #[allow(clippy::cast_possible_truncation)]
    fn scaled_size(page_width: f64, page_height: f64, scale: f64) -> (i32, i32) {
        ((page_width * scale) as i32, (page_height * scale) as i32)
    }

    fn page_from_url(url: &str) -> DocResult<u32> {
        let (_, page) = url
            .rsplit_once("#page=")
            .ok_or_else(|| anyhow::anyhow!("No page fragment in {url}"))?;
        page.parse()
            .with_context(|| format!("Bad page number in {url}"))
    }

    /// Render a page at the given scale and return it as PNG bytes.
    fn render_page_at_scale(path: &Path, page_index: u32, scale: f64) -> DocResult<Vec<u8>> {
        let document = PopplerDocument::new_from_file(path, None)
            .map_err(|e| anyhow::anyhow!("Failed to parse PDF: {e}"))?;
        let page = document
            .get_page(page_index as usize)
            .ok_or_else(|| anyhow::anyhow!("Failed to get page {page_index}"))?;

        let (page_width, page_height) = page.get_size();
        let (scaled_width, scaled_height) = Self::scaled_size(page_width, page_height, scale);

        let surface = ImageSurface::create(Format::ARgb32, scaled_width, scaled_height)
            .map_err(|e| anyhow::anyhow!("Failed to create Cairo surface: {e}"))?;
        let context = Context::new(&surface)
            .map_err(|e| anyhow::anyhow!("Failed to create Cairo context: {e}"))?;

        // Fill with white background.
        context.set_source_rgb(1.0, 1.0, 1.0);
        context
            .paint()
            .map_err(|e| anyhow::anyhow!("Failed to paint background: {e}"))?;
        context.scale(scale, scale);
        page.render(&context);

        drop(context);
        surface.flush();

        let mut png_data: Vec<u8> = Vec::new();
        surface
            .write_to_png(&mut png_data)
            .map_err(|e| anyhow::anyhow!("Failed to write PNG: {e}"))?;

        log::debug!(
            "Rendered page {page_index} of {} at {scaled_width}x{scaled_height}",
            path.display()
        );
        Ok(png_data)
    }
}

impl PageSource for PdfPageSource {
    fn page_url(&self, page: u32) -> String {
        format!("{}#page={page}", self.path.display())
    }

    fn fetch(&self, url: &str) -> impl Future<Output = DocResult<Vec<u8>>> + Send {
        let path = self.path.clone();
        let page = Self::page_from_url(url);
        let page_count = self.page_count;
        async move {
            let page = page?;
            if page >= page_count {
                anyhow::bail!("Page {page} out of range (0-{})", page_count - 1);
            }
            tokio::task::spawn_blocking(move || {
                Self::render_page_at_scale(&path, page, POINT_TO_PIXEL)
            })
            .await
            .context("PDF render task failed")?
        }
    }

    fn page_count(&self) -> Option<u32> {
        Some(self.page_count)
    }
}
