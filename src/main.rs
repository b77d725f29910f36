// SPDX-License-Identifier: GPL-3.0-or-later
// src/main.rs
//
// Command line entry point.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use pagecrop::app::{DirectoryPageSource, compose_session};
use pagecrop::config::EditorConfig;
use pagecrop::constant::{PIXEL_TO_POINT, POINT_TO_PIXEL};
use pagecrop::domain::bbox::{Region, to_pixels, to_points};

#[derive(Parser, Debug, Clone)]
#[command(name = "pagecrop", version, about = "Crop and stack regions of scanned pages")]
pub struct Args {
    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file (defaults to the user config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Crop regions out of a page image and write the stacked PNG.
    Compose {
        /// Directory with one image per page.
        #[arg(long)]
        pages: Option<PathBuf>,

        /// Render pages from this PDF instead.
        #[cfg(feature = "portable")]
        #[arg(long, conflicts_with = "pages")]
        pdf: Option<PathBuf>,

        /// Region list in point units (JSON array).
        #[arg(long)]
        regions: PathBuf,

        /// Page to crop from (defaults to the page of the first region).
        #[arg(long)]
        page: Option<u32>,

        /// Output PNG.
        #[arg(long)]
        out: PathBuf,

        /// Where to write the region list as persisted (points).
        #[arg(long)]
        out_regions: Option<PathBuf>,
    },
    /// Print a point-space region list converted to pixels.
    ToPixels { regions: PathBuf },
    /// Print a pixel-space region list converted to points.
    ToPoints { regions: PathBuf },
}

fn read_regions(path: &Path) -> anyhow::Result<Vec<Region>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read regions {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid region list {}", path.display()))
}

fn print_regions(regions: &[Region]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(regions)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = EditorConfig::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Compose {
            pages,
            #[cfg(feature = "portable")]
            pdf,
            regions,
            page,
            out,
            out_regions,
        } => {
            let input = read_regions(&regions)?;

            #[cfg(feature = "portable")]
            let composite = if let Some(pdf) = pdf {
                let source = pagecrop::app::document::portable::PdfPageSource::open(&pdf)?;
                compose_session(source, config, &input, page).await?
            } else {
                let dir = pages.context("--pages or --pdf is required")?;
                compose_session(DirectoryPageSource::new(dir, &config), config, &input, page)
                    .await?
            };

            #[cfg(not(feature = "portable"))]
            let composite = {
                let dir = pages.context("--pages is required")?;
                compose_session(DirectoryPageSource::new(dir, &config), config, &input, page)
                    .await?
            };

            tokio::fs::write(&out, &composite.png)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            log::info!(
                "Wrote {}x{} composite to {}",
                composite.width,
                composite.height,
                out.display()
            );

            match out_regions {
                Some(path) => {
                    let json = serde_json::to_string_pretty(&composite.regions)?;
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
                None => print_regions(&composite.regions)?,
            }
        }
        Command::ToPixels { regions } => {
            let converted: Vec<Region> = read_regions(&regions)?
                .iter()
                .map(|r| to_pixels(r, POINT_TO_PIXEL))
                .collect();
            print_regions(&converted)?;
        }
        Command::ToPoints { regions } => {
            let converted: Vec<Region> = read_regions(&regions)?
                .iter()
                .map(|r| to_points(r, PIXEL_TO_POINT))
                .collect();
            print_regions(&converted)?;
        }
    }

    Ok(())
}
