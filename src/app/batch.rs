// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/batch.rs
//
// Non-interactive session: open, load, commit. Used by the command line.

use std::sync::{Arc, Mutex};

use super::document::PageSource;
use super::interaction::NoCapture;
use super::message::EditorMessage;
use super::model::EditorModel;
use super::runtime::{EditorRuntime, confirm_fn};
use crate::DocResult;
use crate::config::EditorConfig;
use crate::domain::bbox::Region;
use crate::domain::document::operations::Composite;

/// Run a whole editor session without user input.
///
/// Opens on `regions` (points), loads `page` (or the page of the first
/// region), composes everything and commits. Returns what was committed.
pub async fn compose_session<S: PageSource + 'static>(
    source: S,
    config: EditorConfig,
    regions: &[Region],
    page: Option<u32>,
) -> DocResult<Composite> {
    let committed: Arc<Mutex<Option<(Vec<u8>, Vec<Region>)>>> = Arc::default();
    let sink = Arc::clone(&committed);
    let on_confirm = confirm_fn(move |png: Vec<u8>, regions: Vec<Region>| {
        let sink = Arc::clone(&sink);
        async move {
            let mut slot = sink
                .lock()
                .map_err(|_| anyhow::anyhow!("Commit slot poisoned"))?;
            *slot = Some((png, regions));
            Ok(())
        }
    });

    let model = EditorModel::open(config, regions, Box::new(NoCapture));
    let mut runtime = EditorRuntime::new(model, source, on_confirm, Box::new(|| {}));
    runtime.start();
    runtime.settle().await;

    if let Some(page) = page {
        runtime.dispatch(EditorMessage::GotoPage(page));
        runtime.settle().await;
    }
    check(&runtime)?;

    runtime.dispatch(EditorMessage::RequestCommit);
    runtime.settle().await;
    check(&runtime)?;
    let preview = runtime
        .model()
        .preview
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Nothing was composed"))?;

    runtime.dispatch(EditorMessage::ConfirmCommit);
    runtime.settle().await;
    check(&runtime)?;

    let (png, regions) = committed
        .lock()
        .map_err(|_| anyhow::anyhow!("Commit slot poisoned"))?
        .take()
        .ok_or_else(|| anyhow::anyhow!("Commit did not complete"))?;

    Ok(Composite {
        png,
        width: preview.width,
        height: preview.height,
        regions,
    })
}

fn check<S: PageSource + 'static>(runtime: &EditorRuntime<S>) -> DocResult<()> {
    match &runtime.model().error {
        Some(e) => Err(anyhow::anyhow!("{e}")),
        None => Ok(()),
    }
}
