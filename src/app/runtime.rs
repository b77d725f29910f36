// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/runtime.rs
//
// Async driver: runs effects on tokio and feeds their results back into
// the model as messages.

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::mpsc;

use super::document::{PageRequest, PageSource, load_page};
use super::message::{EditorMessage, Effect};
use super::model::EditorModel;
use super::update::update;
use crate::domain::bbox::Region;
use crate::domain::document::operations::{Composer, ImageBackend};

/// Commit callback: receives the PNG and the regions in point units.
pub type ConfirmFn =
    Arc<dyn Fn(Vec<u8>, Vec<Region>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Close callback, invoked once when the session ends.
pub type CloseFn = Box<dyn FnMut() + Send>;

/// Wrap an async closure as a [`ConfirmFn`].
pub fn confirm_fn<F, Fut>(f: F) -> ConfirmFn
where
    F: Fn(Vec<u8>, Vec<Region>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(
        move |png: Vec<u8>, regions: Vec<Region>| -> BoxFuture<'static, anyhow::Result<()>> {
            f(png, regions).boxed()
        },
    )
}

pub struct EditorRuntime<S: PageSource + 'static> {
    model: EditorModel,
    source: Arc<S>,
    composer: Arc<Composer>,
    on_confirm: ConfirmFn,
    on_close: CloseFn,
    tx: mpsc::UnboundedSender<EditorMessage>,
    rx: mpsc::UnboundedReceiver<EditorMessage>,
    pending: usize,
}

impl<S: PageSource + 'static> EditorRuntime<S> {
    pub fn new(mut model: EditorModel, source: S, on_confirm: ConfirmFn, on_close: CloseFn) -> Self {
        model.page_count = source.page_count();
        let composer = Composer::new(ImageBackend, model.config.composite_gap);
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            model,
            source: Arc::new(source),
            composer: Arc::new(composer),
            on_confirm,
            on_close,
            tx,
            rx,
            pending: 0,
        }
    }

    pub fn model(&self) -> &EditorModel {
        &self.model
    }

    /// Start loading the image of the current page.
    pub fn start(&mut self) {
        let page = self.model.current_page;
        self.run(Effect::LoadPage(page));
    }

    /// Apply a message and launch whatever work it asks for.
    pub fn dispatch(&mut self, message: EditorMessage) {
        let effect = update(&mut self.model, message);
        self.run(effect);
    }

    /// Wait for one background task and apply its result. Returns `false`
    /// when nothing is outstanding.
    pub async fn next(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(message) => {
                self.pending -= 1;
                self.dispatch(message);
                true
            }
            None => false,
        }
    }

    /// Drain all outstanding work, including work it triggers.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::LoadPage(page) => {
                let request = PageRequest::for_page(self.source.as_ref(), page);
                self.model.begin_load(&request);
                let source = Arc::clone(&self.source);
                self.spawn(async move {
                    let result = load_page(source.as_ref(), &request)
                        .await
                        .map(Arc::new)
                        .map_err(|e| format!("{e:#}"));
                    EditorMessage::PageLoaded {
                        url: request.url,
                        result,
                    }
                });
            }
            Effect::Compose { image, regions } => {
                let composer = Arc::clone(&self.composer);
                self.spawn(async move {
                    let result =
                        tokio::task::spawn_blocking(move || composer.compose(&image.image, &regions))
                            .await
                            .map_err(|e| format!("Compose task failed: {e}"))
                            .and_then(|r| r.map(Arc::new).map_err(|e| format!("{e:#}")));
                    EditorMessage::Composed(result)
                });
            }
            Effect::Commit(composite) => {
                let commit = (self.on_confirm)(composite.png.clone(), composite.regions.clone());
                self.spawn(async move {
                    EditorMessage::CommitFinished(commit.await.map_err(|e| format!("{e:#}")))
                });
            }
            Effect::Close => (self.on_close)(),
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = EditorMessage> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.pending += 1;
        tokio::spawn(async move {
            // The receiver lives as long as the runtime.
            let _ = tx.send(task.await);
        });
    }
}
