// Image Preloading
// Turns a callback-based image loader into a single awaitable result

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::{Error, Result};

/// Options forwarded to the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreloadOptions {
    /// Also wait for CSS background images
    pub background: bool,
}

impl Default for PreloadOptions {
    fn default() -> Self {
        Self { background: true }
    }
}

/// Outcome for one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStatus {
    pub src: String,
    pub loaded: bool,
}

/// Completion notice: every located image has finished, successfully or not
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadEvent {
    pub images: Vec<ImageStatus>,
}

impl LoadEvent {
    pub fn loaded_count(&self) -> usize {
        self.images.iter().filter(|image| image.loaded).count()
    }

    /// True when at least one image failed to load
    pub fn has_broken(&self) -> bool {
        self.images.iter().any(|image| !image.loaded)
    }
}

/// Completion callback handed to the loader
pub type OnLoaded = Box<dyn FnOnce(LoadEvent) + Send + 'static>;

/// Image loading library: locates images by selector and calls `on_done`
/// once all of them have settled.
pub trait ImageLoader {
    fn load(&self, selector: &str, options: &PreloadOptions, on_done: OnLoaded);
}

/// Wait for every image matched by `selector` using default options
pub async fn preload_images<L>(loader: &L, selector: &str) -> Result<LoadEvent>
where
    L: ImageLoader + ?Sized,
{
    preload_images_with(loader, selector, &PreloadOptions::default()).await
}

/// Wait for every image matched by `selector`.
///
/// Resolves exactly once, when the loader fires its callback. There is no
/// timeout; wrap the future (e.g. `tokio::time::timeout`) if one is needed.
pub async fn preload_images_with<L>(
    loader: &L,
    selector: &str,
    options: &PreloadOptions,
) -> Result<LoadEvent>
where
    L: ImageLoader + ?Sized,
{
    if selector.trim().is_empty() {
        return Err(Error::InvalidArgument("selector must not be empty".to_string()));
    }

    let (tx, rx) = oneshot::channel();
    loader.load(
        selector,
        options,
        Box::new(move |event| {
            // The receiver may already be gone if the caller dropped the future
            let _ = tx.send(event);
        }),
    );

    rx.await.map_err(|_| Error::PreloadAborted)
}

/// A loader bundled with its options
#[derive(Debug, Clone, Default)]
pub struct Preloader<L> {
    loader: L,
    options: PreloadOptions,
}

impl<L: ImageLoader> Preloader<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            options: PreloadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PreloadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub async fn preload_images(&self, selector: &str) -> Result<LoadEvent> {
        preload_images_with(&self.loader, selector, &self.options).await
    }
}
