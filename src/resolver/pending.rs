//! In-flight document loads
//!
//! A [`PendingLoad`] owns the spawned task running a document's loader.
//! Awaiting it yields the loaded document. Dropping it before completion
//! aborts the task, so a navigation that is abandoned never applies its
//! result.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::task::JoinHandle;

use crate::content::{ContentDocument, RenderedDocument};
use crate::error::LoadError;

/// Handle to a document load running on the runtime
pub struct PendingLoad {
    slug: String,
    handle: JoinHandle<Result<RenderedDocument, LoadError>>,
}

impl PendingLoad {
    /// Start loading `doc` on a new task
    pub fn begin(doc: &ContentDocument) -> Self {
        let loader = doc.loader();
        let slug = doc.slug.clone();
        let task_slug = slug.clone();
        let handle = tokio::spawn(async move { loader.load(&task_slug).await });
        Self { slug, handle }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Whether the load has finished, successfully or not
    pub fn is_settled(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for PendingLoad {
    type Output = Result<RenderedDocument, LoadError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        match Pin::new(&mut this.handle).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) if e.is_panic() => {
                Poll::Ready(Err(LoadError::Panicked(this.slug.clone())))
            }
            Poll::Ready(Err(_)) => Poll::Ready(Err(LoadError::Cancelled(this.slug.clone()))),
        }
    }
}

impl Drop for PendingLoad {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            tracing::debug!(slug = %self.slug, "Discarding unfinished temp page load");
            self.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentRegistry, DocumentLoader, RenderContext, StaticLoader};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Loader that sleeps first and records whether it ran to completion
    struct SlowLoader {
        completed: Arc<AtomicBool>,
        delay: Duration,
    }

    #[async_trait]
    impl DocumentLoader for SlowLoader {
        async fn load(&self, slug: &str) -> Result<RenderedDocument, LoadError> {
            tokio::time::sleep(self.delay).await;
            self.completed.store(true, Ordering::SeqCst);
            RenderContext::default().render(slug, "slow")
        }
    }

    struct PanickingLoader;

    #[async_trait]
    impl DocumentLoader for PanickingLoader {
        async fn load(&self, _slug: &str) -> Result<RenderedDocument, LoadError> {
            panic!("loader exploded");
        }
    }

    fn single(key: &str, loader: Arc<dyn DocumentLoader>) -> ContentRegistry {
        ContentRegistry::from_entries(".mdx", [(key, loader)]).unwrap()
    }

    #[tokio::test]
    async fn test_pending_load_resolves() {
        let loader: Arc<dyn DocumentLoader> =
            Arc::new(StaticLoader::new("# Hi", Arc::new(RenderContext::default())));
        let registry = single("t/hi.mdx", loader);
        let doc = registry.documents().next().unwrap();

        let pending = PendingLoad::begin(doc);
        assert_eq!(pending.slug(), "hi");
        let rendered = pending.await.unwrap();
        assert!(rendered.html.contains("<h1>Hi</h1>"));
    }

    #[tokio::test]
    async fn test_dropping_pending_load_discards_result() {
        let completed = Arc::new(AtomicBool::new(false));
        let loader: Arc<dyn DocumentLoader> = Arc::new(SlowLoader {
            completed: Arc::clone(&completed),
            delay: Duration::from_millis(200),
        });
        let registry = single("t/slow.mdx", loader);
        let doc = registry.documents().next().unwrap();

        let pending = PendingLoad::begin(doc);
        assert!(!pending.is_settled());
        drop(pending);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panicking_loader_surfaces_error() {
        let registry = single("t/boom.mdx", Arc::new(PanickingLoader));
        let doc = registry.documents().next().unwrap();

        let err = PendingLoad::begin(doc).await.unwrap_err();
        assert!(matches!(err, LoadError::Panicked(ref slug) if slug == "boom"));
    }
}
