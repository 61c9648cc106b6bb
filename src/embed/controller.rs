//! Update cycles: walk, build, apply, publish
//!
//! ```text
//! update(view, event)
//!   ├─ Edit: map store through the change set, publish
//!   ├─ walk tree → Vec<WalkItem>           (synchronous, may fail)
//!   └─ UpdateCycle future
//!        for each item, in order:
//!          Removal → remove_in_range
//!          Region  → build (await) → remap if edits landed → remove + add
//!          publish
//!        measure (refresh only)
//! ```
//!
//! Cycles never block each other. Several may be in flight on the same
//! thread; each region update is atomic with respect to the others because
//! the store is only touched between awaits.

use std::cell::{Cell, Ref, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use serde::Serialize;
use tracing::Instrument;

use super::builder::build_region;
use super::host::{AnnotationSink, EditorView, Highlighter, UpdateEvent};
use super::region::WalkItem;
use super::store::{AnnotationStore, ApplyOutcome};
use super::walker::{walk, WalkOptions};
use crate::config::HighlightConfig;
use crate::error::HostError;

/// What one cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub regions_built: usize,
    pub regions_failed: usize,
    /// Results discarded because their text went away before they landed
    pub regions_stale: usize,
    pub removals: usize,
    pub annotations_added: usize,
}

/// A started update cycle. Poll it (or spawn it on a `LocalSet`) to build
/// and apply the regions found by the walk.
#[must_use = "an update cycle does nothing unless polled"]
pub struct UpdateCycle {
    inner: Pin<Box<dyn Future<Output = CycleReport>>>,
}

impl Future for UpdateCycle {
    type Output = CycleReport;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<CycleReport> {
        self.inner.as_mut().poll(cx)
    }
}

/// Per-view controller owning the annotation store
pub struct UpdateController<H, S> {
    highlighter: Rc<H>,
    sink: Rc<RefCell<S>>,
    store: Rc<RefCell<AnnotationStore>>,
    config: HighlightConfig,
    next_cycle: Cell<u64>,
}

impl<H, S> UpdateController<H, S>
where
    H: Highlighter + 'static,
    S: AnnotationSink + 'static,
{
    pub fn new(highlighter: H, sink: S, config: HighlightConfig) -> Self {
        Self {
            highlighter: Rc::new(highlighter),
            sink: Rc::new(RefCell::new(sink)),
            store: Rc::new(RefCell::new(AnnotationStore::new())),
            config,
            next_cycle: Cell::new(0),
        }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// New settings take effect on the next cycle; call `refresh` to apply
    /// them to the whole document.
    pub fn set_config(&mut self, config: HighlightConfig) {
        self.config = config;
    }

    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    pub fn sink(&self) -> Ref<'_, S> {
        self.sink.borrow()
    }

    pub fn store(&self) -> Ref<'_, AnnotationStore> {
        self.store.borrow()
    }

    /// Copy of the current annotation set
    pub fn annotations(&self) -> Vec<super::StyleAnnotation> {
        self.store.borrow().annotations().to_vec()
    }

    /// React to an editor update.
    ///
    /// The walk happens now; region building happens when the returned
    /// cycle is polled.
    pub fn update<V: EditorView + ?Sized>(
        &self,
        view: &V,
        event: UpdateEvent,
    ) -> Result<UpdateCycle, HostError> {
        if let UpdateEvent::Edit(changes) = &event {
            self.store.borrow_mut().map_changes(changes);
            self.publish();
        }
        self.start(view, event.is_doc_change(), false)
    }

    /// Re-walk the whole document as if it changed, then ask for a measure
    pub fn refresh<V: EditorView + ?Sized>(&self, view: &V) -> Result<UpdateCycle, HostError> {
        self.start(view, true, true)
    }

    /// Discard all annotations
    pub fn destroy(&self) {
        self.store.borrow_mut().clear();
        self.publish();
        tracing::debug!("annotation store cleared");
    }

    fn publish(&self) {
        let store = self.store.borrow();
        self.sink.borrow_mut().publish(store.annotations());
    }

    fn start<V: EditorView + ?Sized>(
        &self,
        view: &V,
        doc_changed: bool,
        measure: bool,
    ) -> Result<UpdateCycle, HostError> {
        let id = self.next_cycle.get();
        self.next_cycle.set(id + 1);

        let options = WalkOptions {
            doc_changed,
            inline_highlighting: self.config.inline_highlighting,
        };
        let items = walk(view, options).inspect_err(|e| {
            tracing::error!(cycle = id, error = %e, "tree walk failed");
        })?;
        let epoch = self.store.borrow().epoch();
        tracing::debug!(cycle = id, items = items.len(), epoch, doc_changed, "cycle started");

        let run = Cycle {
            highlighter: Rc::clone(&self.highlighter),
            sink: Rc::clone(&self.sink),
            store: Rc::clone(&self.store),
            items,
            epoch,
            measure,
        };
        Ok(UpdateCycle {
            inner: Box::pin(run.run().instrument(tracing::debug_span!("update_cycle", id))),
        })
    }
}

/// State moved into a cycle's future
struct Cycle<H, S> {
    highlighter: Rc<H>,
    sink: Rc<RefCell<S>>,
    store: Rc<RefCell<AnnotationStore>>,
    items: Vec<WalkItem>,
    /// Store epoch at walk time
    epoch: u64,
    measure: bool,
}

impl<H: Highlighter, S: AnnotationSink> Cycle<H, S> {
    async fn run(self) -> CycleReport {
        let mut report = CycleReport::default();

        for item in &self.items {
            match item {
                WalkItem::Removal { from, to } => {
                    if self.apply(&mut report, *from, *to, Vec::new()) {
                        report.removals += 1;
                    }
                }
                WalkItem::Region(region) => {
                    let annotations = match build_region(&*self.highlighter, region).await {
                        Ok(annotations) => {
                            report.regions_built += 1;
                            annotations
                        }
                        Err(e) => {
                            tracing::warn!(
                                language = %region.language,
                                from = region.from,
                                to = region.to,
                                "failed to highlight region: {e:#}"
                            );
                            report.regions_failed += 1;
                            Vec::new()
                        }
                    };
                    self.apply(&mut report, region.from, region.to, annotations);
                }
            }
        }

        if self.measure {
            self.sink.borrow_mut().request_measure();
        }
        tracing::debug!(?report, "cycle finished");
        report
    }

    /// Replace `[from, to)` with `annotations`; false if the result was stale
    fn apply(
        &self,
        report: &mut CycleReport,
        from: usize,
        to: usize,
        annotations: Vec<super::StyleAnnotation>,
    ) -> bool {
        let outcome = self
            .store
            .borrow_mut()
            .apply_region(self.epoch, from, to, annotations);
        match outcome {
            ApplyOutcome::Applied { removed, added } => {
                report.annotations_added += added;
                if removed + added > 0 {
                    let store = self.store.borrow();
                    self.sink.borrow_mut().publish(store.annotations());
                }
                true
            }
            ApplyOutcome::Stale => {
                tracing::debug!(from, to, epoch = self.epoch, "dropping stale result");
                report.regions_stale += 1;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::StyleAnnotation;
    use crate::model::Document;
    use crate::syntax::{HighlightToken, TokenLines, TokenStyle};
    use async_trait::async_trait;

    struct OneToken;

    #[async_trait(?Send)]
    impl Highlighter for OneToken {
        async fn highlight_tokens(
            &self,
            _content: &str,
            _language: &str,
        ) -> anyhow::Result<Option<TokenLines>> {
            Ok(Some(TokenLines::new(vec![vec![HighlightToken::new(0, "x")]])))
        }

        fn token_style(&self, _token: &HighlightToken) -> TokenStyle {
            TokenStyle::default()
        }
    }

    #[derive(Default)]
    struct Counts {
        publishes: usize,
        measures: usize,
        last: Vec<StyleAnnotation>,
    }

    impl AnnotationSink for Counts {
        fn publish(&mut self, annotations: &[StyleAnnotation]) {
            self.publishes += 1;
            self.last = annotations.to_vec();
        }

        fn request_measure(&mut self) {
            self.measures += 1;
        }
    }

    #[tokio::test]
    async fn test_refresh_measures_once() {
        let doc = Document::with_text("```rust\nlet x = 1;\n```\n");
        let controller = UpdateController::new(OneToken, Counts::default(), HighlightConfig::default());

        let report = controller.refresh(&doc).unwrap().await;
        assert_eq!(report.regions_built, 1);
        assert_eq!(controller.sink().measures, 1);
        assert_eq!(controller.sink().last, controller.annotations());
    }

    #[tokio::test]
    async fn test_selection_update_does_not_measure() {
        let doc = Document::with_text("`{js} 1`");
        let controller = UpdateController::new(OneToken, Counts::default(), HighlightConfig::default());

        controller.update(&doc, UpdateEvent::Selection).unwrap().await;
        assert_eq!(controller.sink().measures, 0);
        assert!(controller.sink().publishes > 0);
    }

    #[tokio::test]
    async fn test_destroy_publishes_empty() {
        let doc = Document::with_text("`{js} 1`");
        let controller = UpdateController::new(OneToken, Counts::default(), HighlightConfig::default());
        controller.refresh(&doc).unwrap().await;
        assert!(!controller.annotations().is_empty());

        controller.destroy();
        assert!(controller.annotations().is_empty());
        assert!(controller.sink().last.is_empty());
    }
}
