//! The per-view annotation set
//!
//! Kept sorted by range and free of overlaps: every region update removes
//! what intersects it before adding. The store also keeps a short history of
//! the edits it was mapped through so that a cycle walked before an edit can
//! still place its results at the right offsets.

use std::collections::VecDeque;

use super::annotation::StyleAnnotation;
use crate::model::ChangeSet;

/// Edits remembered for remapping late results
pub const HISTORY_LIMIT: usize = 64;

/// Result of applying one region's annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { removed: usize, added: usize },
    /// The region's text was deleted, or the history no longer reaches back
    Stale,
}

#[derive(Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<StyleAnnotation>,
    /// Bumped for every edit mapped through the store
    epoch: u64,
    /// `(epoch after the edit, edit)`, oldest first
    history: VecDeque<(u64, ChangeSet)>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current annotations, sorted by `(from, to)`
    pub fn annotations(&self) -> &[StyleAnnotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Drop every annotation intersecting `[from, to)`; returns how many
    pub fn remove_in_range(&mut self, from: usize, to: usize) -> usize {
        let before = self.annotations.len();
        self.annotations.retain(|a| !a.intersects(from, to));
        before - self.annotations.len()
    }

    /// Insert `annotations` unless something already intersects `[from, to)`.
    ///
    /// Returns the number inserted.
    pub fn add_if_absent(
        &mut self,
        from: usize,
        to: usize,
        annotations: Vec<StyleAnnotation>,
    ) -> usize {
        if annotations.is_empty() || self.annotations.iter().any(|a| a.intersects(from, to)) {
            return 0;
        }
        let added = annotations.len();
        self.annotations.extend(annotations);
        self.annotations.sort_by_key(|a| (a.from, a.to));
        added
    }

    /// Carry every annotation over an edit, dropping deleted ones
    pub fn map_changes(&mut self, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }
        let before = self.annotations.len();
        self.annotations = self
            .annotations
            .iter()
            .filter_map(|a| a.map(changes))
            .collect();

        self.epoch += 1;
        self.history.push_back((self.epoch, changes.clone()));
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
        tracing::trace!(
            epoch = self.epoch,
            dropped = before - self.annotations.len(),
            "mapped annotations through edit"
        );
    }

    /// Map `[from, to)` taken at `epoch` into current coordinates
    pub fn map_since(&self, epoch: u64, from: usize, to: usize) -> Option<(usize, usize)> {
        if epoch == self.epoch {
            return Some((from, to));
        }
        if epoch > self.epoch {
            return None;
        }
        // History must hold every edit after `epoch`
        let (oldest, _) = self.history.front()?;
        if *oldest > epoch + 1 {
            return None;
        }
        self.history
            .iter()
            .filter(|(e, _)| *e > epoch)
            .try_fold((from, to), |(from, to), (_, changes)| {
                changes.map_range(from, to)
            })
    }

    /// Replace whatever covers a region with freshly built annotations.
    ///
    /// `from`, `to` and the annotations are in the coordinates of `epoch`.
    pub fn apply_region(
        &mut self,
        epoch: u64,
        from: usize,
        to: usize,
        annotations: Vec<StyleAnnotation>,
    ) -> ApplyOutcome {
        let Some((new_from, new_to)) = self.map_since(epoch, from, to) else {
            return ApplyOutcome::Stale;
        };
        let annotations = if epoch == self.epoch {
            annotations
        } else {
            annotations
                .into_iter()
                .filter_map(|a| {
                    let (from, to) = self.map_since(epoch, a.from, a.to)?;
                    Some(StyleAnnotation { from, to, ..a })
                })
                .collect()
        };

        let removed = self.remove_in_range(new_from, new_to);
        let added = self.add_if_absent(new_from, new_to, annotations);
        ApplyOutcome::Applied { removed, added }
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    /// True if two annotations overlap
    pub fn has_overlaps(&self) -> bool {
        self.annotations
            .windows(2)
            .any(|pair| pair[1].from < pair[0].to)
    }
}
