//! Position mapping across document edits
//!
//! A [`ChangeSet`] records the replacements made by one edit, expressed in the
//! coordinates of the document *before* the edit. Stored ranges are carried
//! over an edit by mapping their endpoints through it.

/// Which side of an insertion a mapped position sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// Stay to the left of inserted text
    Before,
    /// Move to the right of inserted text
    After,
}

/// A single replacement: `[from, to)` of the old document replaced by
/// `inserted` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub from: usize,
    pub to: usize,
    pub inserted: usize,
}

impl Replacement {
    /// Number of characters removed from the old document
    #[inline]
    pub fn deleted(&self) -> usize {
        self.to - self.from
    }

    fn delta(&self) -> isize {
        self.inserted as isize - self.deleted() as isize
    }
}

/// Ordered, non-overlapping replacements describing one edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    replacements: Vec<Replacement>,
}

impl ChangeSet {
    /// A change set that changes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single replacement of `[from, to)` by `inserted` characters
    pub fn replace(from: usize, to: usize, inserted: usize) -> Self {
        Self::from_replacements(vec![Replacement { from, to, inserted }])
    }

    /// Insertion of `len` characters at `at`
    pub fn insert(at: usize, len: usize) -> Self {
        Self::replace(at, at, len)
    }

    /// Deletion of `[from, to)`
    pub fn delete(from: usize, to: usize) -> Self {
        Self::replace(from, to, 0)
    }

    /// Build from replacements given in old-document coordinates.
    ///
    /// Replacements are sorted; touching or overlapping ones are merged into
    /// one so every old position belongs to at most one replacement.
    pub fn from_replacements(mut replacements: Vec<Replacement>) -> Self {
        replacements.retain(|r| r.from < r.to || r.inserted > 0);
        replacements.sort_by_key(|r| (r.from, r.to));

        let mut merged: Vec<Replacement> = Vec::with_capacity(replacements.len());
        for r in replacements {
            match merged.last_mut() {
                Some(last) if r.from <= last.to => {
                    last.to = last.to.max(r.to);
                    last.inserted += r.inserted;
                }
                _ => merged.push(r),
            }
        }

        Self {
            replacements: merged,
        }
    }

    /// True when the edit changed nothing
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    pub fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    /// Net change in document length
    pub fn len_delta(&self) -> isize {
        self.replacements.iter().map(Replacement::delta).sum()
    }

    /// Map an old-document position into the new document.
    ///
    /// Positions inside (or on the boundary of) a replaced range land on the
    /// side of the inserted text selected by `assoc`.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut delta: isize = 0;
        for r in &self.replacements {
            if pos < r.from {
                break;
            }
            if pos > r.to {
                delta += r.delta();
                continue;
            }
            let start = (r.from as isize + delta) as usize;
            return match assoc {
                Assoc::Before => start,
                Assoc::After => start + r.inserted,
            };
        }
        (pos as isize + delta) as usize
    }

    /// Map a half-open range so that it never grows over text inserted at
    /// its boundaries. Returns `None` when the range was deleted.
    pub fn map_range(&self, from: usize, to: usize) -> Option<(usize, usize)> {
        let new_from = self.map_pos(from, Assoc::After);
        let new_to = self.map_pos(to, Assoc::Before);
        (new_from < new_to).then_some((new_from, new_to))
    }
}
