//! Embedded code highlighting core
//!
//! Finds fenced code blocks and `` `{lang} code` `` spans in a markdown
//! document's syntax tree, asks a [`Highlighter`] for tokens and keeps a
//! per-view set of [`StyleAnnotation`]s in sync with the document.
//!
//! - [`walker`]: tree walk → ordered region descriptors and removals
//! - [`builder`]: tokens → styled annotations tiling a region
//! - [`store`]: the annotation set, non-overlapping and edit-mapped
//! - [`controller`]: update cycles tying it all together

pub mod annotation;
pub mod builder;
pub mod controller;
pub mod host;
pub mod region;
pub mod store;
pub mod walker;

pub use annotation::{AnnotationPayload, StyleAnnotation};
pub use controller::{CycleReport, UpdateController, UpdateCycle};
pub use host::{AnnotationSink, EditorView, Highlighter, UpdateEvent};
pub use region::{classify, NodeClass, RegionDescriptor, RegionKind, WalkItem};
pub use store::{AnnotationStore, ApplyOutcome};
pub use walker::{walk, WalkOptions};
