//! Identity for rendering layers which reserve texture units.
//!
//! The pool never owns a layer, it only needs a stable way to tell two
//! live layers apart. Identity is an opaque id rather than the layer's
//! name, because two layers may legitimately share a name.

use std::sync::atomic::{AtomicU64, Ordering};

/// A stable, process-unique identifier for a rendering layer.
///
/// Ids are never reused within a process, so a dropped layer's id cannot
/// be mistaken for a newer layer's.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl LayerId {
    /// Allocate the next unique id.
    pub fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Implemented by rendering layers so the texture unit pool can scope
/// reservations to them.
pub trait Layer {
    /// The layer's stable identity. Two live layers must never share one.
    fn id(&self) -> LayerId;

    /// The layer's name. Used only for informational log statements.
    fn name(&self) -> &str;
}
