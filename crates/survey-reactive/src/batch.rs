#![forbid(unsafe_code)]

//! Batched property notification.
//!
//! Committing a drag moves an element, rebuilds the rows and repairs the
//! line-break flags of its neighbours. Inside a [`BatchScope`] all of those
//! writes land immediately, but each touched property notifies its handlers
//! a single time, with its final value, when the outermost scope closes.
//!
//! Dirty properties flush in the order they were first written. A handler
//! that writes during the flush notifies immediately, because the scope is
//! already closed by then.
//!
//! # Failure Modes
//!
//! - **Panicking handler during flush**: the panic propagates and the
//!   properties queued after it are not notified.
//! - **Scope dropped while unwinding**: pending notifications are discarded.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info_span};
use web_time::Instant;

/// A property with handlers waiting on the open batch.
pub(crate) trait Pending {
    fn property(&self) -> &'static str;
    fn flush(&self);
}

struct Batch {
    depth: u32,
    dirty: Vec<(usize, Rc<dyn Pending>)>,
    writes: u64,
}

thread_local! {
    static BATCH: RefCell<Option<Batch>> = const { RefCell::new(None) };
}

/// True while a batch scope is open on this thread.
pub fn is_batching() -> bool {
    BATCH.with(|slot| slot.borrow().is_some())
}

/// Queue `property` on the open batch. Returns `false` when no batch is
/// open and the caller must notify itself.
pub(crate) fn mark_dirty(property: Rc<dyn Pending>) -> bool {
    BATCH.with(|slot| {
        let mut slot = slot.borrow_mut();
        let Some(batch) = slot.as_mut() else {
            return false;
        };
        batch.writes += 1;
        let key = Rc::as_ptr(&property).cast::<()>() as usize;
        if !batch.dirty.iter().any(|(queued, _)| *queued == key) {
            batch.dirty.push((key, property));
        }
        true
    })
}

fn flush(batch: Batch) {
    if batch.dirty.is_empty() {
        return;
    }

    let properties = batch.dirty.len() as u64;
    let writes = batch.writes;
    let started = Instant::now();
    let span = info_span!(
        "survey.reactive.flush",
        properties,
        writes,
        duration_us = tracing::field::Empty
    );
    let _entered = span.enter();

    for (_, property) in &batch.dirty {
        tracing::trace!(target: "survey::reactive", property = property.property(), "flushing");
        property.flush();
    }

    let duration_us = started.elapsed().as_micros() as u64;
    span.record("duration_us", duration_us);
    debug!(
        target: "survey::reactive",
        properties,
        writes,
        duration_us,
        "batch flushed"
    );
}

/// Guard holding a batch open.
///
/// Scopes nest; only the outermost one flushes.
pub struct BatchScope {
    outermost: bool,
}

impl BatchScope {
    #[must_use]
    pub fn new() -> Self {
        let outermost = BATCH.with(|slot| {
            let mut slot = slot.borrow_mut();
            match slot.as_mut() {
                Some(batch) => {
                    batch.depth += 1;
                    false
                }
                None => {
                    *slot = Some(Batch {
                        depth: 1,
                        dirty: Vec::new(),
                        writes: 0,
                    });
                    true
                }
            }
        });
        Self { outermost }
    }

    /// Properties waiting to notify.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        BATCH.with(|slot| slot.borrow().as_ref().map_or(0, |b| b.dirty.len()))
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let closed = BATCH.with(|slot| {
            let mut slot = slot.borrow_mut();
            let batch = slot.as_mut()?;
            batch.depth -= 1;
            if batch.depth == 0 { slot.take() } else { None }
        });

        match closed {
            Some(batch) if std::thread::panicking() => {
                debug!(
                    target: "survey::reactive",
                    properties = batch.dirty.len() as u64,
                    "batch discarded during unwind"
                );
            }
            Some(batch) => flush(batch),
            None => {}
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("outermost", &self.outermost)
            .field("pending", &self.pending_count())
            .finish()
    }
}
