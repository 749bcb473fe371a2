#![forbid(unsafe_code)]

//! Named, versioned survey properties.
//!
//! Every mutable piece of survey state (an answer, the ranked choices, the
//! loaded choice window, the layout revision) lives in an [`Observable`].
//! A property carries the name hosts know it by in survey JSON (`"value"`,
//! `"rankingChoices"`), and that name is what change logs report.
//!
//! Writes outside a [`BatchScope`](crate::BatchScope) notify handlers at
//! once. Inside a scope the property is only marked dirty; it notifies once,
//! with its final value, when the outermost scope closes.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug_span, trace};

use crate::batch::{self, Pending};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Property<T> {
    name: &'static str,
    value: RefCell<T>,
    version: Cell<u64>,
    handlers: RefCell<Vec<(u64, Handler<T>)>>,
    next_handler: Cell<u64>,
}

impl<T: Clone + 'static> Property<T> {
    fn notify(&self) {
        // Handlers may subscribe, unsubscribe or write while they run.
        let handlers: Vec<Handler<T>> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        if handlers.is_empty() {
            return;
        }
        let value = self.value.borrow().clone();
        let _span = debug_span!(
            "survey.reactive.notify",
            property = self.name,
            version = self.version.get(),
            handlers = handlers.len() as u64
        )
        .entered();
        for handler in &handlers {
            handler(&value);
        }
    }
}

impl<T: Clone + 'static> Pending for Property<T> {
    fn property(&self) -> &'static str {
        self.name
    }

    fn flush(&self) {
        self.notify();
    }
}

trait Detach {
    fn detach(&self, handler: u64);
}

impl<T> Detach for Property<T> {
    fn detach(&self, handler: u64) {
        self.handlers.borrow_mut().retain(|(id, _)| *id != handler);
    }
}

/// A named property value with a change counter and change handlers.
///
/// Cloning yields another handle to the **same** property.
///
/// # Invariants
///
/// 1. `version` grows by exactly 1 per value-changing write.
/// 2. Writing an equal value does nothing.
/// 3. Handlers run in subscription order.
pub struct Observable<T> {
    cell: Rc<Property<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("name", &self.cell.name)
            .field("value", &*self.cell.value.borrow())
            .field("version", &self.cell.version.get())
            .field("handlers", &self.cell.handlers.borrow().len())
            .finish()
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Anonymous property at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::named("", value)
    }

    /// Property reported as `name` in change logs.
    #[must_use]
    pub fn named(name: &'static str, value: T) -> Self {
        Self {
            cell: Rc::new(Property {
                name,
                value: RefCell::new(value),
                version: Cell::new(0),
                handlers: RefCell::new(Vec::new()),
                next_handler: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.cell.name
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.value.borrow())
    }

    pub fn set(&self, value: T) {
        {
            let mut current = self.cell.value.borrow_mut();
            if *current == value {
                return;
            }
            *current = value;
        }
        self.changed();
    }

    /// Edit the value in place. Counts as a change only if the result
    /// differs from the value `f` started with.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut current = self.cell.value.borrow_mut();
            let before = current.clone();
            f(&mut current);
            *current != before
        };
        if changed {
            self.changed();
        }
    }

    /// Register a change handler. Dropping the returned guard removes it.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let id = self.cell.next_handler.get();
        self.cell.next_handler.set(id + 1);
        self.cell
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));
        let owner: Rc<dyn Detach> = self.cell.clone();
        Subscription {
            owner: Rc::downgrade(&owner),
            id,
        }
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.cell.version.get()
    }

    /// Live handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.cell.handlers.borrow().len()
    }

    /// True when both handles point at the same property.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    fn changed(&self) {
        let version = self.cell.version.get() + 1;
        self.cell.version.set(version);
        trace!(
            target: "survey::reactive",
            property = self.cell.name,
            version,
            "property changed"
        );
        if self.cell.handlers.borrow().is_empty() {
            return;
        }
        let pending: Rc<dyn Pending> = self.cell.clone();
        if !batch::mark_dirty(pending) {
            self.cell.notify();
        }
    }
}

/// Guard keeping a change handler registered.
pub struct Subscription {
    owner: Weak<dyn Detach>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &(self.owner.strong_count() > 0))
            .finish()
    }
}
