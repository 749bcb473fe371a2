#![forbid(unsafe_code)]

//! Reactive property primitives for the survey model.
//!
//! Survey objects expose their mutable state (answers, ranked choices, lazily
//! loaded choice windows, layout revisions) as [`Observable`] values so that
//! views and dependent properties can react to changes. [`BatchScope`] groups
//! several writes into one notification pass.

pub mod batch;
pub mod observable;

pub use batch::BatchScope;
pub use observable::{Observable, Subscription};
