#![forbid(unsafe_code)]

//! Drag-and-drop controllers.
//!
//! Two controllers share the gesture protocol below:
//!
//! - [`page`]: moves questions and panels between rows and panels of a page.
//! - [`ranking`]: reorders the choices of a ranking question and moves them
//!   between the ranked list and the unranked pool.
//!
//! # Invariants
//!
//! 1. A gesture is exactly one start, zero or more moves, then exactly one
//!    finish (or cancel).
//! 2. Starting a gesture while one is active on the same page or question
//!    fails (`SessionActive` for pages, `GestureActive` for rankings) and
//!    leaves the active gesture untouched.
//! 3. Gesture state never outlives its finish, cancelled or not.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | Move onto an invalid destination | dropping onto itself or into its own subtree | move reports `false`, target evicted from its preview row |
//! | Host veto | allow hook sets `allow = false` | same as an invalid destination |
//! | Finish without a gesture | stale pointer event | returns `None`, nothing changes |

pub mod allow;
pub mod info;
pub mod page;
pub mod ranking;

pub use allow::{DragDropAllowEvent, DragDropAllowHook};
pub use info::DragDropInfo;
pub use ranking::{
    DragOverNode, DropTargetNode, MoveDirection, RankingArea, RankingDragDrop, RankingDropTarget,
};
