//! # Undertow
//!
//! > *"The current that pulls back"*
//!
//! A Rust library for scoped resource stacks: push acquisitions in order,
//! unwind releases in strict reverse order, and keep every failure.
//!
//! ## Philosophy
//!
//! Nested acquisition blocks get release ordering right but bury the logic
//! three indents deep. **Undertow** flattens them into one stack with the
//! same guarantees:
//!
//! - releases always run in reverse push order (LIFO);
//! - a failed acquisition never disturbs what was already recorded;
//! - a failed release never stops the releases beneath it;
//! - every failure survives, aggregated in order, with the body's own
//!   failure kept primary.
//!
//! ## Quick Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use undertow::ResourceStack;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let (a, b) = (log.clone(), log.clone());
//!
//! let mut stack = ResourceStack::<&str, String>::new();
//! stack.attach("database", move |name| {
//!     a.borrow_mut().push(name);
//!     Ok(())
//! }).unwrap();
//! stack.attach("tempfile", move |name| {
//!     b.borrow_mut().push(name);
//!     Ok(())
//! }).unwrap();
//!
//! assert_eq!(stack.len(), 2);
//! assert_eq!(stack[0], "database");
//!
//! stack.unwind().unwrap();
//! assert_eq!(*log.borrow(), ["tempfile", "database"]);
//! ```
//!
//! Resources plug in through a small capability set - enter/exit pairs
//! ([`Scoped`]), acquire/release pairs ([`Acquire`]), close-only handles
//! ([`Close`]), or plain values - resolved once at push time. Nested
//! lifetimes within one stack use checkpointed [`Scope`]s. See the
//! [`stack`] and [`resource`] module docs for the full tour.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod resource;
pub mod stack;
pub mod testing;

// Re-exports
pub use error::{StackError, UnwindError};
pub use resource::{Acquire, Acquiring, Close, Closing, Entering, IntoEntry, Plain, Scoped};
pub use stack::{Entry, ResourceStack, Scope, Values};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{StackError, UnwindError};
    pub use crate::resource::{
        Acquire, Acquiring, Close, Closing, Entering, IntoEntry, Plain, Scoped,
    };
    pub use crate::stack::{Entry, ResourceStack, Scope, Values};
}
