//! Resource capability contracts and the adapters that feed them to a stack.
//!
//! A resource is anything with an acquire/release lifecycle. This module
//! defines the small set of capability shapes a resource can expose, in
//! priority order:
//!
//! 1. [`Scoped`] - a distinct enter step producing the working value, and an
//!    exit step that also observes the in-flight failure. The richest shape;
//!    transactional resources that commit on success and roll back on
//!    failure live here.
//! 2. [`Acquire`] - an acquire step producing the working value, and a
//!    release step that does not care why the scope is ending.
//! 3. [`Close`] - no separate acquisition; the resource itself is the
//!    working value and `close` is the release action.
//! 4. A plain value with no release action at all, via [`Plain`].
//!
//! Which shape applies is resolved once, at push time, through the
//! [`IntoEntry`] conversion trait; the chosen release strategy is stored in
//! the [`Entry`](crate::stack::Entry) and never re-inspected. The
//! [`Entering`], [`Acquiring`], [`Closing`], and [`Plain`] adapters bridge
//! each capability trait to `IntoEntry`, and
//! [`ResourceStack`](crate::stack::ResourceStack) exposes a named push
//! method per shape so the adapters rarely need spelling out.
//!
//! # Examples
//!
//! ```
//! use undertow::{Close, Closing, ResourceStack};
//!
//! struct Conn {
//!     open: bool,
//! }
//!
//! impl Close for Conn {
//!     type Error = String;
//!
//!     fn close(self) -> Result<(), String> {
//!         Ok(())
//!     }
//! }
//!
//! let mut stack = ResourceStack::<Conn, String>::new();
//! stack.push(Closing(Conn { open: true })).unwrap();
//! assert_eq!(stack.len(), 1);
//! assert!(stack[0].open);
//! stack.unwind().unwrap();
//! ```

use crate::stack::Entry;

/// A resource with distinct enter and exit steps.
///
/// `enter` consumes the resource and produces the value the scope works
/// with. `exit` consumes that value and receives the failure the owning
/// scope is propagating, if any, so it can react differently to
/// failure-triggered teardown (roll back) versus normal teardown (commit).
///
/// `exit` is an associated function rather than a method: by the time the
/// stack releases, the resource has already been turned into its value.
pub trait Scoped {
    /// The value produced by entering.
    type Value;
    /// The failure type shared by enter and exit.
    type Error;

    /// Performs acquisition, producing the working value.
    fn enter(self) -> Result<Self::Value, Self::Error>;

    /// Releases the entered value. `failure` is the error the owning scope
    /// was propagating when the unwind began, or `None` on a clean exit.
    fn exit(value: Self::Value, failure: Option<&Self::Error>) -> Result<(), Self::Error>;
}

/// A resource with an acquire/release pair.
///
/// Like [`Scoped`] but the release step does not observe the in-flight
/// failure. Connection pools and locks usually want this shape.
pub trait Acquire {
    /// The value produced by acquiring.
    type Value;
    /// The failure type shared by acquire and release.
    type Error;

    /// Performs acquisition, producing the working value.
    fn acquire(self) -> Result<Self::Value, Self::Error>;

    /// Releases the acquired value.
    fn release(value: Self::Value) -> Result<(), Self::Error>;
}

/// A resource exposing only a close capability.
///
/// No separate acquisition happens; the resource itself is recorded as the
/// stack value and `close` runs at release time.
pub trait Close {
    /// The failure type close can report.
    type Error;

    /// Closes the resource.
    fn close(self) -> Result<(), Self::Error>;
}

/// Conversion from a resource into a recordable stack [`Entry`].
///
/// This is the front door of [`push`](crate::stack::ResourceStack::push):
/// any type that knows how to perform its own enter step and describe its
/// release strategy can be pushed directly. The capability adapters in this
/// module provide impls for the three capability traits; resource types can
/// also implement `IntoEntry` themselves.
///
/// The error type is a trait parameter (not an associated type) so that
/// error-agnostic adapters like [`Plain`] can serve any stack.
pub trait IntoEntry<E> {
    /// The value recorded on the stack.
    type Value;

    /// Performs the enter step, if any, and produces the entry to record.
    ///
    /// Acquisition side effects happen here, exactly once. On failure
    /// nothing may have been recorded anywhere.
    fn into_entry(self) -> Result<Entry<Self::Value, E>, E>;
}

/// Adapter pushing a [`Scoped`] resource: enters now, exits on unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entering<R>(pub R);

impl<R> IntoEntry<R::Error> for Entering<R>
where
    R: Scoped + 'static,
{
    type Value = R::Value;

    fn into_entry(self) -> Result<Entry<R::Value, R::Error>, R::Error> {
        let value = self.0.enter()?;
        Ok(Entry::with_exit(value, R::exit))
    }
}

/// Adapter pushing an [`Acquire`] resource: acquires now, releases on unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquiring<R>(pub R);

impl<R> IntoEntry<R::Error> for Acquiring<R>
where
    R: Acquire + 'static,
{
    type Value = R::Value;

    fn into_entry(self) -> Result<Entry<R::Value, R::Error>, R::Error> {
        let value = self.0.acquire()?;
        Ok(Entry::with_release(value, R::release))
    }
}

/// Adapter pushing a [`Close`]-only resource: records it as-is, closes on
/// unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Closing<R>(pub R);

impl<R> IntoEntry<R::Error> for Closing<R>
where
    R: Close + 'static,
{
    type Value = R;

    fn into_entry(self) -> Result<Entry<R, R::Error>, R::Error> {
        Ok(Entry::with_close(self.0, R::close))
    }
}

/// Adapter pushing a plain value that owns no external resource.
///
/// Recording cannot fail and unwinding it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plain<T>(pub T);

impl<T, E> IntoEntry<E> for Plain<T> {
    type Value = T;

    fn into_entry(self) -> Result<Entry<T, E>, E> {
        Ok(Entry::plain(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Session {
        id: u32,
        broken: bool,
    }

    impl Scoped for Session {
        type Value = u32;
        type Error = String;

        fn enter(self) -> Result<u32, String> {
            if self.broken {
                Err(format!("session {} refused", self.id))
            } else {
                Ok(self.id)
            }
        }

        fn exit(value: u32, failure: Option<&String>) -> Result<(), String> {
            if failure.is_some() && value == 0 {
                Err("cannot roll back session 0".to_string())
            } else {
                Ok(())
            }
        }
    }

    struct Lease {
        token: &'static str,
    }

    impl Acquire for Lease {
        type Value = &'static str;
        type Error = String;

        fn acquire(self) -> Result<&'static str, String> {
            Ok(self.token)
        }

        fn release(_value: &'static str) -> Result<(), String> {
            Ok(())
        }
    }

    struct Port {
        number: u16,
    }

    impl Close for Port {
        type Error = String;

        fn close(self) -> Result<(), String> {
            Err(format!("port {} stuck", self.number))
        }
    }

    #[test]
    fn entering_runs_enter_immediately() {
        let entry = Entering(Session {
            id: 7,
            broken: false,
        })
        .into_entry()
        .unwrap();
        assert_eq!(entry.value(), &7);
    }

    #[test]
    fn entering_propagates_enter_failure() {
        let err = Entering(Session {
            id: 9,
            broken: true,
        })
        .into_entry()
        .unwrap_err();
        assert_eq!(err, "session 9 refused");
    }

    #[test]
    fn exit_strategy_observes_failure() {
        let entry = Entering(Session {
            id: 0,
            broken: false,
        })
        .into_entry()
        .unwrap();
        let body = "body failed".to_string();
        assert_eq!(
            entry.release(Some(&body)),
            Err("cannot roll back session 0".to_string())
        );
    }

    #[test]
    fn acquiring_records_the_acquired_value() {
        let entry = Acquiring(Lease { token: "lease-1" }).into_entry().unwrap();
        assert_eq!(entry.value(), &"lease-1");
        assert_eq!(entry.release(None), Ok(()));
    }

    #[test]
    fn closing_records_the_resource_itself() {
        let entry = Closing(Port { number: 8080 }).into_entry().unwrap();
        assert_eq!(entry.value().number, 8080);
        assert_eq!(entry.release(None), Err("port 8080 stuck".to_string()));
    }

    #[test]
    fn plain_has_no_release_action() {
        let entry: Entry<i32, String> = Plain(42).into_entry().unwrap();
        assert_eq!(entry.value(), &42);
        assert_eq!(entry.release(None), Ok(()));
    }
}
