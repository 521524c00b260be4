//! The resource stack: ordered acquisition, reverse-order release.
//!
//! [`ResourceStack`] records each resource you push together with the
//! release action bound to it, then unwinds the whole sequence LIFO - either
//! explicitly through [`unwind`](ResourceStack::unwind), through a bounded
//! [`Scope`], or as a drop backstop on panic and early-return paths. A
//! release that fails never stops the entries beneath it from being
//! released; every failure is collected into one [`UnwindError`].
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use undertow::ResourceStack;
//!
//! let order = Rc::new(RefCell::new(Vec::new()));
//! let (a, b) = (order.clone(), order.clone());
//!
//! let mut stack = ResourceStack::<&str, String>::new();
//! stack.attach("a", move |name| {
//!     a.borrow_mut().push(name);
//!     Ok(())
//! }).unwrap();
//! stack.attach("b", move |name| {
//!     b.borrow_mut().push(name);
//!     Ok(())
//! }).unwrap();
//!
//! stack.unwind().unwrap();
//! assert_eq!(*order.borrow(), ["b", "a"]);
//! ```

use std::fmt;
use std::ops::{Bound, Index, RangeBounds};

use crate::error::{StackError, UnwindError};
use crate::resource::{Acquire, Acquiring, Close, Closing, Entering, IntoEntry, Scoped};

type ExitFn<T, E> = Box<dyn FnOnce(T, Option<&E>) -> Result<(), E>>;
type ReleaseFn<T, E> = Box<dyn FnOnce(T) -> Result<(), E>>;

/// Release strategy chosen at push time, never re-inspected afterwards.
enum Strategy<T, E> {
    /// Exit action; observes the in-flight body failure.
    Exit(ExitFn<T, E>),
    /// Release action from an acquire/release resource.
    Release(ReleaseFn<T, E>),
    /// Close action from a close-only resource.
    Close(ReleaseFn<T, E>),
    /// Plain value; releasing is a no-op.
    None,
}

/// A recorded stack entry: a value paired with its release strategy.
///
/// Entries are normally created through the push methods of
/// [`ResourceStack`] or the adapters in [`resource`](crate::resource);
/// the constructors here are the building blocks for custom
/// [`IntoEntry`] impls.
pub struct Entry<T, E> {
    value: T,
    strategy: Strategy<T, E>,
}

impl<T, E> Entry<T, E> {
    /// Entry whose release action observes the in-flight body failure.
    pub fn with_exit<F>(value: T, exit: F) -> Self
    where
        F: FnOnce(T, Option<&E>) -> Result<(), E> + 'static,
    {
        Entry {
            value,
            strategy: Strategy::Exit(Box::new(exit)),
        }
    }

    /// Entry with a plain release action.
    pub fn with_release<F>(value: T, release: F) -> Self
    where
        F: FnOnce(T) -> Result<(), E> + 'static,
    {
        Entry {
            value,
            strategy: Strategy::Release(Box::new(release)),
        }
    }

    /// Entry whose value closes itself on release.
    pub fn with_close<F>(value: T, close: F) -> Self
    where
        F: FnOnce(T) -> Result<(), E> + 'static,
    {
        Entry {
            value,
            strategy: Strategy::Close(Box::new(close)),
        }
    }

    /// Entry for a plain value with no release action.
    pub fn plain(value: T) -> Self {
        Entry {
            value,
            strategy: Strategy::None,
        }
    }

    /// The recorded value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Mutable access to the recorded value.
    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Invokes the release strategy, consuming the entry.
    pub(crate) fn release(self, failure: Option<&E>) -> Result<(), E> {
        match self.strategy {
            Strategy::Exit(exit) => exit(self.value, failure),
            Strategy::Release(release) => release(self.value),
            Strategy::Close(close) => close(self.value),
            Strategy::None => Ok(()),
        }
    }
}

impl<T, E> fmt::Debug for Entry<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.strategy {
            Strategy::Exit(_) => "exit",
            Strategy::Release(_) => "release",
            Strategy::Close(_) => "close",
            Strategy::None => "none",
        };
        f.debug_struct("Entry")
            .field("value", &"<value>")
            .field("strategy", &strategy)
            .finish()
    }
}

/// An ordered stack of acquired resources, released in reverse order.
///
/// The stack is homogeneous over the value type `T` and the failure type
/// `E`; mixed stacks use an enum or a boxed trait object for `T`. A stack
/// is *open* from creation until its one top-level [`unwind`]: open stacks
/// accept pushes and reads, closed stacks reject pushes with
/// [`StackError::Closed`] but stay readable (and empty).
///
/// A stack instance has a single owner; `&mut self` on every mutating
/// operation is what enforces the single-threaded, non-reentrant model.
///
/// [`unwind`]: ResourceStack::unwind
///
/// # Example
///
/// ```
/// use undertow::{Plain, ResourceStack};
///
/// let mut stack = ResourceStack::<u32, String>::new();
/// stack.push(Plain(1)).unwrap();
/// stack.push(Plain(2)).unwrap();
///
/// assert_eq!(stack.len(), 2);
/// assert_eq!(stack.get(0), Some(&1));
/// assert_eq!(stack[1], 2);
///
/// stack.unwind().unwrap();
/// assert!(stack.is_closed());
/// assert!(stack.is_empty());
/// ```
pub struct ResourceStack<T, E> {
    entries: Vec<Entry<T, E>>,
    closed: bool,
}

impl<T, E> ResourceStack<T, E> {
    /// Creates an empty open stack.
    pub fn new() -> Self {
        ResourceStack {
            entries: Vec::new(),
            closed: false,
        }
    }

    /// Runs `body` against a fresh stack and unwinds on every exit path.
    ///
    /// This is the scope-boundary contract as a function: the stack is
    /// unwound exactly once whether the body returns `Ok`, returns `Err`,
    /// or panics (the drop backstop covers the panic path). When the body
    /// fails, its error stays the primary failure of the returned
    /// [`UnwindError`] and exit strategies observe it; release failures
    /// are chained as secondary evidence. When the body succeeds but
    /// releases fail, the release failures alone form the error.
    ///
    /// The body shares the stack's failure type `E`; adapt push errors
    /// with `map_err`, or pick an `E` rich enough to absorb them.
    ///
    /// # Example
    ///
    /// ```
    /// use undertow::ResourceStack;
    ///
    /// let result = ResourceStack::<&str, String>::scoped(|stack| {
    ///     stack.attach("conn", |_| Ok(())).map_err(|e| e.to_string())?;
    ///     Ok(stack.len())
    /// });
    /// assert_eq!(result.unwrap(), 1);
    /// ```
    pub fn scoped<F, R>(body: F) -> Result<R, UnwindError<E>>
    where
        F: FnOnce(&mut ResourceStack<T, E>) -> Result<R, E>,
    {
        let mut stack = ResourceStack::new();
        match body(&mut stack) {
            Ok(value) => stack.unwind().map(|()| value),
            Err(body_failure) => Err(stack.unwind_with(body_failure)),
        }
    }

    /// Acquires a batch of resources up-front.
    ///
    /// Resources are entered in iteration order. If acquisition fails
    /// partway, the already-entered prefix is unwound (in reverse order)
    /// before the failure is returned; the failed resource is never
    /// recorded.
    ///
    /// # Example
    ///
    /// ```
    /// use undertow::{Plain, ResourceStack};
    ///
    /// let stack = ResourceStack::<u32, String>::acquire_all(
    ///     [Plain(1), Plain(2), Plain(3)],
    /// ).unwrap();
    /// assert_eq!(stack.len(), 3);
    /// ```
    pub fn acquire_all<I>(resources: I) -> Result<Self, UnwindError<E>>
    where
        I: IntoIterator,
        I::Item: IntoEntry<E, Value = T>,
    {
        let mut stack = ResourceStack::new();
        for resource in resources {
            match resource.into_entry() {
                Ok(entry) => stack.entries.push(entry),
                Err(failure) => return Err(stack.unwind_with(failure)),
            }
        }
        Ok(stack)
    }

    /// Pushes a resource, performing its enter step now.
    ///
    /// On success the entry is durably recorded at the top of the stack
    /// before this method returns a reference to the recorded value. If
    /// the enter step fails, nothing is recorded for this resource and
    /// previously recorded entries are untouched. On a closed stack the
    /// push is rejected before any acquisition side effect happens.
    pub fn push<R>(&mut self, resource: R) -> Result<&T, StackError<E>>
    where
        R: IntoEntry<E, Value = T>,
    {
        if self.closed {
            return Err(StackError::Closed);
        }
        let entry = resource.into_entry().map_err(StackError::Acquire)?;
        Ok(self.push_entry(entry))
    }

    /// Synonym for [`push`](ResourceStack::push); identical contract.
    pub fn append<R>(&mut self, resource: R) -> Result<&T, StackError<E>>
    where
        R: IntoEntry<E, Value = T>,
    {
        self.push(resource)
    }

    /// Pushes a [`Scoped`] resource: enters now, exits on unwind.
    ///
    /// The exit step will observe the body failure when the unwind runs
    /// during failure propagation.
    pub fn enter<R>(&mut self, resource: R) -> Result<&T, StackError<E>>
    where
        R: Scoped<Value = T, Error = E> + 'static,
    {
        self.push(Entering(resource))
    }

    /// Pushes an [`Acquire`] resource: acquires now, releases on unwind.
    pub fn acquire<R>(&mut self, resource: R) -> Result<&T, StackError<E>>
    where
        R: Acquire<Value = T, Error = E> + 'static,
    {
        self.push(Acquiring(resource))
    }

    /// Pushes a [`Close`]-only resource.
    ///
    /// No enter step runs; the resource itself is the recorded value and
    /// its close capability is the release action.
    pub fn closing(&mut self, resource: T) -> Result<&T, StackError<E>>
    where
        T: Close<Error = E> + 'static,
    {
        self.push(Closing(resource))
    }

    /// Records an already-acquired value together with its release action.
    pub fn attach<F>(&mut self, value: T, release: F) -> Result<&T, StackError<E>>
    where
        F: FnOnce(T) -> Result<(), E> + 'static,
    {
        if self.closed {
            return Err(StackError::Closed);
        }
        Ok(self.push_entry(Entry::with_release(value, release)))
    }

    /// Records an already-acquired value with a release action that also
    /// observes the in-flight body failure.
    pub fn attach_exit<F>(&mut self, value: T, exit: F) -> Result<&T, StackError<E>>
    where
        F: FnOnce(T, Option<&E>) -> Result<(), E> + 'static,
    {
        if self.closed {
            return Err(StackError::Closed);
        }
        Ok(self.push_entry(Entry::with_exit(value, exit)))
    }

    /// Records a plain value that owns no external resource.
    pub fn adopt(&mut self, value: T) -> Result<&T, StackError<E>> {
        if self.closed {
            return Err(StackError::Closed);
        }
        Ok(self.push_entry(Entry::plain(value)))
    }

    /// Number of currently recorded entries.
    ///
    /// Counts what is recorded now, not cumulative historical pushes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once the stack has been unwound at the top level.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The value at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(Entry::value)
    }

    /// Mutable access to the value at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).map(Entry::value_mut)
    }

    /// The value at `index`, or [`StackError::OutOfRange`].
    ///
    /// Reads never trigger acquisition or release, and they stay valid
    /// after close (the stack is then empty but readable).
    pub fn value(&self, index: usize) -> Result<&T, StackError<E>> {
        self.get(index).ok_or(StackError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Iterates over recorded values in push order.
    pub fn values(&self) -> Values<'_, T, E> {
        Values {
            inner: self.entries.iter(),
        }
    }

    /// Values within `range` (half-open semantics), in push order.
    ///
    /// Fails with [`StackError::OutOfRange`] when the range falls outside
    /// `[0, len]`.
    ///
    /// # Example
    ///
    /// ```
    /// use undertow::{Plain, ResourceStack};
    ///
    /// let mut stack = ResourceStack::<u32, String>::new();
    /// for n in [10, 20, 30] {
    ///     stack.push(Plain(n)).unwrap();
    /// }
    /// assert_eq!(stack.slice(1..3).unwrap(), [&20, &30]);
    /// assert!(stack.slice(1..4).is_err());
    /// ```
    pub fn slice<R>(&self, range: R) -> Result<Vec<&T>, StackError<E>>
    where
        R: RangeBounds<usize>,
    {
        let len = self.entries.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(StackError::OutOfRange {
                index: start.max(end),
                len,
            });
        }
        Ok(self.entries[start..end].iter().map(Entry::value).collect())
    }

    /// Releases every recorded entry in reverse push order, then closes
    /// the stack.
    ///
    /// A failed release is collected and the sweep continues with the
    /// remaining entries; each entry's release action runs exactly once,
    /// none skipped, none repeated. Collected failures surface as one
    /// [`UnwindError`] in release order (last-pushed first). Unwinding an
    /// already-closed stack is a no-op that invokes nothing.
    pub fn unwind(&mut self) -> Result<(), UnwindError<E>> {
        if self.closed {
            return Ok(());
        }
        let failures = self.unwind_from(0, None);
        self.closed = true;
        match UnwindError::from_releases(failures) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Unwinds while a body failure is propagating.
    ///
    /// Exit strategies observe `body_failure`; release failures are
    /// chained onto it as secondary evidence. The returned error always
    /// carries the body failure as primary, so this method is infallible
    /// in the sense that there is always an error to return.
    pub fn unwind_with(&mut self, body_failure: E) -> UnwindError<E> {
        let failures = if self.closed {
            Vec::new()
        } else {
            self.unwind_from(0, Some(&body_failure))
        };
        self.closed = true;
        UnwindError::from_body(body_failure).with_releases(failures)
    }

    /// Opens a nested scope at the current length.
    ///
    /// Pushes and reads through the returned [`Scope`] operate on this
    /// same stack; closing the scope releases only entries recorded at or
    /// after the checkpoint, leaving earlier entries untouched and open.
    ///
    /// # Example
    ///
    /// ```
    /// use undertow::ResourceStack;
    ///
    /// let mut stack = ResourceStack::<&str, String>::new();
    /// stack.adopt("outer").unwrap();
    ///
    /// let mut scope = stack.scope();
    /// scope.adopt("inner").unwrap();
    /// assert_eq!(scope.len(), 2);
    /// scope.close().unwrap();
    ///
    /// assert_eq!(stack.len(), 1);
    /// assert!(!stack.is_closed());
    /// ```
    pub fn scope(&mut self) -> Scope<'_, T, E> {
        let floor = self.entries.len();
        Scope {
            stack: self,
            floor,
            done: false,
        }
    }

    /// Runs `body` inside a nested scope, closing it on every exit path.
    ///
    /// The nested analog of [`scoped`](ResourceStack::scoped): entries
    /// pushed by the body are released when it finishes, with the same
    /// failure chaining policy; entries recorded before the call survive.
    pub fn nested<F, R>(&mut self, body: F) -> Result<R, UnwindError<E>>
    where
        F: FnOnce(&mut Scope<'_, T, E>) -> Result<R, E>,
    {
        let mut scope = self.scope();
        match body(&mut scope) {
            Ok(value) => scope.close().map(|()| value),
            Err(body_failure) => Err(scope.fail(body_failure)),
        }
    }

    /// Transfers every recorded entry to a fresh open stack.
    ///
    /// This stack is left empty and open; release responsibility moves
    /// with the entries, so unwinding `self` afterwards releases nothing.
    pub fn pop_all(&mut self) -> ResourceStack<T, E> {
        ResourceStack {
            entries: std::mem::take(&mut self.entries),
            closed: false,
        }
    }

    fn push_entry(&mut self, entry: Entry<T, E>) -> &T {
        self.entries.push(entry);
        // just pushed, so the index is in range
        let index = self.entries.len() - 1;
        self.entries[index].value()
    }

    /// Pops and releases entries down to `floor`, collecting failures in
    /// release order. Entries are popped before their strategy runs, so a
    /// panicking release cannot cause a double release.
    fn unwind_from(&mut self, floor: usize, body_failure: Option<&E>) -> Vec<E> {
        let mut failures = Vec::new();
        while self.entries.len() > floor {
            let entry = match self.entries.pop() {
                Some(entry) => entry,
                None => break,
            };
            if let Err(failure) = entry.release(body_failure) {
                failures.push(failure);
            }
        }
        failures
    }
}

impl<T, E> Default for ResourceStack<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for ResourceStack<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStack")
            .field("len", &self.entries.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl<T, E> Index<usize> for ResourceStack<T, E> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {} out of range (len {})", index, self.entries.len()),
        }
    }
}

impl<'a, T, E> IntoIterator for &'a ResourceStack<T, E> {
    type Item = &'a T;
    type IntoIter = Values<'a, T, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}

impl<T, E> Drop for ResourceStack<T, E> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let failures = self.unwind_from(0, None);
        self.closed = true;
        if !failures.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                count = failures.len(),
                "resource stack dropped with release failures"
            );
            #[cfg(not(feature = "tracing"))]
            eprintln!(
                "resource stack dropped with {} release failure(s)",
                failures.len()
            );
        }
    }
}

/// Iterator over recorded values in push order.
pub struct Values<'a, T, E> {
    inner: std::slice::Iter<'a, Entry<T, E>>,
}

impl<'a, T, E> Iterator for Values<'a, T, E> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(Entry::value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T, E> DoubleEndedIterator for Values<'a, T, E> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.inner.next_back().map(Entry::value)
    }
}

impl<T, E> ExactSizeIterator for Values<'_, T, E> {}

impl<T, E> fmt::Debug for Values<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Values")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

/// A nested scope bound to a checkpoint on an existing stack.
///
/// Created by [`ResourceStack::scope`]. Pushes and reads go to the same
/// underlying stack; [`close`](Scope::close) releases only entries
/// recorded at or after the checkpoint. Dropping the scope without
/// closing it releases the same range as a backstop. Because `close`
/// consumes the scope, a used checkpoint cannot be unwound twice.
///
/// Scopes nest: [`Scope::scope`] opens a further scope on the same stack.
/// The borrow checker keeps nested scopes sequential.
pub struct Scope<'s, T, E> {
    stack: &'s mut ResourceStack<T, E>,
    floor: usize,
    done: bool,
}

impl<T, E> Scope<'_, T, E> {
    /// The checkpoint index this scope unwinds down to.
    pub fn checkpoint(&self) -> usize {
        self.floor
    }

    /// Pushes a resource onto the underlying stack.
    ///
    /// Same contract as [`ResourceStack::push`].
    pub fn push<R>(&mut self, resource: R) -> Result<&T, StackError<E>>
    where
        R: IntoEntry<E, Value = T>,
    {
        self.stack.push(resource)
    }

    /// Synonym for [`push`](Scope::push).
    pub fn append<R>(&mut self, resource: R) -> Result<&T, StackError<E>>
    where
        R: IntoEntry<E, Value = T>,
    {
        self.stack.push(resource)
    }

    /// Pushes a [`Scoped`] resource. Same contract as
    /// [`ResourceStack::enter`].
    pub fn enter<R>(&mut self, resource: R) -> Result<&T, StackError<E>>
    where
        R: Scoped<Value = T, Error = E> + 'static,
    {
        self.stack.enter(resource)
    }

    /// Pushes an [`Acquire`] resource. Same contract as
    /// [`ResourceStack::acquire`].
    pub fn acquire<R>(&mut self, resource: R) -> Result<&T, StackError<E>>
    where
        R: Acquire<Value = T, Error = E> + 'static,
    {
        self.stack.acquire(resource)
    }

    /// Pushes a [`Close`]-only resource. Same contract as
    /// [`ResourceStack::closing`].
    pub fn closing(&mut self, resource: T) -> Result<&T, StackError<E>>
    where
        T: Close<Error = E> + 'static,
    {
        self.stack.closing(resource)
    }

    /// Records an already-acquired value with its release action.
    pub fn attach<F>(&mut self, value: T, release: F) -> Result<&T, StackError<E>>
    where
        F: FnOnce(T) -> Result<(), E> + 'static,
    {
        self.stack.attach(value, release)
    }

    /// Records a value with a failure-observing release action.
    pub fn attach_exit<F>(&mut self, value: T, exit: F) -> Result<&T, StackError<E>>
    where
        F: FnOnce(T, Option<&E>) -> Result<(), E> + 'static,
    {
        self.stack.attach_exit(value, exit)
    }

    /// Records a plain value with no release action.
    pub fn adopt(&mut self, value: T) -> Result<&T, StackError<E>> {
        self.stack.adopt(value)
    }

    /// Number of entries on the underlying stack.
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// True when the underlying stack has no entries.
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The value at `index` on the underlying stack.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.stack.get(index)
    }

    /// Mutable access to the value at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.stack.get_mut(index)
    }

    /// The value at `index`, or [`StackError::OutOfRange`].
    pub fn value(&self, index: usize) -> Result<&T, StackError<E>> {
        self.stack.value(index)
    }

    /// Iterates over the underlying stack's values in push order.
    pub fn values(&self) -> Values<'_, T, E> {
        self.stack.values()
    }

    /// Values within `range`, half-open semantics.
    pub fn slice<R>(&self, range: R) -> Result<Vec<&T>, StackError<E>>
    where
        R: RangeBounds<usize>,
    {
        self.stack.slice(range)
    }

    /// Opens a further nested scope at the current length.
    pub fn scope(&mut self) -> Scope<'_, T, E> {
        let floor = self.stack.entries.len();
        Scope {
            stack: &mut *self.stack,
            floor,
            done: false,
        }
    }

    /// Runs `body` inside a further nested scope. Same contract as
    /// [`ResourceStack::nested`].
    pub fn nested<F, R>(&mut self, body: F) -> Result<R, UnwindError<E>>
    where
        F: FnOnce(&mut Scope<'_, T, E>) -> Result<R, E>,
    {
        let mut scope = self.scope();
        match body(&mut scope) {
            Ok(value) => scope.close().map(|()| value),
            Err(body_failure) => Err(scope.fail(body_failure)),
        }
    }

    /// Releases entries recorded at or after the checkpoint, LIFO.
    ///
    /// Entries recorded before the checkpoint stay untouched and the
    /// underlying stack stays open. Failed releases are collected and the
    /// sweep continues, exactly as with a top-level unwind.
    pub fn close(mut self) -> Result<(), UnwindError<E>> {
        self.done = true;
        let failures = self.stack.unwind_from(self.floor, None);
        match UnwindError::from_releases(failures) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Closes the scope while a body failure is propagating.
    ///
    /// The nested analog of [`ResourceStack::unwind_with`]: exit
    /// strategies in the scope's range observe `body_failure`, and the
    /// returned error carries it as primary.
    pub fn fail(mut self, body_failure: E) -> UnwindError<E> {
        self.done = true;
        let failures = self.stack.unwind_from(self.floor, Some(&body_failure));
        UnwindError::from_body(body_failure).with_releases(failures)
    }
}

impl<T, E> fmt::Debug for Scope<'_, T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("checkpoint", &self.floor)
            .field("len", &self.stack.entries.len())
            .field("done", &self.done)
            .finish()
    }
}

impl<T, E> Drop for Scope<'_, T, E> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let failures = self.stack.unwind_from(self.floor, None);
        if !failures.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                count = failures.len(),
                "scope dropped with release failures"
            );
            #[cfg(not(feature = "tracing"))]
            eprintln!(
                "scope dropped with {} release failure(s)",
                failures.len()
            );
        }
    }
}
