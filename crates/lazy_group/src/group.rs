// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, RandomState};

use parking_lot::RwLock;

use crate::builder::LazyGroupBuilder;
use crate::telemetry;

/// Name used in log events when none is configured.
pub(crate) const DEFAULT_NAME: &str = "lazy_group";

pub(crate) type Constructor<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A keyed container that constructs each value on first use and memoizes it.
///
/// Values are built by the group's constructor the first time a key is requested through
/// [`get`](Self::get) and every later request for that key returns a clone of the stored value.
/// Use a cheaply clonable handle such as [`Arc`](std::sync::Arc) as `T` when all callers must
/// share one instance.
///
/// # Type Parameters
///
/// * `T` - The value type. One group holds one kind of value.
/// * `S` - The hash builder for the key map, defaults to [`RandomState`].
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use lazy_group::LazyGroup;
///
/// let next = AtomicUsize::new(0);
/// let group = LazyGroup::new(move || next.fetch_add(1, Ordering::Relaxed));
///
/// assert_eq!(group.get("x"), 0);
/// assert_eq!(group.get("y"), 1);
/// assert_eq!(group.get("x"), 0);
/// ```
pub struct LazyGroup<T, S = RandomState> {
    state: RwLock<State<T, S>>,
    name: Cow<'static, str>,
}

/// Everything that changes together when a generation ends.
struct State<T, S> {
    constructor: Constructor<T>,
    entries: HashMap<String, T, S>,
    generation: u64,
}

impl<T> LazyGroup<T> {
    /// Creates an empty group that builds values with `constructor`.
    ///
    /// The constructor is not invoked until the first call to [`get`](Self::get).
    #[must_use]
    pub fn new(constructor: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::from_parts(Box::new(constructor), Cow::Borrowed(DEFAULT_NAME), HashMap::default())
    }

    /// Creates an empty group with room for at least `capacity` keys before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize, constructor: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::from_parts(
            Box::new(constructor),
            Cow::Borrowed(DEFAULT_NAME),
            HashMap::with_capacity(capacity),
        )
    }

    /// Creates a new builder for configuring a `LazyGroup`.
    #[must_use]
    pub fn builder() -> LazyGroupBuilder<T> {
        LazyGroupBuilder::new()
    }
}

impl<T, S> LazyGroup<T, S> {
    pub(crate) fn from_parts(constructor: Constructor<T>, name: Cow<'static, str>, entries: HashMap<String, T, S>) -> Self {
        Self {
            state: RwLock::new(State {
                constructor,
                entries,
                generation: 0,
            }),
            name,
        }
    }

    /// Returns the name used to label log events emitted by this group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of values currently memoized.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    /// Returns `true` if no values are memoized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current generation.
    ///
    /// A new group starts at generation 0. Every [`clear`](Self::clear) and
    /// [`reset`](Self::reset) advances it by one.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Drops every memoized value, keeping the current constructor.
    ///
    /// The next [`get`](Self::get) of any key constructs a fresh value.
    pub fn clear(&self) {
        let mut state = self.state.write();
        let dropped = state.entries.len();
        state.entries.clear();
        state.generation += 1;
        telemetry::cleared(&self.name, state.generation, dropped);
    }

    /// Installs a new constructor and drops every memoized value.
    ///
    /// Both happen in one exclusive critical section: a concurrent [`get`](Self::get) either
    /// completes before the reset and may return an old value, or runs after it and only sees
    /// values built by `constructor`. The retired constructor is never invoked again.
    pub fn reset(&self, constructor: impl Fn() -> T + Send + Sync + 'static) {
        let mut state = self.state.write();
        let retired = std::mem::replace(&mut state.constructor, Box::new(constructor));
        let dropped = state.entries.len();
        state.entries.clear();
        state.generation += 1;
        telemetry::reset(&self.name, state.generation, dropped);
        drop(state);

        // The retired constructor may own resources with non-trivial drop logic.
        drop(retired);
    }
}

impl<T, S> LazyGroup<T, S>
where
    S: BuildHasher,
{
    /// Returns the value for `key`, constructing and memoizing it if needed.
    ///
    /// The constructor runs at most once per key per generation. Callers that race for the same
    /// missing key all receive a clone of the single value that was built.
    ///
    /// The value returned by the constructor is stored as is, whatever it is. If the constructor
    /// panics, the panic propagates to this caller, nothing is stored and the next call for the
    /// same key tries again.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use lazy_group::LazyGroup;
    ///
    /// let group = LazyGroup::new(|| Arc::new(String::from("connection")));
    ///
    /// let a = group.get("db-1");
    /// let b = group.get("db-1");
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn get(&self, key: &str) -> T
    where
        T: Clone,
    {
        {
            let state = self.state.read();
            if let Some(value) = state.entries.get(key) {
                return value.clone();
            }
        }

        let mut state = self.state.write();

        // Somebody may have built it while we were waiting for the exclusive lock.
        if let Some(value) = state.entries.get(key) {
            return value.clone();
        }

        let value = (state.constructor)();
        telemetry::constructed(&self.name, key, state.generation);
        state.entries.insert(key.to_owned(), value.clone());
        value
    }

    /// Returns the value for `key` if it has already been constructed in this generation.
    ///
    /// Never invokes the constructor.
    #[must_use]
    pub fn get_existing(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        self.state.read().entries.get(key).cloned()
    }

    /// Returns `true` if a value for `key` has been constructed in this generation.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.state.read().entries.contains_key(key)
    }
}

impl<T> Default for LazyGroup<T>
where
    T: Default + 'static,
{
    /// Creates a group that builds values with [`T::default`](Default::default).
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T, S> fmt::Debug for LazyGroup<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("LazyGroup")
            .field("name", &self.name)
            .field("len", &state.entries.len())
            .field("generation", &state.generation)
            .finish_non_exhaustive()
    }
}
