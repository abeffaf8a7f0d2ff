// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, RandomState};

use crate::group::{Constructor, DEFAULT_NAME, LazyGroup};

/// Builder for [`LazyGroup`].
///
/// A constructor is required; everything else has a default.
///
/// # Examples
///
/// ```
/// use lazy_group::LazyGroupBuilder;
///
/// let group = LazyGroupBuilder::new()
///     .name("dialects")
///     .capacity(8)
///     .constructor(|| 42_u32)
///     .build();
///
/// assert_eq!(group.get("sql"), 42);
/// ```
pub struct LazyGroupBuilder<T, S = RandomState> {
    constructor: Option<Constructor<T>>,
    name: Cow<'static, str>,
    capacity: usize,
    hasher: S,
}

impl<T> LazyGroupBuilder<T> {
    /// Creates a builder with the default name, no preallocated capacity and the standard hasher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructor: None,
            name: Cow::Borrowed(DEFAULT_NAME),
            capacity: 0,
            hasher: RandomState::new(),
        }
    }
}

impl<T> Default for LazyGroupBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> LazyGroupBuilder<T, S> {
    /// Sets the function that builds a value the first time a key is requested.
    #[must_use]
    pub fn constructor(mut self, constructor: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.constructor = Some(Box::new(constructor));
        self
    }

    /// Sets the name that labels log events emitted by the group. Prefer `snake_case`.
    #[must_use]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets how many keys the group can hold before its map first reallocates.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the hash builder used for the key map.
    #[must_use]
    pub fn hasher<S2>(self, hasher: S2) -> LazyGroupBuilder<T, S2> {
        LazyGroupBuilder {
            constructor: self.constructor,
            name: self.name,
            capacity: self.capacity,
            hasher,
        }
    }
}

impl<T, S> LazyGroupBuilder<T, S>
where
    S: BuildHasher,
{
    /// Builds the group with the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if no constructor has been set via [`constructor()`](Self::constructor). A group
    /// without a constructor could never produce a value, so this is treated as a programming
    /// error rather than a recoverable condition.
    #[must_use]
    #[expect(clippy::panic, reason = "building without a constructor is a programming error")]
    pub fn build(self) -> LazyGroup<T, S> {
        let Some(constructor) = self.constructor else {
            panic!("a constructor must be set before building the group");
        };

        LazyGroup::from_parts(constructor, self.name, HashMap::with_capacity_and_hasher(self.capacity, self.hasher))
    }
}

impl<T, S> fmt::Debug for LazyGroupBuilder<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyGroupBuilder")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("has_constructor", &self.constructor.is_some())
            .finish_non_exhaustive()
    }
}
