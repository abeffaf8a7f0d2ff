// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Log events for group state changes.
//!
//! Events are emitted while the group's exclusive lock is held, so the reported generation always
//! matches the change being described. Cache hits are never logged.

#![cfg_attr(
    not(any(feature = "logs", test)),
    expect(unused_variables, reason = "events are compiled out without the logs feature")
)]

/// A value was built for `key` in `generation`.
#[inline]
pub(crate) fn constructed(name: &str, key: &str, generation: u64) {
    #[cfg(any(feature = "logs", test))]
    tracing::event!(
        name: "lazy_group.construct",
        tracing::Level::DEBUG,
        group.name = name,
        group.key = key,
        group.generation = generation,
        "value constructed"
    );
}

/// All entries were dropped, starting `generation`.
#[inline]
pub(crate) fn cleared(name: &str, generation: u64, dropped: usize) {
    #[cfg(any(feature = "logs", test))]
    tracing::event!(
        name: "lazy_group.clear",
        tracing::Level::DEBUG,
        group.name = name,
        group.generation = generation,
        group.entries = dropped,
        "group cleared"
    );
}

/// A new constructor was installed and all entries were dropped, starting `generation`.
#[inline]
pub(crate) fn reset(name: &str, generation: u64, dropped: usize) {
    #[cfg(any(feature = "logs", test))]
    tracing::event!(
        name: "lazy_group.reset",
        tracing::Level::DEBUG,
        group.name = name,
        group.generation = generation,
        group.entries = dropped,
        "group reset"
    );
}
