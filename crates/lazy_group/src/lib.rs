// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Keyed, lazily constructed and memoized values shared across threads.
//!
//! This crate provides [`LazyGroup`], a container that defers construction of each value until
//! it is first requested by key, then hands out the same value for every later request under
//! that key. It is meant for objects that are costly to build and naturally partitioned by a
//! string key: connections per endpoint, parsers per dialect, state per tenant.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use lazy_group::LazyGroup;
//!
//! let group = LazyGroup::new(|| Arc::new(Vec::<u8>::with_capacity(1024)));
//!
//! let first = group.get("tenant-a");
//! let second = group.get("tenant-a");
//!
//! // Both lookups return the very same allocation.
//! assert!(Arc::ptr_eq(&first, &second));
//! ```
//!
//! # Concurrency
//!
//! A group is `Send` and `Sync` and is typically shared through an [`Arc`](std::sync::Arc).
//! Every key is constructed at most once per generation, no matter how many threads ask for it
//! at the same time:
//!
//! - Lookups of keys that already exist only take a shared lock and never contend with each
//!   other.
//! - A miss releases the shared lock, takes the exclusive lock and checks again before running
//!   the constructor, so callers that lost the race pick up the winner's value.
//! - The constructor runs while the exclusive lock is held. A slow constructor stalls every
//!   other operation on the group, and a constructor that calls back into its own group
//!   deadlocks.
//!
//! # Generations
//!
//! [`LazyGroup::clear`] drops every entry and [`LazyGroup::reset`] additionally installs a new
//! constructor. Both start a new generation: the next lookup of any key builds a fresh value.
//! A reset swaps the constructor and drops the entries in a single critical section, so no
//! caller ever sees a value built by the retired constructor once the reset has returned.
//!
//! # Configuration
//!
//! [`LazyGroup::builder`] exposes the optional settings: a name used to label log events, an
//! initial capacity and a custom hasher.
//!
//! ```
//! use lazy_group::LazyGroup;
//!
//! let group = LazyGroup::builder()
//!     .name("parsers")
//!     .capacity(16)
//!     .constructor(String::new)
//!     .build();
//!
//! assert_eq!(group.name(), "parsers");
//! assert!(group.get("json").is_empty());
//! ```
//!
//! # Features
//!
//! - `logs`: emits `tracing` events when values are constructed and when the group is cleared
//!   or reset.

#![doc(html_logo_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/lazy_group/logo.png")]
#![doc(html_favicon_url = "https://media.githubusercontent.com/media/microsoft/oxidizer/refs/heads/main/crates/lazy_group/favicon.ico")]

mod builder;
mod group;
mod telemetry;

#[cfg(test)]
mod testing;

pub use builder::LazyGroupBuilder;
pub use group::LazyGroup;
