#![doc = include_str!("../README.md")]

mod bundle;
mod config;
mod entry;
mod norm_string;
mod sentence;

pub use {bundle::*, config::*, entry::*, norm_string::*, sentence::*};

/// [`indexmap::IndexMap`] using the [`foldhash`] hasher.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, foldhash::fast::RandomState>;

/// [`indexmap::IndexSet`] using the [`foldhash`] hasher.
pub type IndexSet<T> = indexmap::IndexSet<T, foldhash::fast::RandomState>;
