#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod catalog;
pub mod selector;

pub use catalog::{discover_versions, ordered_list, sort_key, CatalogError, VersionKey};
pub use selector::{select, Selector};
