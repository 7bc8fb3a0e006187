//! Application layer - Use cases that coordinate registry, selection and archive services.
//!
//! This layer sits between the CLI and the services it drives.

mod discover;

pub use discover::{DiscoverUseCase, DiscoveredArchive, OptionReport, RunReport};
