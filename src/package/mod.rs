//! Release selection
//!
//! Pure functions that reduce a package's published versions to the single
//! release compatible with the running platform.

mod option;
mod range;
mod version;

pub use option::PackageOption;
pub use range::EngineRange;
pub use version::VersionSelector;
