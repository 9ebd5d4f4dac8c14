//! Student lookups for the admin console.

pub mod directory;

pub use directory::StudentDirectory;
