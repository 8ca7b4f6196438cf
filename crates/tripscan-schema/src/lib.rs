//! Shared types and wire format for tripscan.
//!
//! Everything that crosses a crate boundary lives here: the provider record
//! format ([`RawPackage`]), source-tagged packages, per-source status, view
//! settings, and destination validation.

pub mod destination;
pub mod types;

// Re-exports
pub use destination::{Destination, DestinationError, FEATURED, FeaturedDestination, suggest};
pub use types::*;
