//! Infrastructure layer
//!
//! Concrete implementations of the domain's external collaborators:
//! the CSV trip log, the roster loader, and the distance lookup.

pub mod distance;
pub mod persistence;
pub mod roster_loader;

pub use distance::{CsvDistanceTable, DistanceError, DistanceService};
pub use persistence::CsvTripLog;
pub use roster_loader::load_roster;
