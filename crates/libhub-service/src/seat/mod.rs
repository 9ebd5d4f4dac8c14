//! Seat ledger: check-in, check-out, transfer and occupancy.

pub mod ledger;
pub mod policy;

pub use ledger::{PoolOccupancy, SeatAvailability, SeatLedger};
pub use policy::SeatPolicy;
