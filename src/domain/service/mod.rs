//! Domain services

pub mod fare_calculator;
pub mod seat_assigner;
pub mod summary;

pub use fare_calculator::{base_amount_for_distance, calculate_fare, FareBreakdown, FareInput, FARE_TIERS};
pub use seat_assigner::{assign_seats, AssignmentOptions, SeatAssignment, VehicleAssignment};
pub use summary::{summarize, MonthlySummary};
