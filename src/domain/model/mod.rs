pub mod amount;
pub mod roster;
pub mod trip_record;

pub use amount::{Amount, PENDING_LABEL};
pub use roster::{Driver, Participant, Roster};
pub use trip_record::{TollUsage, TripRecord, PENDING_NOTE};
