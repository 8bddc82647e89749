pub mod event_lookup;
pub mod booked_seats;
pub mod seat_map;
pub mod submitter;
pub mod page;

pub use booked_seats::BookedSeatRegistry;
pub use event_lookup::EventLookup;
pub use page::{PageController, PagePhase, PageSession, PageView};
pub use seat_map::{SeatActivation, SeatMap, SeatState};
pub use submitter::{BookingSubmitter, SubmitPhase};
