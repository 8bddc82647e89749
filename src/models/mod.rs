pub mod event;
pub mod seat;
pub mod booking;

pub use event::{Catalog, Event};
pub use seat::{SeatCode, SeatLayout};
pub use booking::{BookingPayload, BookingRequest, ContactDetails, ContactForm};
