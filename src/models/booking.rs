use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::SubmitError;
use crate::models::{Event, SeatCode};

/// Поля контактной формы в том виде, как их ввёл посетитель.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl ContactForm {
    pub fn reset(&mut self) {
        *self = ContactForm::default();
    }

    /// Обрезает пробелы и проверяет, что все три поля заполнены.
    /// Формат email и телефона не проверяется.
    pub fn validated(&self) -> Result<ContactDetails, SubmitError> {
        let details = ContactDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
        };
        details.validate().map_err(|_| SubmitError::MissingDetails)?;
        Ok(details)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ContactDetails {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
}

/// Заявка на бронирование. Собирается заново на каждую попытку отправки.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub event_id: String,
    pub event_title: String,
    pub event_date: String,
    pub venue: String,
    seats: Vec<SeatCode>,
    pub contact: ContactDetails,
}

impl BookingRequest {
    /// Места проверяются раньше контактов: пустой выбор важнее пустой формы.
    pub fn new(event: &Event, seats: Vec<SeatCode>, form: &ContactForm) -> Result<Self, SubmitError> {
        if seats.is_empty() {
            return Err(SubmitError::NoSeats);
        }
        let contact = form.validated()?;
        Ok(Self {
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            event_date: event.date.clone().unwrap_or_default(),
            venue: event.venue.clone().unwrap_or_default(),
            seats,
            contact,
        })
    }

    pub fn seats(&self) -> &[SeatCode] {
        &self.seats
    }

    pub fn seats_field(&self) -> String {
        join_seats(&self.seats)
    }

    pub fn payload(&self) -> BookingPayload {
        BookingPayload {
            event_id: self.event_id.clone(),
            event_title: self.event_title.clone(),
            event_date: self.event_date.clone(),
            venue: self.venue.clone(),
            seats: self.seats_field(),
            name: self.contact.name.clone(),
            email: self.contact.email.clone(),
            phone: self.contact.phone.clone(),
        }
    }
}

/// JSON, который уходит в поле `data` формы.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub event_id: String,
    pub event_title: String,
    pub event_date: String,
    pub venue: String,
    pub seats: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

pub fn join_seats(seats: &[SeatCode]) -> String {
    seats.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
