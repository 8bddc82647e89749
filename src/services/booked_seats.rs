use std::collections::HashSet;
use tracing::{info, warn};

use crate::models::{SeatCode, SeatLayout};
use crate::sheet_client::BookingBackend;

/// Множество уже занятых мест одного мероприятия.
///
/// Загружается один раз при открытии страницы и дальше только растёт:
/// после успешной отправки сюда добавляются только что забронированные места.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookedSeatRegistry {
    seats: HashSet<SeatCode>,
}

impl BookedSeatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Запрашивает занятые места у таблицы. При любой ошибке реестр остаётся
    /// пустым: рисовать схему зала это не мешает.
    pub async fn load<B: BookingBackend>(backend: &B, event_id: &str, layout: &SeatLayout) -> Self {
        match backend.fetch_booked_seats(event_id).await {
            Ok(raw) => {
                let registry = Self::from_raw(&raw, layout);
                info!("Event {} has {} booked seats", event_id, registry.len());
                registry
            }
            Err(e) => {
                warn!("Failed to load booked seats for {}: {}", event_id, e);
                Self::new()
            }
        }
    }

    // Коды вне зала отбрасываются
    fn from_raw(raw: &[String], layout: &SeatLayout) -> Self {
        let seats = raw
            .iter()
            .filter_map(|code| {
                let seat = layout.parse(code);
                if seat.is_none() {
                    warn!("Ignoring unknown booked seat {:?}", code);
                }
                seat
            })
            .collect();
        Self { seats }
    }

    pub fn merge(&mut self, seats: impl IntoIterator<Item = SeatCode>) {
        self.seats.extend(seats);
    }

    pub fn contains(&self, seat: &SeatCode) -> bool {
        self.seats.contains(seat)
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Коды в порядке ряд/номер.
    pub fn sorted(&self) -> Vec<SeatCode> {
        let mut seats: Vec<SeatCode> = self.seats.iter().copied().collect();
        seats.sort();
        seats
    }
}
