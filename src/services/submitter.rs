//! Отправка брони.
//!
//! Жизненный цикл одной попытки:
//! `Idle -> Validating -> Idle` (ошибка валидации, сообщение посетителю),
//! `Idle -> Validating -> Submitting -> Idle` (отправлено или сетевая ошибка).
//! Промежуточного состояния "записано, но не подтверждено" нет: таблица
//! не возвращает подтверждения, успех предполагается оптимистично.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::{BackendError, SubmitError};
use crate::models::{BookingRequest, SeatCode};
use crate::services::PageSession;
use crate::sheet_client::{BookingBackend, Delivery};

pub const CONFIRMATION_MESSAGE: &str = "Booking submitted! We will contact you with details.";
pub const TRIGGER_LABEL: &str = "Confirm Booking";
pub const TRIGGER_BUSY_LABEL: &str = "Submitting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitPhase {
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub tone: Tone,
}

impl StatusMessage {
    // Пустая строка статуса на время отправки
    fn cleared() -> Self {
        Self { text: String::new(), tone: Tone::Neutral }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Error }
    }

    fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: Tone::Success }
    }
}

/// Что известно об отправленной брони.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub delivery: Delivery,
    pub seats: Vec<SeatCode>,
}

#[derive(Debug, Clone)]
pub struct BookingSubmitter {
    phase: SubmitPhase,
    status: Option<StatusMessage>,
}

impl Default for BookingSubmitter {
    fn default() -> Self {
        Self { phase: SubmitPhase::Idle, status: None }
    }
}

impl BookingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn trigger_label(&self) -> &'static str {
        if self.is_submitting() {
            TRIGGER_BUSY_LABEL
        } else {
            TRIGGER_LABEL
        }
    }

    /// Проверяет выбор и контакты и переводит кнопку в неактивное состояние.
    /// Пока попытка в полёте, повторный вызов возвращает `InFlight`.
    pub fn begin(&mut self, session: &PageSession) -> Result<BookingRequest, SubmitError> {
        if self.is_submitting() {
            warn!("Booking submission ignored: previous one is still in flight");
            return Err(SubmitError::InFlight);
        }

        self.phase = SubmitPhase::Validating;
        let seats = session.seat_map.selection().to_vec();
        match BookingRequest::new(&session.event, seats, &session.form) {
            Ok(request) => {
                self.phase = SubmitPhase::Submitting;
                self.status = Some(StatusMessage::cleared());
                Ok(request)
            }
            Err(e) => {
                self.phase = SubmitPhase::Idle;
                self.status = Some(StatusMessage::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Применяет результат отправки. Кнопка освобождается при любом исходе.
    pub fn finish(
        &mut self,
        session: &mut PageSession,
        request: &BookingRequest,
        result: Result<Delivery, BackendError>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        self.phase = SubmitPhase::Idle;

        match result {
            Ok(delivery) => {
                info!(
                    "Booking for event {} dispatched ({:?}): {}",
                    request.event_id,
                    delivery,
                    request.seats_field()
                );
                self.status = Some(StatusMessage::success(CONFIRMATION_MESSAGE));
                session.form.reset();
                session.registry.merge(request.seats().iter().copied());
                session.seat_map.clear_selection();
                session.seat_map.rebuild(&session.registry);
                Ok(SubmissionReceipt { delivery, seats: request.seats().to_vec() })
            }
            Err(e) => {
                // Выбор и форма не трогаем: посетитель может повторить
                error!("Booking error for event {}: {}", request.event_id, e);
                let err = SubmitError::Transport(e);
                self.status = Some(StatusMessage::error(err.to_string()));
                Err(err)
            }
        }
    }

    pub async fn submit<B: BookingBackend>(
        &mut self,
        session: &mut PageSession,
        backend: &B,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let request = self.begin(session)?;
        let result = backend.submit_booking(&request.payload()).await;
        self.finish(session, &request, result)
    }
}
