use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{BackendError, LookupError, SubmitError};
use crate::models::{BookingRequest, ContactForm, Event, SeatCode, SeatLayout};
use crate::services::seat_map::SeatRow;
use crate::services::submitter::{StatusMessage, SubmissionReceipt};
use crate::services::{
    BookedSeatRegistry, BookingSubmitter, EventLookup, SeatActivation, SeatMap, SubmitPhase,
};
use crate::sheet_client::{BookingBackend, Delivery};

pub const NO_EVENT_PLACEHOLDER: &str = "No event selected.";

/// Адресный контекст страницы: `?eventId=...`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(rename = "eventId")]
    pub event_id: Option<String>,
}

impl PageQuery {
    pub fn parse(query: &str) -> Self {
        serde_urlencoded::from_str(query.trim_start_matches('?')).unwrap_or_else(|e| {
            warn!("Unreadable page query {:?}: {}", query, e);
            PageQuery::default()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePhase {
    NoEvent,
    NotFound,
    LoadError,
    Ready,
}

/// Состояние одной открытой страницы: создаётся при загрузке,
/// уничтожается при уходе со страницы.
#[derive(Debug, Clone)]
pub struct PageSession {
    pub event: Event,
    pub registry: BookedSeatRegistry,
    pub seat_map: SeatMap,
    pub form: ContactForm,
}

/// Снимок всего, что показывает страница.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub phase: PagePhase,
    pub title: String,
    pub meta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_grid: Option<Vec<SeatRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    pub selected_seats_label: String,
    pub selected_seats: String,
    pub form: ContactForm,
    pub status: Option<StatusMessage>,
    pub submit_phase: SubmitPhase,
    pub submit_enabled: bool,
    pub submit_label: &'static str,
}

/// Загрузка мероприятия, занятых мест, отрисовка схемы и отправка брони.
pub struct PageController<B> {
    backend: B,
    phase: PagePhase,
    session: Option<PageSession>,
    submitter: BookingSubmitter,
}

impl<B: BookingBackend> PageController<B> {
    /// Открывает страницу по строке запроса (`eventId=ev1`).
    pub async fn open(backend: B, layout: SeatLayout, query: &str) -> Self {
        let query = PageQuery::parse(query);
        Self::open_event(backend, layout, query.event_id.as_deref()).await
    }

    /// Мероприятие -> занятые места -> схема зала, строго по очереди.
    pub async fn open_event(backend: B, layout: SeatLayout, event_id: Option<&str>) -> Self {
        let lookup = EventLookup::new(&backend).resolve(event_id).await;

        let (phase, session) = match lookup {
            Ok(event) => {
                let registry = BookedSeatRegistry::load(&backend, &event.id, &layout).await;
                let mut seat_map = SeatMap::new(layout);
                seat_map.rebuild(&registry);
                let session = PageSession {
                    event,
                    registry,
                    seat_map,
                    form: ContactForm::default(),
                };
                (PagePhase::Ready, Some(session))
            }
            Err(LookupError::MissingEventId) => {
                info!("Booking page opened without event id");
                (PagePhase::NoEvent, None)
            }
            Err(LookupError::NotFound(id)) => {
                warn!("Event {} not found in catalog", id);
                (PagePhase::NotFound, None)
            }
            Err(LookupError::Catalog(_)) => (PagePhase::LoadError, None),
        };

        Self {
            backend,
            phase,
            session,
            submitter: BookingSubmitter::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&PageSession> {
        self.session.as_ref()
    }

    pub fn submitter(&self) -> &BookingSubmitter {
        &self.submitter
    }

    /// Клик по месту. Пока бронь отправляется, клики игнорируются.
    pub fn activate_seat(&mut self, code: SeatCode) -> SeatActivation {
        if self.submitter.is_submitting() {
            return SeatActivation::Ignored;
        }
        match self.session.as_mut() {
            Some(session) => session.seat_map.activate(code, &session.registry),
            None => SeatActivation::Ignored,
        }
    }

    pub fn update_form(&mut self, form: ContactForm) {
        if let Some(session) = self.session.as_mut() {
            session.form = form;
        }
    }

    pub fn begin_submission(&mut self) -> Result<BookingRequest, SubmitError> {
        let session = self.session.as_ref().ok_or(SubmitError::NoEvent)?;
        self.submitter.begin(session)
    }

    pub fn finish_submission(
        &mut self,
        request: &BookingRequest,
        result: Result<Delivery, BackendError>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let session = self.session.as_mut().ok_or(SubmitError::NoEvent)?;
        self.submitter.finish(session, request, result)
    }

    pub async fn submit(&mut self) -> Result<SubmissionReceipt, SubmitError> {
        let session = self.session.as_mut().ok_or(SubmitError::NoEvent)?;
        self.submitter.submit(session, &self.backend).await
    }

    pub fn view(&self) -> PageView {
        let (title, meta) = match (self.phase, self.session.as_ref()) {
            (PagePhase::Ready, Some(session)) => {
                (session.event.title.clone(), session.event.meta_line())
            }
            (PagePhase::LoadError, _) => ("Error loading event".into(), "Please try again later.".into()),
            (PagePhase::NoEvent, _) => ("Event not found".into(), "Missing event ID.".into()),
            _ => (
                "Event not found".into(),
                "Please go back and choose an event again.".into(),
            ),
        };

        let session = self.session.as_ref();
        PageView {
            phase: self.phase,
            title,
            meta,
            event: session.map(|s| s.event.clone()),
            seat_grid: session.map(|s| s.seat_map.rows().to_vec()),
            placeholder: (self.phase == PagePhase::NoEvent).then_some(NO_EVENT_PLACEHOLDER),
            selected_seats_label: session
                .map(|s| s.seat_map.selection_label())
                .unwrap_or_else(|| "None".to_string()),
            selected_seats: session.map(|s| s.seat_map.selection_field()).unwrap_or_default(),
            form: session.map(|s| s.form.clone()).unwrap_or_default(),
            status: self.submitter.status().cloned(),
            submit_phase: self.submitter.phase(),
            submit_enabled: session.is_some() && !self.submitter.is_submitting(),
            submit_label: self.submitter.trigger_label(),
        }
    }
}
