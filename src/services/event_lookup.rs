use tracing::{error, info};

use crate::error::LookupError;
use crate::models::Event;
use crate::sheet_client::BookingBackend;

/// Поиск мероприятия по идентификатору из адресной строки.
pub struct EventLookup<'a, B> {
    backend: &'a B,
}

impl<'a, B: BookingBackend> EventLookup<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Без идентификатора каталог не запрашивается вовсе.
    pub async fn resolve(&self, event_id: Option<&str>) -> Result<Event, LookupError> {
        let event_id = match event_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(LookupError::MissingEventId),
        };

        let catalog = self.backend.load_catalog().await.map_err(|e| {
            error!("Failed to load events catalog: {}", e);
            LookupError::from(e)
        })?;

        match catalog.find(event_id) {
            Some(event) => {
                info!("Resolved event {} ({})", event.id, event.title);
                Ok(event.clone())
            }
            None => Err(LookupError::NotFound(event_id.to_string())),
        }
    }
}
