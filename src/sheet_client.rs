use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::BackendConfig;
use crate::error::{BackendError, CatalogError};
use crate::models::{BookingPayload, Catalog};

/// Чем закончилась отправка брони.
///
/// Таблица принимает запись в режиме fire-and-forget: ответ не читается,
/// поэтому успешная отправка означает лишь то, что запрос ушёл.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delivery {
    /// Запрос отправлен без транспортной ошибки, подтверждения нет.
    Optimistic,
    /// Бэкенд явно подтвердил запись.
    Acknowledged,
}

/// Внешние коллабораторы страницы: каталог и таблица бронирований.
pub trait BookingBackend {
    fn load_catalog(&self) -> impl Future<Output = Result<Catalog, CatalogError>> + Send;

    /// Сырые коды занятых мест для мероприятия.
    fn fetch_booked_seats(
        &self,
        event_id: &str,
    ) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send;

    fn submit_booking(
        &self,
        payload: &BookingPayload,
    ) -> impl Future<Output = Result<Delivery, BackendError>> + Send;
}

/// Откуда берётся каталог мероприятий
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Remote(String),
    File(PathBuf),
}

impl CatalogSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            CatalogSource::Remote(raw.to_string())
        } else {
            CatalogSource::File(PathBuf::from(raw))
        }
    }
}

#[derive(Debug, Deserialize)]
struct BookedSeatsResponse {
    #[serde(rename = "bookedSeats")]
    booked_seats: Option<serde_json::Value>,
}

/// Клиент для таблицы бронирований (Apps Script endpoint)
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: Client,
    script_url: String,
    catalog: CatalogSource,
}

impl SheetClient {
    pub fn new(config: &BackendConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            script_url: config.script_url.clone(),
            catalog: CatalogSource::parse(&config.events_source),
        })
    }

    pub fn catalog_source(&self) -> &CatalogSource {
        &self.catalog
    }
}

impl BookingBackend for SheetClient {
    async fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = match &self.catalog {
            CatalogSource::Remote(url) => {
                let response = self.http.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(CatalogError::Status(response.status().as_u16()));
                }
                let body = response.bytes().await?;
                serde_json::from_slice(&body)?
            }
            CatalogSource::File(path) => {
                let body = tokio::fs::read(path).await?;
                serde_json::from_slice(&body)?
            }
        };
        info!("Loaded {} events from {:?}", catalog.events.len(), self.catalog);
        Ok(catalog)
    }

    async fn fetch_booked_seats(&self, event_id: &str) -> Result<Vec<String>, BackendError> {
        let response = self
            .http
            .get(&self.script_url)
            .query(&[("eventId", event_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let parsed: BookedSeatsResponse = serde_json::from_slice(&body)
            .map_err(|e| BackendError::Malformed(e.to_string()))?;

        match parsed.booked_seats {
            Some(serde_json::Value::Array(items)) => Ok(items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()),
            Some(other) => Err(BackendError::Malformed(format!("bookedSeats is not a list: {other}"))),
            None => Err(BackendError::Malformed("bookedSeats is missing".to_string())),
        }
    }

    async fn submit_booking(&self, payload: &BookingPayload) -> Result<Delivery, BackendError> {
        let data = serde_json::to_string(payload)?;
        let response = self
            .http
            .post(&self.script_url)
            .form(&[("data", data)])
            .send()
            .await?;

        // Ответ непрозрачен: статус только логируем
        debug!("Booking dispatched for event {}, backend status {}", payload.event_id, response.status());
        Ok(Delivery::Optimistic)
    }
}
