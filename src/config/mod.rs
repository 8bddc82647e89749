use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::SeatLayout;

// Главная структура конфигурации - контейнер для всех настроек
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub backend: BackendConfig,
    pub seating: SeatLayout,
    pub sessions: SessionConfig,
}

// Настройки приложения
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

// Таблица бронирований и каталог мероприятий
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub script_url: String,
    /// URL (`http(s)://`) или путь к JSON-файлу каталога.
    pub events_source: String,
    pub timeout: Duration,
}

// Время жизни открытых страниц без обращений
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl: Duration,
    pub sweep_interval: Duration,
}

// Плоское представление переменных окружения
#[derive(Debug, Deserialize)]
struct EnvSettings {
    host: String,
    port: u16,
    rust_log: String,
    script_url: String,
    events_source: String,
    http_timeout_seconds: u64,
    seat_rows: String,
    seats_per_row: u16,
    session_ttl_seconds: u64,
    session_sweep_seconds: u64,
}

impl Config {
    /// Значения по умолчанию, переопределяемые переменными окружения
    /// (`PORT`, `SCRIPT_URL`, `SEAT_ROWS`, ...).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(config::Environment::default())
    }

    pub fn load(env: config::Environment) -> Result<Self, ConfigError> {
        let settings: EnvSettings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("rust_log", "seat_booking=debug,tower_http=debug")?
            .set_default("script_url", "http://localhost:8080/exec")?
            .set_default("events_source", "data/live-events.json")?
            .set_default("http_timeout_seconds", 30)?
            .set_default("seat_rows", "ABCDEF")?
            .set_default("seats_per_row", 10)?
            .set_default("session_ttl_seconds", 1800)?
            .set_default("session_sweep_seconds", 60)?
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        let seating = SeatLayout::new(settings.seat_rows.trim().chars(), settings.seats_per_row)?;

        Ok(Config {
            app: AppConfig {
                host: settings.host,
                port: settings.port,
                rust_log: settings.rust_log,
            },
            backend: BackendConfig {
                script_url: settings.script_url,
                events_source: settings.events_source,
                timeout: Duration::from_secs(settings.http_timeout_seconds),
            },
            seating,
            sessions: SessionConfig {
                ttl: Duration::from_secs(settings.session_ttl_seconds),
                sweep_interval: Duration::from_secs(settings.session_sweep_seconds.max(1)),
            },
        })
    }
}
