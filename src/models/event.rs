use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Мероприятие из каталога. Не меняется в течение сессии страницы.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

/// Документ каталога: `{"events": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
}

impl Catalog {
    /// Точное (с учётом регистра) совпадение идентификатора.
    pub fn find(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }
}

impl Event {
    /// Дата в виде `01 May 2024`; нераспознанная дата выводится как есть.
    pub fn date_label(&self) -> String {
        match self.date.as_deref() {
            None | Some("") => String::new(),
            Some(raw) => format_date_label(raw),
        }
    }

    /// Строка под заголовком: `площадка • дата`.
    pub fn meta_line(&self) -> String {
        format!("{} • {}", self.venue.as_deref().unwrap_or_default(), self.date_label())
    }
}

// `null` в каталоге считается отсутствующим полем
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn format_date_label(raw: &str) -> String {
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    });
    match parsed {
        Some(date) => date.format("%d %b %Y").to_string(),
        None => raw.to_string(),
    }
}
