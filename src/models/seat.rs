use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LayoutError;

/// Код места: буква ряда + номер места в ряду (с единицы), например `B4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatCode {
    row: char,
    number: u16,
}

impl SeatCode {
    pub fn new(row: char, number: u16) -> Self {
        Self { row, number }
    }

    pub fn row(&self) -> char {
        self.row
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for SeatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid seat code {0:?}")]
pub struct InvalidSeatCode(pub String);

impl FromStr for SeatCode {
    type Err = InvalidSeatCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let row = chars
            .next()
            .filter(|c| c.is_ascii_alphabetic())
            .ok_or_else(|| InvalidSeatCode(s.to_string()))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidSeatCode(s.to_string()));
        }
        let number: u16 = digits.parse().map_err(|_| InvalidSeatCode(s.to_string()))?;
        if number == 0 {
            return Err(InvalidSeatCode(s.to_string()));
        }
        Ok(SeatCode { row, number })
    }
}

impl TryFrom<String> for SeatCode {
    type Error = InvalidSeatCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatCode> for String {
    fn from(code: SeatCode) -> Self {
        code.to_string()
    }
}

/// Схема зала: фиксированные ряды и одинаковое число мест в каждом ряду.
/// Одна и та же для всех мероприятий, задаётся конфигурацией.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatLayout {
    rows: Vec<char>,
    seats_per_row: u16,
}

impl Default for SeatLayout {
    fn default() -> Self {
        Self {
            rows: vec!['A', 'B', 'C', 'D', 'E', 'F'],
            seats_per_row: 10,
        }
    }
}

impl SeatLayout {
    pub fn new(rows: impl IntoIterator<Item = char>, seats_per_row: u16) -> Result<Self, LayoutError> {
        let rows: Vec<char> = rows.into_iter().collect();
        if rows.is_empty() {
            return Err(LayoutError::NoRows);
        }
        if seats_per_row == 0 {
            return Err(LayoutError::NoSeats);
        }
        for (i, row) in rows.iter().enumerate() {
            if !row.is_ascii_alphabetic() {
                return Err(LayoutError::InvalidRow(*row));
            }
            if rows[..i].contains(row) {
                return Err(LayoutError::DuplicateRow(*row));
            }
        }
        Ok(Self { rows, seats_per_row })
    }

    pub fn rows(&self) -> &[char] {
        &self.rows
    }

    pub fn seats_per_row(&self) -> u16 {
        self.seats_per_row
    }

    /// Размер вселенной мест.
    pub fn capacity(&self) -> usize {
        self.rows.len() * self.seats_per_row as usize
    }

    pub fn contains(&self, code: &SeatCode) -> bool {
        self.rows.contains(&code.row) && (1..=self.seats_per_row).contains(&code.number)
    }

    /// Разбирает строку и проверяет, что место существует в этом зале.
    pub fn parse(&self, raw: &str) -> Option<SeatCode> {
        raw.parse().ok().filter(|code| self.contains(code))
    }

    /// Все места по рядам, слева направо.
    pub fn codes(&self) -> impl Iterator<Item = SeatCode> + '_ {
        self.rows
            .iter()
            .flat_map(move |&row| (1..=self.seats_per_row).map(move |n| SeatCode::new(row, n)))
    }
}
