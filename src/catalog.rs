use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ряды зала: A–J, по 10 мест в каждом.
pub const ROWS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];
pub const COLS_PER_ROW: u8 = 10;

/// Сбор за бронирование (фиксированный, если выбрано хотя бы одно место).
pub const BOOKING_FEE: f64 = 15.0;
/// Комиссия платформы: 2% от (сумма мест + сбор).
pub const PLATFORM_CHARGE_RATE: f64 = 0.02;

/// Идентификатор места: буква ряда + номер колонки, например "A1" или "J10".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: char,
    col: u8,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid seat id '{0}': expected row A-J and column 1-10")]
pub struct ParseSeatIdError(String);

impl SeatId {
    /// Создаёт идентификатор, если координаты попадают в сетку 10x10.
    pub fn new(row: char, col: u8) -> Result<Self, ParseSeatIdError> {
        let row = row.to_ascii_uppercase();
        if !ROWS.contains(&row) || col < 1 || col > COLS_PER_ROW {
            return Err(ParseSeatIdError(format!("{}{}", row, col)));
        }
        Ok(SeatId { row, col })
    }

    pub fn row(&self) -> char {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn category(&self) -> SeatCategory {
        SeatCategory::of_row(self.row)
    }

    pub fn price(&self) -> f64 {
        self.category().price()
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.col)
    }
}

impl FromStr for SeatId {
    type Err = ParseSeatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let row = chars
            .next()
            .ok_or_else(|| ParseSeatIdError(trimmed.to_string()))?;
        let col: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| ParseSeatIdError(trimmed.to_string()))?;
        SeatId::new(row, col).map_err(|_| ParseSeatIdError(trimmed.to_string()))
    }
}

impl TryFrom<String> for SeatId {
    type Error = ParseSeatIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

/// Категория места, однозначно определяется рядом.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatCategory {
    Vip,
    Normal,
    Balcony,
}

impl SeatCategory {
    pub fn of_row(row: char) -> Self {
        match row.to_ascii_uppercase() {
            'A' | 'B' => SeatCategory::Vip,
            'C'..='H' => SeatCategory::Normal,
            _ => SeatCategory::Balcony,
        }
    }

    pub fn price(self) -> f64 {
        match self {
            SeatCategory::Vip => 150.0,
            SeatCategory::Normal => 100.0,
            SeatCategory::Balcony => 50.0,
        }
    }
}

impl fmt::Display for SeatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeatCategory::Vip => "VIP",
            SeatCategory::Normal => "Middle",
            SeatCategory::Balcony => "Standard",
        };
        f.write_str(label)
    }
}

/// Все 100 мест зала в порядке ряд-за-рядом.
pub fn grid() -> impl Iterator<Item = SeatId> {
    ROWS.into_iter()
        .flat_map(|row| (1..=COLS_PER_ROW).map(move |col| SeatId { row, col }))
}

/// Итог заказа: места + сбор + комиссия платформы.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderSummary {
    pub seat_count: usize,
    pub subtotal: f64,
    pub booking_fee: f64,
    pub platform_charge: f64,
    pub total: f64,
}

impl OrderSummary {
    pub fn for_seats<'a, I>(seats: I) -> Self
    where
        I: IntoIterator<Item = &'a SeatId>,
    {
        let mut seat_count = 0;
        let mut subtotal = 0.0;
        for seat in seats {
            seat_count += 1;
            subtotal += seat.price();
        }
        let booking_fee = if seat_count > 0 { BOOKING_FEE } else { 0.0 };
        let platform_charge = (subtotal + booking_fee) * PLATFORM_CHARGE_RATE;
        OrderSummary {
            seat_count,
            subtotal,
            booking_fee,
            platform_charge,
            total: subtotal + booking_fee + platform_charge,
        }
    }
}
