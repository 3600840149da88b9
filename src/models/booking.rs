use serde::{Deserialize, Serialize};

// Ответ бэкенда на создание бронирования. Часть полей опциональна:
// разные версии API возвращают разный набор.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub event_id: Option<i64>,
    #[serde(default)]
    pub number_of_seats: Option<u32>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_response_parses() {
        let booking: Booking = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(booking.id, 42);
        assert!(booking.status.is_none());
    }

    #[test]
    fn full_response_parses() {
        let booking: Booking = serde_json::from_str(
            r#"{"id": 1, "eventId": 3, "numberOfSeats": 2, "totalAmount": 219.3, "status": "pending"}"#,
        )
        .unwrap();
        assert_eq!(booking.event_id, Some(3));
        assert_eq!(booking.number_of_seats, Some(2));
    }
}
