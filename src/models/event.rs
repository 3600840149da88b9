use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;

// Бэкенд отдаёт события в разнобой (title/name, location/venue),
// поэтому модель терпима к альтернативным именам полей.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub datetime_start: Option<NaiveDateTime>,
    #[serde(default, alias = "venue")]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_alternate_field_names() {
        let event: Event = serde_json::from_str(
            r#"{"id": 7, "name": "Summer Music Festival", "venue": "Event Venue"}"#,
        )
        .unwrap();
        assert_eq!(event.title, "Summer Music Festival");
        assert_eq!(event.location.as_deref(), Some("Event Venue"));
        assert!(event.datetime_start.is_none());
    }
}
