//! api.rs
//!
//! Типизированный клиент REST API билетного бэкенда. Один общий
//! `reqwest::Client` с таймаутом из конфигурации, bearer-токен (если задан)
//! добавляется к каждому запросу.
//!
//! Единственный метод с особым контрактом - `booked_seats`: опрос
//! доступности деградирует до пустого списка на ЛЮБОЙ ошибке, потому что
//! недоступный бэкенд не должен блокировать страницу выбора мест; продажа
//! как источник истины живёт на сервере, а следующий тик опроса - это и
//! есть retry. Остальные методы возвращают `Result` как обычно.

use crate::catalog::SeatId;
use crate::config::ApiConfig;
use crate::models::{Booking, Event};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// 401 от бэкенда: токен истёк, пользователя нужно разлогинить.
    #[error("authorization required")]
    Unauthorized,
}

/// Клиент REST API бэкенда.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

// --- Модели запросов/ответов ---

/// Запрос на создание бронирования, payload как у веб-клиента.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub customer_id: i64,
    pub event_id: i64,
    pub number_of_seats: u32,
    pub total_amount: f64,
    pub amount: f64,
    /// Места через запятую ("A1,I1") - так их ждёт бэкенд.
    pub seats: String,
    pub status: String,
}

impl CreateBookingRequest {
    pub fn new(customer_id: i64, event_id: i64, seats: &[SeatId], total_amount: f64) -> Self {
        let joined = seats
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        CreateBookingRequest {
            customer_id,
            event_id,
            number_of_seats: seats.len() as u32,
            total_amount,
            amount: total_amount,
            seats: joined,
            status: "pending".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkSeatsSoldRequest<'a> {
    event_id: i64,
    seat_ids: &'a [SeatId],
}

// Бэкенд непоследователен в формате ответов, принимаем все известные формы
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BookedSeatsResponse {
    List(Vec<SeatId>),
    Wrapped {
        #[serde(rename = "bookedSeats")]
        booked_seats: Vec<SeatId>,
    },
    Seats {
        seats: Vec<SeatId>,
    },
}

impl BookedSeatsResponse {
    fn into_seats(self) -> Vec<SeatId> {
        match self {
            BookedSeatsResponse::List(seats) => seats,
            BookedSeatsResponse::Wrapped { booked_seats } => booked_seats,
            BookedSeatsResponse::Seats { seats } => seats,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventsResponse {
    List(Vec<Event>),
    Wrapped { events: Vec<Event> },
    Data { data: Vec<Event> },
}

impl EventsResponse {
    fn into_events(self) -> Vec<Event> {
        match self {
            EventsResponse::List(events) => events,
            EventsResponse::Wrapped { events } => events,
            EventsResponse::Data { data } => data,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventResponse {
    Wrapped { event: Event },
    Bare(Event),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BookingResponse {
    Wrapped { booking: Booking },
    Bare(Booking),
}

impl ApiClient {
    /// Создает и конфигурирует клиент на основе настроек приложения.
    pub fn from_config(config: &ApiConfig) -> Self {
        ApiClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            token: config.token.clone(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_auth(self.http.get(format!("{}{}", self.base_url, path)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.with_auth(self.http.post(format!("{}{}", self.base_url, path)))
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        Ok(resp.error_for_status()?)
    }

    /// Проданные места события. Любая ошибка - пустой список плюс warn,
    /// следующий тик опроса попробует снова.
    pub async fn booked_seats(&self, event_id: i64) -> Vec<SeatId> {
        match self.try_booked_seats(event_id).await {
            Ok(seats) => seats,
            Err(e) => {
                warn!("failed to fetch booked seats for event {}: {}", event_id, e);
                vec![]
            }
        }
    }

    async fn try_booked_seats(&self, event_id: i64) -> Result<Vec<SeatId>, ApiError> {
        let resp = self
            .get(&format!("/seats/booked/{}", event_id))
            .send()
            .await?;
        let body: BookedSeatsResponse = Self::check_status(resp)?.json().await?;
        Ok(body.into_seats())
    }

    pub async fn events(&self) -> Result<Vec<Event>, ApiError> {
        let resp = self.get("/events").send().await?;
        let body: EventsResponse = Self::check_status(resp)?.json().await?;
        Ok(body.into_events())
    }

    pub async fn event(&self, event_id: i64) -> Result<Event, ApiError> {
        let resp = self.get(&format!("/events/{}", event_id)).send().await?;
        let body: EventResponse = Self::check_status(resp)?.json().await?;
        Ok(match body {
            EventResponse::Wrapped { event } => event,
            EventResponse::Bare(event) => event,
        })
    }

    pub async fn create_booking(&self, req: &CreateBookingRequest) -> Result<Booking, ApiError> {
        let resp = self.post("/bookings").json(req).send().await?;
        let body: BookingResponse = Self::check_status(resp)?.json().await?;
        Ok(match body {
            BookingResponse::Wrapped { booking } => booking,
            BookingResponse::Bare(booking) => booking,
        })
    }

    pub async fn mark_seats_sold(&self, event_id: i64, seats: &[SeatId]) -> Result<(), ApiError> {
        let resp = self
            .post("/seats/mark-sold")
            .json(&MarkSeatsSoldRequest {
                event_id,
                seat_ids: seats,
            })
            .send()
            .await?;
        Self::check_status(resp)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String, token: Option<String>) -> ApiClient {
        ApiClient::from_config(&ApiConfig {
            base_url,
            timeout_seconds: 5,
            token,
        })
    }

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn booked_seats_accepts_bare_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seats/booked/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["A1", "C5"])))
            .mount(&server)
            .await;

        let api = client(server.uri(), None);
        assert_eq!(api.booked_seats(1).await, vec![seat("A1"), seat("C5")]);
    }

    #[tokio::test]
    async fn booked_seats_accepts_wrapped_shapes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seats/booked/1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"bookedSeats": ["B2"]})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/seats/booked/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"seats": ["J10"]})))
            .mount(&server)
            .await;

        let api = client(server.uri(), None);
        assert_eq!(api.booked_seats(1).await, vec![seat("B2")]);
        assert_eq!(api.booked_seats(2).await, vec![seat("J10")]);
    }

    #[tokio::test]
    async fn booked_seats_degrades_to_empty_on_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seats/booked/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let api = client(server.uri(), None);
        assert!(api.booked_seats(1).await.is_empty());
    }

    #[tokio::test]
    async fn booked_seats_degrades_to_empty_when_backend_unreachable() {
        // порт 1 закрыт, соединение отклоняется сразу
        let api = client("http://127.0.0.1:1".to_string(), None);
        assert!(api.booked_seats(1).await.is_empty());
    }

    #[tokio::test]
    async fn booked_seats_degrades_to_empty_on_malformed_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/seats/booked/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Z99"])))
            .mount(&server)
            .await;

        let api = client(server.uri(), None);
        assert!(api.booked_seats(1).await.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_is_a_distinct_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let api = client(server.uri(), None);
        assert!(matches!(api.events().await, Err(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn bearer_token_is_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let api = client(server.uri(), Some("test-token".to_string()));
        assert!(api.events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn events_accepts_wrapped_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"events": [{"id": 1, "title": "Summer Music Festival"}]}),
            ))
            .mount(&server)
            .await;

        let api = client(server.uri(), None);
        let events = api.events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Summer Music Festival");
    }

    #[tokio::test]
    async fn create_booking_sends_expected_payload() {
        let server = MockServer::start().await;
        let req = CreateBookingRequest::new(7, 1, &[seat("A1"), seat("I1")], 219.30);
        Mock::given(method("POST"))
            .and(path("/bookings"))
            .and(body_json(json!({
                "customerId": 7,
                "eventId": 1,
                "numberOfSeats": 2,
                "totalAmount": 219.30,
                "amount": 219.30,
                "seats": "A1,I1",
                "status": "pending",
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"booking": {"id": 42}})),
            )
            .mount(&server)
            .await;

        let api = client(server.uri(), None);
        let booking = api.create_booking(&req).await.unwrap();
        assert_eq!(booking.id, 42);
    }

    #[tokio::test]
    async fn mark_seats_sold_posts_seat_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/seats/mark-sold"))
            .and(body_json(json!({"eventId": 1, "seatIds": ["A1", "I1"]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(server.uri(), None);
        api.mark_seats_sold(1, &[seat("A1"), seat("I1")]).await.unwrap();
    }
}
