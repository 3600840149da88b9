//! Оформление заказа: валидация платёжной формы и вызов бэкенда.
//!
//! Сама оплата - зона ответственности бэкенда; клиент лишь проверяет
//! форму, создаёт бронирование и рассылает уведомление "места проданы",
//! чтобы страница выбора мест обновилась не дожидаясь опроса.

use crate::catalog::{OrderSummary, SeatId};
use crate::seating::SeatSession;
use crate::services::api::CreateBookingRequest;
use crate::services::{ApiError, AuthProvider};
use crate::AppState;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::{Validate, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("payment form is invalid: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("no user is logged in")]
    NotAuthenticated,
    #[error("no seats selected")]
    EmptySelection,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Платёжная форма со страницы чекаута.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(length(min = 1, message = "Cardholder name is required"))]
    pub cardholder_name: String,
    #[validate(email(message = "Valid email required"))]
    pub email: String,
    #[validate(custom(function = validate_card_number))]
    pub card_number: String,
    #[validate(custom(function = validate_expiry))]
    pub expiry_date: String,
    #[validate(custom(function = validate_cvv))]
    pub cvv: String,
}

fn form_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

// Номер карты: ровно 16 цифр, пробелы допустимы
fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    let digits: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() == 16 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(form_error("card_number", "Valid card number required (16 digits)"))
    }
}

// Срок действия в формате MM/YY
fn validate_expiry(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let ok = bytes.len() == 5
        && bytes[2] == b'/'
        && value[..2].chars().all(|c| c.is_ascii_digit())
        && value[3..].chars().all(|c| c.is_ascii_digit())
        && matches!(value[..2].parse::<u8>(), Ok(1..=12));
    if ok {
        Ok(())
    } else {
        Err(form_error("expiry_date", "Valid expiry date required (MM/YY)"))
    }
}

fn validate_cvv(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(form_error("cvv", "Valid CVV required (3 digits)"))
    }
}

/// Подтверждение успешного заказа.
#[derive(Debug, Clone, Serialize)]
pub struct Confirmation {
    pub booking_id: i64,
    pub ticket_id: String,
    pub seats: Vec<SeatId>,
    pub summary: OrderSummary,
}

/// Полный путь оформления: форма -> пользователь -> бронирование ->
/// пометка мест проданными -> локальное уведомление.
pub async fn place_order(
    state: &AppState,
    session: &SeatSession,
    auth: &dyn AuthProvider,
    form: &CheckoutForm,
) -> Result<Confirmation, CheckoutError> {
    form.validate()?;
    let user = auth.current_user().ok_or(CheckoutError::NotAuthenticated)?;

    let seats = session.selected();
    if seats.is_empty() {
        return Err(CheckoutError::EmptySelection);
    }
    let summary = OrderSummary::for_seats(&seats);

    let request = CreateBookingRequest::new(user.id, session.event_id(), &seats, summary.total);
    let booking = state.api.create_booking(&request).await?;
    info!(
        "booking {} created for {}: {} seats, total {:.2}",
        booking.id,
        user.email,
        seats.len(),
        summary.total
    );

    // Неудача здесь не отменяет уже созданное бронирование
    if let Err(e) = state.api.mark_seats_sold(session.event_id(), &seats).await {
        warn!("could not mark seats as sold on backend: {}", e);
    }

    // Мгновенное обновление своей и соседних сессий, не дожидаясь опроса
    session.seats_sold(&seats);

    let ticket_id = booking.ticket_id.clone().unwrap_or_else(|| {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("TKT-{}-{}", booking.id, suffix[..5].to_uppercase())
    });

    Ok(Confirmation {
        booking_id: booking.id,
        ticket_id,
        seats,
        summary,
    })
}
