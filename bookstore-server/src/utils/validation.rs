//! Input validation helpers
//!
//! Field limits for every payload the API accepts. Failures are reported as
//! `ValidationFailed` with the offending field in `details.field`.

use chrono::Utc;
use shared::models::{
    AuthorPayload, BookPayload, CustomerPayload, OrderPayload, OrderStatus, RegisterRequest, Role,
    SearchCriteria,
};
use validator::ValidateEmail;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

pub const MAX_TITLE_LEN: usize = 200;

/// Author first / last name
pub const MIN_PERSON_NAME_LEN: usize = 2;
pub const MAX_PERSON_NAME_LEN: usize = 50;

pub const MAX_BIO_LEN: usize = 1000;

/// Customer and user display name
pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 100;

pub const MIN_STREET_LEN: usize = 5;
pub const MAX_STREET_LEN: usize = 100;

/// City, state, country
pub const MIN_REGION_LEN: usize = 2;
pub const MAX_REGION_LEN: usize = 50;

pub const MIN_POSTAL_CODE_LEN: usize = 4;
pub const MAX_POSTAL_CODE_LEN: usize = 10;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 100;

// ── Generic helpers ─────────────────────────────────────────────────

fn field_error(field: &str, message: String) -> AppError {
    AppError::validation(message).with_detail("field", field)
}

/// Validate that a string's length (in chars, trimmed) is within `min..=max`.
pub fn validate_length(value: &str, field: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len < min {
        if min <= 1 {
            return Err(field_error(field, format!("{field} must not be empty")));
        }
        return Err(field_error(
            field,
            format!("{field} is too short ({len} chars, min {min})"),
        ));
    }
    if len > max {
        return Err(field_error(
            field,
            format!("{field} is too long ({len} chars, max {max})"),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(field_error(
            field,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    if !value.validate_email() {
        return Err(field_error(field, format!("{field} is not a valid email")));
    }
    Ok(())
}

fn validate_positive_id(value: i64, field: &str) -> Result<(), AppError> {
    if value <= 0 {
        return Err(field_error(field, format!("{field} must be positive")));
    }
    Ok(())
}

// ── Payload validation ──────────────────────────────────────────────

/// Field-level checks for a book. Author existence is checked by the handler.
pub fn validate_book(payload: &BookPayload) -> Result<(), AppError> {
    validate_length(&payload.title, "title", 1, MAX_TITLE_LEN)?;
    validate_positive_id(payload.author_id, "author_id")?;
    if payload.genres.iter().all(|g| g.trim().is_empty()) {
        return Err(field_error("genres", "at least one genre is required".into()));
    }
    if !payload.price.is_finite() || payload.price <= 0.0 {
        return Err(field_error("price", "price must be greater than 0".into()));
    }
    if payload.stock < 0 {
        return Err(field_error("stock", "stock must not be negative".into()));
    }
    if payload.published_at > Utc::now() {
        return Err(field_error(
            "published_at",
            "published_at must not be in the future".into(),
        ));
    }
    Ok(())
}

pub fn validate_author(payload: &AuthorPayload) -> Result<(), AppError> {
    validate_length(
        &payload.first_name,
        "first_name",
        MIN_PERSON_NAME_LEN,
        MAX_PERSON_NAME_LEN,
    )?;
    validate_length(
        &payload.last_name,
        "last_name",
        MIN_PERSON_NAME_LEN,
        MAX_PERSON_NAME_LEN,
    )?;
    validate_optional_text(&payload.bio, "bio", MAX_BIO_LEN)
}

pub fn validate_customer(payload: &CustomerPayload) -> Result<(), AppError> {
    validate_length(&payload.name, "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
    validate_email(&payload.email, "email")?;

    let address = &payload.address;
    validate_length(&address.street, "address.street", MIN_STREET_LEN, MAX_STREET_LEN)?;
    validate_length(&address.city, "address.city", MIN_REGION_LEN, MAX_REGION_LEN)?;
    validate_length(&address.state, "address.state", MIN_REGION_LEN, MAX_REGION_LEN)?;
    validate_length(
        &address.postal_code,
        "address.postal_code",
        MIN_POSTAL_CODE_LEN,
        MAX_POSTAL_CODE_LEN,
    )?;
    validate_length(&address.country, "address.country", MIN_REGION_LEN, MAX_REGION_LEN)
}

/// Field-level checks for an order; returns the parsed status
/// (`pending` when absent). Customer existence is checked by the handler.
pub fn validate_order(payload: &OrderPayload) -> Result<OrderStatus, AppError> {
    validate_positive_id(payload.customer_id, "customer_id")?;
    if payload.items.is_empty() {
        return Err(field_error("items", "order must contain at least one item".into()));
    }
    for (index, item) in payload.items.iter().enumerate() {
        validate_positive_id(item.book_id, &format!("items[{index}].book_id"))?;
        if item.quantity <= 0 {
            return Err(field_error(
                &format!("items[{index}].quantity"),
                "quantity must be greater than 0".into(),
            ));
        }
    }
    if !payload.total_price.is_finite() || payload.total_price < 0.0 {
        return Err(field_error(
            "total_price",
            "total_price must not be negative".into(),
        ));
    }

    match payload.status.as_deref() {
        None => Ok(OrderStatus::default()),
        Some(raw) => raw.parse::<OrderStatus>().map_err(|_| {
            field_error(
                "status",
                format!(
                    "status must be one of pending, processing, shipped, delivered, cancelled (got {raw})"
                ),
            )
        }),
    }
}

pub fn validate_search(criteria: &SearchCriteria) -> Result<(), AppError> {
    if let Some(min) = criteria.min_price
        && min < 0.0
    {
        return Err(field_error("min_price", "min_price must not be negative".into()));
    }
    if let (Some(min), Some(max)) = (criteria.min_price, criteria.max_price)
        && max < min
    {
        return Err(field_error(
            "max_price",
            "max_price must not be less than min_price".into(),
        ));
    }
    Ok(())
}

/// Validate a registration request; returns the requested role (`user` when absent).
pub fn validate_register(payload: &RegisterRequest) -> Result<Role, AppError> {
    validate_length(&payload.name, "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
    validate_email(&payload.email, "email")?;

    let password_len = payload.password.chars().count();
    if password_len < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            shared::ErrorCode::PasswordTooShort,
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        )
        .with_detail("field", "password"));
    }
    if password_len > MAX_PASSWORD_LEN {
        return Err(field_error(
            "password",
            format!("password is too long (max {MAX_PASSWORD_LEN})"),
        ));
    }

    match payload.role.as_deref() {
        None => Ok(Role::default()),
        Some(raw) => raw.parse::<Role>().map_err(|_| {
            field_error(
                "role",
                format!("role must be one of admin, manager, employee, user (got {raw})"),
            )
        }),
    }
}
