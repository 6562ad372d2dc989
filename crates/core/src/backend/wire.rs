//! Raw response shapes and their normalization.
//!
//! The API answers with different field sets per code path (`message` vs
//! `error`, snake_case vs camelCase QR fields). Everything is folded into
//! `Result<_, BackendError>` here.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::ticket::{PaymentSession, PaymentStatus};

use super::{BackendError, GuestRegistration, PaymentStatusReport};

#[derive(Debug, Default, Deserialize)]
struct RawGuestResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, alias = "qrCodeUrl")]
    qr_code_url: Option<String>,
    #[serde(default, alias = "qrCodeImage")]
    qr_code_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPurchaseResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "paymentId")]
    payment_id: Option<PaymentId>,
    #[serde(default, alias = "qrCodeImage", alias = "qr_code_base64")]
    qr_code_image: Option<String>,
    #[serde(default, alias = "copyPasteCode", alias = "qr_code")]
    copy_paste_code: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "qrCodeUrl")]
    qr_code_url: Option<String>,
    #[serde(default, alias = "qrCodeImage")]
    qr_code_image: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEmailResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Payment ids arrive as strings or as bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PaymentId {
    Text(String),
    Number(u64),
}

impl PaymentId {
    fn into_string(self) -> String {
        match self {
            PaymentId::Text(s) => s,
            PaymentId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decode a 2xx body, or turn a failed response into a `BackendError`.
fn decode<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, BackendError> {
    if !(200..300).contains(&status) {
        let reason = serde_json::from_str::<RawErrorBody>(body)
            .ok()
            .and_then(|raw| non_empty(raw.error).or_else(|| non_empty(raw.message)));
        return Err(match reason {
            Some(reason) => BackendError::Rejected(reason),
            None => BackendError::Transport(format!("HTTP {}", status)),
        });
    }

    serde_json::from_str(body)
        .map_err(|e| BackendError::Transport(format!("invalid response body: {}", e)))
}

/// Unknown statuses are kept as pending so polling continues.
fn normalize_status(value: &str) -> PaymentStatus {
    PaymentStatus::from_backend(value).unwrap_or_else(|| {
        warn!(status = value, "Unrecognized payment status, treating as pending");
        PaymentStatus::Pending
    })
}

pub(crate) fn guest_registration(
    status: u16,
    body: &str,
) -> Result<GuestRegistration, BackendError> {
    let raw: RawGuestResponse = decode(status, body)?;

    if let Some(error) = non_empty(raw.error) {
        return Err(BackendError::Rejected(error));
    }
    if raw.success == Some(false) {
        return Err(BackendError::Rejected(
            non_empty(raw.message).unwrap_or_else(|| "registration refused".to_string()),
        ));
    }

    Ok(GuestRegistration {
        message: non_empty(raw.message),
        qr_code_url: non_empty(raw.qr_code_url),
        qr_code_image: non_empty(raw.qr_code_image),
    })
}

pub(crate) fn ticket_purchase(status: u16, body: &str) -> Result<PaymentSession, BackendError> {
    let raw: RawPurchaseResponse = decode(status, body)?;

    if let Some(error) = non_empty(raw.error) {
        return Err(BackendError::Rejected(error));
    }

    let payment_id = raw.payment_id.map(PaymentId::into_string);
    match (payment_id, raw.qr_code_image, raw.copy_paste_code) {
        (Some(payment_id), Some(qr_code_image), Some(copy_paste_code)) => Ok(PaymentSession {
            payment_id,
            qr_code_image,
            copy_paste_code,
            status: raw
                .status
                .as_deref()
                .map(normalize_status)
                .unwrap_or(PaymentStatus::Pending),
            created_at: Utc::now(),
        }),
        _ => match non_empty(raw.message) {
            Some(message) => Err(BackendError::Rejected(message)),
            None => Err(BackendError::Transport(
                "purchase response missing payment fields".to_string(),
            )),
        },
    }
}

pub(crate) fn payment_status(status: u16, body: &str) -> Result<PaymentStatusReport, BackendError> {
    let raw: RawStatusResponse = decode(status, body)?;

    let Some(value) = raw.status else {
        return Err(match non_empty(raw.error).or_else(|| non_empty(raw.message)) {
            Some(reason) => BackendError::Rejected(reason),
            None => BackendError::Transport("status response missing status".to_string()),
        });
    };

    Ok(PaymentStatusReport {
        status: normalize_status(&value),
        qr_code_url: non_empty(raw.qr_code_url),
        qr_code_image: non_empty(raw.qr_code_image),
        message: non_empty(raw.message).or_else(|| non_empty(raw.error)),
    })
}

pub(crate) fn ticket_email(status: u16, body: &str) -> Result<(), BackendError> {
    let raw: RawEmailResponse = if body.trim().is_empty() && (200..300).contains(&status) {
        RawEmailResponse::default()
    } else {
        decode(status, body)?
    };

    if raw.success == Some(false) || raw.error.is_some() {
        return Err(BackendError::Rejected(
            non_empty(raw.error)
                .or_else(|| non_empty(raw.message))
                .unwrap_or_else(|| "email not sent".to_string()),
        ));
    }
    Ok(())
}
