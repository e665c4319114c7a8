//! Request and response bodies, with structural validation.
//!
//! Request bodies are deserialized into `*Body` types first, then checked
//! field by field. All field errors of one body are collected before
//! rejecting, so a client sees every problem at once.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical phone form: optional leading `+`, then 10 to 15 digits.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?\d{10,15}$").unwrap_or_else(|e| panic!("invalid phone regex: {e}"))
});

const PHONE_MIN_LEN: usize = 10;
const PHONE_MAX_LEN: usize = 16;
const ADDRESS_MAX_LEN: usize = 200;

/// One rejected field, in the `{loc, msg}` shape clients already parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    pub fn body(field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
        }
    }

    pub fn path(field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["path".to_string(), field.to_string()],
            msg: msg.into(),
        }
    }
}

/// `POST /phones` body as received.
#[derive(Debug, Clone, Deserialize)]
pub struct PhoneAddressCreateBody {
    pub phone: String,
    pub address: String,
}

/// `PUT /phones/{phone}` body as received.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressUpdateBody {
    pub address: String,
}

/// A validated create request. Both fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneAddressCreate {
    pub phone: String,
    pub address: String,
}

/// A validated update request. The address is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressUpdate {
    pub address: String,
}

impl TryFrom<PhoneAddressCreateBody> for PhoneAddressCreate {
    type Error = Vec<FieldError>;

    fn try_from(body: PhoneAddressCreateBody) -> Result<Self, Self::Error> {
        let phone = validate_phone(&body.phone);
        let address = validate_address(&body.address);
        match (phone, address) {
            (Ok(phone), Ok(address)) => Ok(Self { phone, address }),
            (phone, address) => Err(phone.err().into_iter().chain(address.err()).collect()),
        }
    }
}

impl TryFrom<AddressUpdateBody> for AddressUpdate {
    type Error = Vec<FieldError>;

    fn try_from(body: AddressUpdateBody) -> Result<Self, Self::Error> {
        let address = validate_address(&body.address).map_err(|e| vec![e])?;
        Ok(Self { address })
    }
}

/// Check a phone and return its trimmed form.
pub fn validate_phone(raw: &str) -> Result<String, FieldError> {
    let len = raw.chars().count();
    if len < PHONE_MIN_LEN {
        return Err(FieldError::body(
            "phone",
            format!("String should have at least {PHONE_MIN_LEN} characters"),
        ));
    }
    if len > PHONE_MAX_LEN {
        return Err(FieldError::body(
            "phone",
            format!("String should have at most {PHONE_MAX_LEN} characters"),
        ));
    }
    let phone = raw.trim();
    if !PHONE_RE.is_match(phone) {
        return Err(FieldError::body(
            "phone",
            "Phone must be digits (10-15) with optional leading +",
        ));
    }
    Ok(phone.to_string())
}

/// Check the `{phone}` segment of a `/phones/{phone}` path. Same rules as
/// [`validate_phone`]; only the error location differs.
pub fn validate_path_phone(raw: &str) -> Result<String, FieldError> {
    validate_phone(raw).map_err(|e| FieldError::path("phone", e.msg))
}

/// Check an address and return its trimmed form.
pub fn validate_address(raw: &str) -> Result<String, FieldError> {
    if raw.is_empty() {
        return Err(FieldError::body("address", "String should have at least 1 character"));
    }
    if raw.chars().count() > ADDRESS_MAX_LEN {
        return Err(FieldError::body(
            "address",
            format!("String should have at most {ADDRESS_MAX_LEN} characters"),
        ));
    }
    let address = raw.trim();
    if address.is_empty() {
        return Err(FieldError::body("address", "Address must not be empty"));
    }
    Ok(address.to_string())
}

/// `GET /phones/{phone}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneAddressResponse {
    pub phone: String,
    pub address: String,
}

/// Confirmation for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `GET /health` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub redis: bool,
}
