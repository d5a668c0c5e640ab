use regex::Regex;
use std::sync::LazyLock;

use crate::core::model::MediaServerCreate;

pub const NAME_MIN_LEN: usize = 3;
pub const API_KEY_MIN_LEN: usize = 10;
pub const API_KEY_MAX_LEN: usize = 200;

static URL_SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(http|https)://").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Url,
    ApiKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check the form before anything is sent. Empty result means valid.
pub fn validate(form: &MediaServerCreate) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let name_len = form.name.chars().count();
    if name_len == 0 {
        errors.push(FieldError::new(Field::Name, "Name is required"));
    } else if name_len < NAME_MIN_LEN {
        errors.push(FieldError::new(
            Field::Name,
            format!("Name must be at least {NAME_MIN_LEN} characters"),
        ));
    }

    if form.url.is_empty() {
        errors.push(FieldError::new(Field::Url, "URL is required"));
    } else if !URL_SCHEME.is_match(&form.url) {
        errors.push(FieldError::new(
            Field::Url,
            "URL must start with http:// or https://",
        ));
    }

    let key_len = form.api_key.chars().count();
    if key_len == 0 {
        errors.push(FieldError::new(Field::ApiKey, "API Key is required"));
    } else if !(API_KEY_MIN_LEN..=API_KEY_MAX_LEN).contains(&key_len) {
        errors.push(FieldError::new(
            Field::ApiKey,
            format!("API Key must be between {API_KEY_MIN_LEN} and {API_KEY_MAX_LEN} characters"),
        ));
    }

    errors
}
