//! Session cookie handling
//!
//! The browser identifies its conversation with an opaque id stored in a
//! cookie. Requests without a usable id get a fresh v4 UUID.

use axum::http::header::{COOKIE, HeaderMap};
use std::time::Duration;
use uuid::Uuid;

const MAX_ID_LEN: usize = 128;

/// Name and lifetime of the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    pub name: String,
    pub max_age: Duration,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "session_id".to_string(),
            max_age: Duration::from_secs(86_400),
        }
    }
}

impl CookieSettings {
    /// Session id carried by the request, if any
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, value)| value.trim_matches('"'))
            .filter(|value| is_valid_id(value))
            .map(str::to_string)
    }

    /// Session id of the request, or a new one. The flag is `true` when created.
    pub fn read_or_create(&self, headers: &HeaderMap) -> (String, bool) {
        match self.read(headers) {
            Some(id) => (id, false),
            None => (Uuid::new_v4().to_string(), true),
        }
    }

    /// `Set-Cookie` value for `session_id`
    pub fn set_cookie(&self, session_id: &str) -> String {
        format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            self.name,
            session_id,
            self.max_age.as_secs()
        )
    }
}

fn is_valid_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
