//! Network boundary of the controller.
//!
//! Two requests exist: the add-row fetch (awaited; its failure aborts
//! the add) and the delete notification (fire-and-forget; failures are
//! logged by the implementation and never reach the controller). Wire
//! encoding lives here so the browser crate only moves bytes.

use serde::Serialize;

/// Add-row request: GET `url` with `form_index`, `form_type` and the
/// optional flags. The server answers `{"html": "<tr>...</tr>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRowRequest {
    pub url: String,
    pub form_index: usize,
    pub form_type: String,
    pub has_ghost_points: Option<bool>,
    pub item_name: Option<String>,
}

impl NewRowRequest {
    /// Full request URL with the query string appended.
    pub fn full_url(&self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        let mut url = format!(
            "{}{}form_index={}&form_type={}",
            self.url,
            separator,
            self.form_index,
            urlencode(&self.form_type),
        );
        if let Some(has_ghost_points) = self.has_ghost_points {
            url.push_str("&has_ghost_points=");
            url.push(if has_ghost_points { '1' } else { '0' });
        }
        if let Some(item_name) = &self.item_name {
            url.push_str("&item_name=");
            url.push_str(&urlencode(item_name));
        }
        url
    }
}

/// Fire-and-forget POST telling the server a just-deleted row may be an
/// unreferenced record worth cleaning up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDeleteNotice {
    pub endpoint: String,
    /// Identifying field name/value pairs from the deleted row.
    pub fields: Vec<(String, String)>,
}

impl RowDeleteNotice {
    /// `application/x-www-form-urlencoded` body, with the CSRF token
    /// field the server-side middleware requires.
    pub fn form_body(&self, csrf_token: Option<&str>) -> String {
        let mut body = String::new();
        for (name, value) in &self.fields {
            if !body.is_empty() {
                body.push('&');
            }
            body.push_str(&urlencode(name));
            body.push('=');
            body.push_str(&urlencode(value));
        }
        if let Some(token) = csrf_token {
            if !body.is_empty() {
                body.push('&');
            }
            body.push_str("csrfmiddlewaretoken=");
            body.push_str(&urlencode(token));
        }
        body
    }
}

/// Add-row fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRowError {
    /// Non-success HTTP status.
    Http(u16),
    /// Transport failure or an unusable response payload.
    Transport(String),
}

impl std::fmt::Display for FetchRowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchRowError::Http(status) => write!(f, "HTTP {status}"),
            FetchRowError::Transport(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for FetchRowError {}

/// Server side of the formset, as seen by the controller.
pub trait FormsetNet {
    /// Fetches freshly rendered row markup; resolves to the `html`
    /// payload of the response.
    async fn fetch_row(&self, request: NewRowRequest) -> Result<String, FetchRowError>;

    /// Sends the delete notification without blocking the caller.
    /// Implementations log failures and otherwise swallow them.
    fn notify_row_deleted(&self, notice: RowDeleteNotice);
}

/// Extracts one cookie value from a raw `document.cookie` string.
/// Used by the browser crate to pick up the `csrftoken` cookie.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(percent_decode(value));
            }
        }
    }
    None
}

/// Percent-encodes everything outside the URL-unreserved set.
pub fn urlencode(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push('%');
                encoded.push(HEX[(byte >> 4) as usize] as char);
                encoded.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    encoded
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut position = 0;
    while position < bytes.len() {
        if bytes[position] == b'%'
            && position + 3 <= bytes.len()
            && bytes[position + 1].is_ascii_hexdigit()
            && bytes[position + 2].is_ascii_hexdigit()
        {
            if let Ok(byte) = u8::from_str_radix(&raw[position + 1..position + 3], 16) {
                decoded.push(byte);
                position += 3;
                continue;
            }
        }
        decoded.push(bytes[position]);
        position += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}
