//
//  cf-client
//  output/redact.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Redaction of secrets before anything reaches a request log.

use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement text for every hidden value.
pub const REDACTED_VALUE: &str = "[PRIVATE DATA HIDDEN]";

/// JSON string fields whose values are hidden, e.g. `"password": "..."`.
static JSON_SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)("(?:access_token|refresh_token|id_token|token|password|client_secret|passcode|secret)"\s*:\s*)"(?:[^"\\]|\\.)*""#,
    )
    .unwrap()
});

/// Form fields whose values are hidden, e.g. `password=...`.
static FORM_SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(^|&)((?:access_token|refresh_token|id_token|password|client_secret|passcode|code)=)[^&]*",
    )
    .unwrap()
});

/// `Authorization:` header lines inside raw dumps.
static AUTHORIZATION_LINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^(Authorization:)[^\r\n]*").unwrap());

/// Bare `bearer <token>` occurrences inside raw dumps.
static BEARER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]+=*").unwrap());

/// Hides secret string fields of a JSON document.
///
/// Works on text so formatting and key order are preserved.
///
/// # Example
///
/// ```rust
/// use cf_client::output::redact_json;
///
/// let redacted = redact_json(r#"{"username":"admin","password":"hunter2"}"#);
/// assert_eq!(redacted, r#"{"username":"admin","password":"[PRIVATE DATA HIDDEN]"}"#);
/// ```
pub fn redact_json(body: &str) -> String {
    JSON_SECRET_PATTERN
        .replace_all(body, format!("${{1}}\"{}\"", REDACTED_VALUE).as_str())
        .into_owned()
}

/// Hides secret fields of a URL-encoded form.
pub fn redact_form(body: &str) -> String {
    FORM_SECRET_PATTERN
        .replace_all(body, format!("${{1}}${{2}}{}", REDACTED_VALUE).as_str())
        .into_owned()
}

/// Hides `Authorization` headers and bearer tokens in a raw HTTP dump.
pub fn redact_dump(dump: &str) -> String {
    let headers = AUTHORIZATION_LINE_PATTERN
        .replace_all(dump, format!("${{1}} {}", REDACTED_VALUE).as_str())
        .into_owned();
    BEARER_PATTERN
        .replace_all(&headers, REDACTED_VALUE)
        .into_owned()
}

/// Pretty-prints a JSON body and redacts it.
///
/// Returns `None` for an empty body. A body that is not valid JSON is
/// returned redacted but otherwise untouched.
pub fn format_json_body(body: &[u8]) -> Option<String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let text = String::from_utf8_lossy(body);
    let formatted = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .filter(|value| value.is_object())
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| text.into_owned());
    Some(redact_json(&formatted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_json_hides_token_fields() {
        let body = r#"{"access_token":"abc","token_type":"bearer","refresh_token":"def"}"#;
        assert_eq!(
            redact_json(body),
            r#"{"access_token":"[PRIVATE DATA HIDDEN]","token_type":"bearer","refresh_token":"[PRIVATE DATA HIDDEN]"}"#
        );
    }

    #[test]
    fn test_redact_json_handles_escaped_quotes() {
        let body = r#"{"password": "a\"b", "name": "x"}"#;
        assert_eq!(
            redact_json(body),
            r#"{"password": "[PRIVATE DATA HIDDEN]", "name": "x"}"#
        );
    }

    #[test]
    fn test_redact_form() {
        assert_eq!(
            redact_form("grant_type=refresh_token&refresh_token=secret-value"),
            "grant_type=refresh_token&refresh_token=[PRIVATE DATA HIDDEN]"
        );
        assert_eq!(
            redact_form("password=hunter2&username=admin"),
            "password=[PRIVATE DATA HIDDEN]&username=admin"
        );
    }

    #[test]
    fn test_redact_dump() {
        let dump = "GET /apps HTTP/1.1\r\nAuthorization: bearer eyJhbGci.abc.def\r\nConnection: Upgrade\r\n";
        let redacted = redact_dump(dump);
        assert!(redacted.contains("Authorization: [PRIVATE DATA HIDDEN]"));
        assert!(redacted.contains("Connection: Upgrade"));
        assert!(!redacted.contains("eyJhbGci"));
    }

    #[test]
    fn test_format_json_body() {
        let formatted = format_json_body(br#"{"a":"b","c":"<&>"}"#).unwrap();
        assert_eq!(formatted, "{\n  \"a\": \"b\",\n  \"c\": \"<&>\"\n}");

        assert_eq!(format_json_body(b""), None);
        assert_eq!(
            format_json_body(br#"[{"data":1}]"#).unwrap(),
            r#"[{"data":1}]"#
        );
    }
}
