//! Account credentials and the fixed request headers.
//!
//! The API authenticates a browser session: a bearer token, the session
//! cookie string, and the company id travel as headers on every request.
//! They are bound once when the client is built; there is no refresh.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE,
    COOKIE, REFERER, USER_AGENT,
};

use crate::error::RequestError;

/// Environment variable holding the `authorization` header value.
pub const AUTH_TOKEN_ENV: &str = "MYBILLBOOK_AUTH_TOKEN";
/// Environment variable holding the session cookie string.
pub const COOKIES_ENV: &str = "MYBILLBOOK_COOKIES";
/// Environment variable holding the company id.
pub const COMPANY_ID_ENV: &str = "MYBILLBOOK_COMPANY_ID";

const COMPANY_ID: HeaderName = HeaderName::from_static("company-id");
const CLIENT: HeaderName = HeaderName::from_static("client");

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";
const ITEMS_REFERER: &str = "https://mybillbook.in/app/home/items";

// ============================================================================
// Credentials
// ============================================================================

/// The three secrets identifying a MyBillBook session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Full `authorization` header value, usually `Bearer ...`.
    pub auth_token: String,
    /// Raw `cookie` header value.
    pub cookies: String,
    /// Tenant id sent as `company-id`.
    pub company_id: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    pub fn new(
        auth_token: impl Into<String>,
        cookies: impl Into<String>,
        company_id: impl Into<String>,
    ) -> Self {
        Self {
            auth_token: auth_token.into(),
            cookies: cookies.into(),
            company_id: company_id.into(),
        }
    }

    /// Reads credentials from the process environment. Unset variables
    /// become empty strings; see [`Credentials::missing`].
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).unwrap_or_default();
        Self {
            auth_token: read(AUTH_TOKEN_ENV),
            cookies: read(COOKIES_ENV),
            company_id: read(COMPANY_ID_ENV),
        }
    }

    /// Names of the environment variables whose values are blank.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (AUTH_TOKEN_ENV, &self.auth_token),
            (COOKIES_ENV, &self.cookies),
            (COMPANY_ID_ENV, &self.company_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Returns true if every secret is present.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Builds the header set sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidHeader`] if a secret contains
    /// characters that cannot appear in a header value.
    pub fn headers(&self) -> Result<HeaderMap, RequestError> {
        let mut headers = HeaderMap::new();

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CLIENT, HeaderValue::from_static("web"));
        headers.insert(REFERER, HeaderValue::from_static(ITEMS_REFERER));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        headers.insert(AUTHORIZATION, secret_value(&self.auth_token, "authorization")?);
        headers.insert(COOKIE, secret_value(&self.cookies, "cookie")?);
        headers.insert(COMPANY_ID, secret_value(&self.company_id, "company-id")?);

        Ok(headers)
    }
}

fn secret_value(raw: &str, name: &'static str) -> Result<HeaderValue, RequestError> {
    let mut value =
        HeaderValue::from_str(raw.trim()).map_err(|_| RequestError::InvalidHeader(name))?;
    value.set_sensitive(true);
    Ok(value)
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &str| if s.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("Credentials")
            .field("auth_token", &redact(&self.auth_token))
            .field("cookies", &redact(&self.cookies))
            .field("company_id", &redact(&self.company_id))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_lists_blank_values() {
        let creds = Credentials::new("Bearer abc", "  ", "");
        assert_eq!(creds.missing(), vec![COOKIES_ENV, COMPANY_ID_ENV]);
        assert!(!creds.is_complete());

        let creds = Credentials::new("Bearer abc", "sid=1", "42");
        assert!(creds.is_complete());
    }

    #[test]
    fn test_headers_carry_secrets() {
        let creds = Credentials::new("Bearer abc", "sid=1", "42");
        let headers = creds.headers().unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert_eq!(headers[COOKIE], "sid=1");
        assert_eq!(headers["company-id"], "42");
        assert_eq!(headers["client"], "web");
        assert_eq!(headers[ACCEPT], "application/json");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_headers_reject_control_characters() {
        let creds = Credentials::new("Bearer abc\n", "sid=1", "4\u{7f}2");
        // Trailing newline is trimmed; DEL inside the id is not allowed.
        assert!(matches!(
            creds.headers(),
            Err(RequestError::InvalidHeader("company-id"))
        ));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::new("Bearer secret-token", "", "42");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<unset>"));
    }
}
