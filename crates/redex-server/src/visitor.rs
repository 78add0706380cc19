use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
};
use uuid::Uuid;

pub const VISITOR_HEADER: &str = "x-visitor-id";
pub const VISITOR_COOKIE: &str = "redex_visitor";
pub const ANONYMOUS: &str = "anonymous";

/// Cookie lifetime in seconds (one year).
const COOKIE_MAX_AGE: u64 = 365 * 24 * 60 * 60;

/// Identity a favorites set belongs to.
///
/// API clients name themselves with the `x-visitor-id` header. Browsers get a
/// random id in the `redex_visitor` cookie the first time they load the page.
/// Requests with neither share the `anonymous` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor(String);

impl Visitor {
    /// Accept 1-64 characters of [A-Za-z0-9_-].
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| Visitor(raw.to_string()))
    }

    pub fn anonymous() -> Self {
        Visitor(ANONYMOUS.to_string())
    }

    /// A fresh random identity for a new browser.
    pub fn generate() -> Self {
        Visitor(Uuid::new_v4().simple().to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Set-Cookie` value that pins this identity to the browser.
    pub fn set_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            VISITOR_COOKIE, self.0, COOKIE_MAX_AGE
        )
    }

    /// Visitor id from the `Cookie` headers. Malformed values are ignored.
    fn from_cookies(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == VISITOR_COOKIE)
            .and_then(|(_, value)| Visitor::parse(value))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Visitor {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(VISITOR_HEADER) else {
            return Ok(Visitor::from_cookies(&parts.headers).unwrap_or_else(Visitor::anonymous));
        };

        value
            .to_str()
            .ok()
            .and_then(Visitor::parse)
            .ok_or((StatusCode::BAD_REQUEST, "Invalid visitor id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    async fn extract(request: Request<()>) -> Result<Visitor, (StatusCode, &'static str)> {
        let (mut parts, _) = request.into_parts();
        Visitor::from_request_parts(&mut parts, &()).await
    }

    #[test]
    fn test_valid_visitor_ids() {
        assert!(Visitor::parse("abc").is_some());
        assert!(Visitor::parse("visitor_1-A").is_some());
        assert!(Visitor::parse(&"a".repeat(64)).is_some());
    }

    #[test]
    fn test_invalid_visitor_ids() {
        assert!(Visitor::parse("").is_none());
        assert!(Visitor::parse("has space").is_none());
        assert!(Visitor::parse("a:b").is_none());
        assert!(Visitor::parse(&"a".repeat(65)).is_none());
    }

    #[test]
    fn test_generated_ids_are_valid_and_distinct() {
        let a = Visitor::generate();
        let b = Visitor::generate();
        assert!(Visitor::parse(a.as_str()).is_some());
        assert_ne!(a, b);
        assert!(!a.is_anonymous());
    }

    #[tokio::test]
    async fn test_cookie_identifies_browser() {
        let request = Request::builder()
            .header("cookie", "theme=dark; redex_visitor=abc123; other=1")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap().as_str(), "abc123");
    }

    #[tokio::test]
    async fn test_header_wins_over_cookie() {
        let request = Request::builder()
            .header(VISITOR_HEADER, "api-client")
            .header("cookie", "redex_visitor=abc123")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap().as_str(), "api-client");
    }

    #[tokio::test]
    async fn test_missing_or_bad_cookie_is_anonymous() {
        let request = Request::builder().body(()).unwrap();
        assert!(extract(request).await.unwrap().is_anonymous());

        let mut request = Request::builder().body(()).unwrap();
        request
            .headers_mut()
            .insert("cookie", HeaderValue::from_static("redex_visitor=not valid!"));
        assert!(extract(request).await.unwrap().is_anonymous());
    }

    #[test]
    fn test_set_cookie_value() {
        let cookie = Visitor::parse("abc").unwrap().set_cookie();
        assert!(cookie.starts_with("redex_visitor=abc; Path=/"));
    }
}
