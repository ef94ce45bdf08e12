//! Locating a token in an HTTP request
//!
//! An [`Extractor`] pulls the compact token text out of a request. Strategies
//! compose with [`MultiExtractor`], and [`parse_from_request`] runs the
//! extracted text through a [`Parser`].
//!
//! Every strategy treats missing, empty, and non-ASCII values as absent and
//! reports [`Error::TokenNotFound`] when it finds nothing.

use crate::claims::Claims;
use crate::error::{BoxError, Error, Result};
use crate::keys::Key;
use crate::parser::{Parser, Rejection};
use crate::token::Token;
use http::header::{AUTHORIZATION, COOKIE};
use http::{HeaderMap, Request, Uri};

/// Strategy for finding a token in a request
pub trait Extractor {
    /// Find the token in the request parts
    fn extract_token(&self, headers: &HeaderMap, uri: &Uri) -> Result<String>;

    /// Find the token in a request
    fn extract<B>(&self, request: &Request<B>) -> Result<String>
    where
        Self: Sized,
    {
        self.extract_token(request.headers(), request.uri())
    }
}

/// First non-empty value among the named headers
#[derive(Debug, Clone)]
pub struct HeaderExtractor(pub Vec<String>);

impl HeaderExtractor {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl Extractor for HeaderExtractor {
    fn extract_token(&self, headers: &HeaderMap, _uri: &Uri) -> Result<String> {
        self.0
            .iter()
            .flat_map(|name| headers.get_all(name.as_str()))
            .filter_map(|value| value.to_str().ok())
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or(Error::TokenNotFound)
    }
}

/// `Authorization: Bearer <token>`, with the scheme matched case-insensitively
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerExtractor;

impl Extractor for BearerExtractor {
    fn extract_token(&self, headers: &HeaderMap, _uri: &Uri) -> Result<String> {
        const SCHEME: &str = "bearer ";

        headers
            .get_all(AUTHORIZATION)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| {
                let scheme = value.get(..SCHEME.len())?;
                scheme
                    .eq_ignore_ascii_case(SCHEME)
                    .then(|| value[SCHEME.len()..].trim())
            })
            .find(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or(Error::TokenNotFound)
    }
}

/// First non-empty value among the named query parameters, URL-decoded
#[derive(Debug, Clone)]
pub struct QueryExtractor(pub Vec<String>);

impl QueryExtractor {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl Extractor for QueryExtractor {
    fn extract_token(&self, _headers: &HeaderMap, uri: &Uri) -> Result<String> {
        let query = uri.query().ok_or(Error::TokenNotFound)?;

        // Names are checked in configured order, not query order
        self.0
            .iter()
            .find_map(|name| {
                url::form_urlencoded::parse(query.as_bytes())
                    .find(|(key, value)| key == name.as_str() && !value.is_empty())
                    .map(|(_, value)| value.into_owned())
            })
            .ok_or(Error::TokenNotFound)
    }
}

/// First non-empty value among the named cookies
#[derive(Debug, Clone)]
pub struct CookieExtractor(pub Vec<String>);

impl CookieExtractor {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }
}

impl Extractor for CookieExtractor {
    fn extract_token(&self, headers: &HeaderMap, _uri: &Uri) -> Result<String> {
        let cookies: Vec<(&str, &str)> = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .map(|(name, value)| (name.trim(), value.trim().trim_matches('"')))
            .collect();

        self.0
            .iter()
            .find_map(|wanted| {
                cookies
                    .iter()
                    .find(|(name, value)| name == wanted && !value.is_empty())
                    .map(|(_, value)| value.to_string())
            })
            .ok_or(Error::TokenNotFound)
    }
}

/// Tries each strategy in order; the first that finds a token wins
///
/// A strategy reporting [`Error::TokenNotFound`] passes to the next one. Any
/// other error stops the search.
#[derive(Default)]
pub struct MultiExtractor(pub Vec<Box<dyn Extractor + Send + Sync>>);

impl MultiExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy
    pub fn with(mut self, extractor: impl Extractor + Send + Sync + 'static) -> Self {
        self.0.push(Box::new(extractor));
        self
    }
}

impl Extractor for MultiExtractor {
    fn extract_token(&self, headers: &HeaderMap, uri: &Uri) -> Result<String> {
        for extractor in &self.0 {
            match extractor.extract_token(headers, uri) {
                Err(Error::TokenNotFound) => continue,
                found => return found,
            }
        }
        Err(Error::TokenNotFound)
    }
}

/// Extract a token from `request` and verify it with `parser`
///
/// Extraction failures are returned as a [`Rejection`] without a token.
pub fn parse_from_request<C, B, F>(
    parser: &Parser,
    request: &Request<B>,
    extractor: &dyn Extractor,
    resolve_key: F,
) -> std::result::Result<Token<C>, Rejection<C>>
where
    C: Claims,
    F: FnOnce(&Token<C>) -> std::result::Result<Key, BoxError>,
{
    let token = extractor
        .extract_token(request.headers(), request.uri())
        .map_err(Rejection::new)?;

    tracing::trace!("token extracted from request");

    parser.parse_with_claims(&token, resolve_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_header_extractor() {
        let req = request("/", &[("X-Token", ""), ("X-Auth", "abc.def.ghi")]);
        let extractor = HeaderExtractor::new(["X-Token", "X-Auth"]);
        assert_eq!(extractor.extract(&req).unwrap(), "abc.def.ghi");

        let missing = HeaderExtractor::new(["X-Other"]);
        assert!(matches!(missing.extract(&req), Err(Error::TokenNotFound)));
    }

    #[test]
    fn test_bearer_scheme_case_insensitive() {
        for header in ["Bearer abc.def.ghi", "bearer abc.def.ghi", "BEARER abc.def.ghi"] {
            let req = request("/", &[("Authorization", header)]);
            assert_eq!(BearerExtractor.extract(&req).unwrap(), "abc.def.ghi");
        }
    }

    #[test]
    fn test_bearer_requires_scheme() {
        for header in ["Basic dXNlcjpwYXNz", "Bearer ", "Bearer", "abc.def.ghi"] {
            let req = request("/", &[("Authorization", header)]);
            assert!(
                matches!(BearerExtractor.extract(&req), Err(Error::TokenNotFound)),
                "{header:?} should not yield a token"
            );
        }
    }

    #[test]
    fn test_query_extractor_decodes() {
        let req = request("/path?other=1&access_token=abc%2Edef.ghi", &[]);
        let extractor = QueryExtractor::new(["jwt", "access_token"]);
        assert_eq!(extractor.extract(&req).unwrap(), "abc.def.ghi");

        let req = request("/path?access_token=", &[]);
        assert!(matches!(extractor.extract(&req), Err(Error::TokenNotFound)));

        let req = request("/path", &[]);
        assert!(matches!(extractor.extract(&req), Err(Error::TokenNotFound)));
    }

    #[test]
    fn test_cookie_extractor() {
        let req = request("/", &[("Cookie", "theme=dark; session=abc.def.ghi; empty=")]);

        assert_eq!(
            CookieExtractor::new(["session"]).extract(&req).unwrap(),
            "abc.def.ghi"
        );
        assert!(CookieExtractor::new(["empty"]).extract(&req).is_err());
        assert!(CookieExtractor::new(["sess"]).extract(&req).is_err());
    }

    #[test]
    fn test_multi_extractor_first_match_wins() {
        let req = request(
            "/?token=from-query",
            &[("Authorization", "Bearer from-header")],
        );

        let header_first = MultiExtractor::new()
            .with(CookieExtractor::new(["session"]))
            .with(BearerExtractor)
            .with(QueryExtractor::new(["token"]));
        assert_eq!(header_first.extract(&req).unwrap(), "from-header");

        let query_first = MultiExtractor::new()
            .with(QueryExtractor::new(["token"]))
            .with(BearerExtractor);
        assert_eq!(query_first.extract(&req).unwrap(), "from-query");

        assert!(matches!(
            MultiExtractor::new().extract(&req),
            Err(Error::TokenNotFound)
        ));
    }
}
