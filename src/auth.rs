use axum::http::{HeaderMap, header, request::Parts};
use axum::extract::FromRequestParts;
use std::{convert::Infallible, fmt, sync::RwLock};

/// Name of the cookie the console session token is persisted in.
pub const TOKEN_COOKIE: &str = "token";

/// Token
///
/// The opaque credential identifying the principal to the console API. Its value
/// is never interpreted here, only forwarded. `Debug` is redacted so tokens
/// cannot leak through log fields.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wraps a raw token. Blank values are not tokens.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Credentials
///
/// Read side of the token capability. This is all the navigation guard needs:
/// whether a principal is present, and the token to act on its behalf.
pub trait Credentials: Send + Sync {
    fn get_token(&self) -> Option<Token>;

    /// A principal exists exactly when a token is held.
    fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }
}

/// TokenStore
///
/// Read/write side of the token capability: login stores a token, logout
/// removes it.
pub trait TokenStore: Credentials {
    fn set_token(&self, token: Token);
    fn remove_token(&self);
}

/// MemoryTokenStore
///
/// Process-local token store for embedding the guard outside of an HTTP
/// request, e.g. a long-lived client holding a single principal.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

impl Credentials for MemoryTokenStore {
    fn get_token(&self) -> Option<Token> {
        // A poisoned lock still holds the last written value.
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn set_token(&self, token: Token) {
        match self.token.write() {
            Ok(mut guard) => *guard = Some(token),
            Err(poisoned) => *poisoned.into_inner() = Some(token),
        }
    }

    fn remove_token(&self) {
        match self.token.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

/// Session Extractor Result
///
/// The principal behind an HTTP request, as far as the console front can tell:
/// just the token, if any. Whether that token grants anything is decided by the
/// console API when the guard fetches organization access.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<Token>,
}

impl Session {
    /// from_headers
    ///
    /// Resolution order:
    /// 1. `Authorization: Bearer <token>`, scheme case-insensitive (API clients,
    ///    the SPA's own fetches).
    /// 2. The `token` cookie (page loads in the browser).
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token);

        let token = bearer.or_else(|| cookie_token(headers));

        Self { token }
    }
}

impl Credentials for Session {
    fn get_token(&self) -> Option<Token> {
        self.token.clone()
    }
}

/// Session Extractor Implementation
///
/// Never rejects. A request without a token is a perfectly valid request for a
/// public view; the guard turns the missing principal into a login redirect
/// when the destination needs one.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session::from_headers(&parts.headers))
    }
}

// Scheme is case-insensitive; any run of whitespace may follow it.
fn bearer_token(value: &str) -> Option<Token> {
    let (scheme, rest) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Token::new(rest.trim_start())
}

fn cookie_token(headers: &HeaderMap) -> Option<Token> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .and_then(|(_, value)| Token::new(value))
}
