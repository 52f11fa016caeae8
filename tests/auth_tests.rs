use axum::{
    extract::FromRequestParts,
    http::{Method, Request, header, request::Parts},
};
use console_web::auth::{Credentials, MemoryTokenStore, Session, Token, TokenStore};

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(headers: &[(header::HeaderName, &str)]) -> Parts {
    let mut builder = Request::builder().method(Method::GET).uri("/");
    for (name, value) in headers {
        builder = builder.header(name.clone(), *value);
    }
    let (parts, _) = builder.body(axum::body::Body::empty()).unwrap().into_parts();
    parts
}

async fn session(headers: &[(header::HeaderName, &str)]) -> Session {
    let mut parts = get_request_parts(headers);
    Session::from_request_parts(&mut parts, &()).await.unwrap()
}

// --- Token ---

#[test]
fn test_blank_tokens_are_rejected() {
    assert!(Token::new("").is_none());
    assert!(Token::new("   ").is_none());
    assert_eq!(Token::new("abc").unwrap().as_str(), "abc");
}

#[test]
fn test_token_debug_is_redacted() {
    let token = Token::new("very-secret").unwrap();
    let rendered = format!("{:?}", token);
    assert!(!rendered.contains("very-secret"));
}

// --- MemoryTokenStore ---

#[test]
fn test_memory_store_lifecycle() {
    let store = MemoryTokenStore::new();
    assert!(!store.is_authenticated());
    assert_eq!(store.get_token(), None);

    store.set_token(Token::new("t1").unwrap());
    assert!(store.is_authenticated());
    assert_eq!(store.get_token(), Token::new("t1"));

    store.set_token(Token::new("t2").unwrap());
    assert_eq!(store.get_token(), Token::new("t2"));

    store.remove_token();
    assert!(!store.is_authenticated());
}

// --- Session Extractor ---

#[tokio::test]
async fn test_session_without_credentials_is_unauthenticated() {
    let session = session(&[]).await;
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_session_reads_bearer_token() {
    let session = session(&[(header::AUTHORIZATION, "Bearer abc123")]).await;
    assert_eq!(session.get_token(), Token::new("abc123"));
}

#[tokio::test]
async fn test_session_reads_token_cookie() {
    let session = session(&[(header::COOKIE, "theme=dark; token=cookie-tok; other=1")]).await;
    assert_eq!(session.get_token(), Token::new("cookie-tok"));
}

#[tokio::test]
async fn test_bearer_wins_over_cookie() {
    let session = session(&[
        (header::AUTHORIZATION, "Bearer from-header"),
        (header::COOKIE, "token=from-cookie"),
    ])
    .await;
    assert_eq!(session.get_token(), Token::new("from-header"));
}

#[tokio::test]
async fn test_malformed_credentials_are_ignored() {
    let session = session(&[
        (header::AUTHORIZATION, "Basic dXNlcjpwYXNz"),
        (header::COOKIE, "token=; tokens=nope"),
    ])
    .await;
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive_and_trimmed() {
    let spaced = session(&[(header::AUTHORIZATION, "bearer   spaced")]).await;
    assert_eq!(spaced.get_token(), Token::new("spaced"));

    let session = session(&[(header::AUTHORIZATION, "BEARER upper")]).await;
    assert_eq!(session.get_token(), Token::new("upper"));
}

#[tokio::test]
async fn test_bearer_without_token_falls_back_to_cookie() {
    let session = session(&[
        (header::AUTHORIZATION, "Bearer    "),
        (header::COOKIE, "token=from-cookie"),
    ])
    .await;
    assert_eq!(session.get_token(), Token::new("from-cookie"));
}
