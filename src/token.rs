//! Token credentials and token-endpoint response bodies.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{FlowError, Result, TokenSourceError};
use crate::OAUTH_CALLBACK_CONFIRMED_KEY;

/// An OAuth 1 token and its matching secret.
///
/// The same shape serves two roles: the temporary credential issued by the
/// request-token step and the token credential issued by the access-token
/// step. Values are opaque strings and never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token: String,
    pub token_secret: String,
}

impl Token {
    pub fn new(token: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Token {
            token: token.into(),
            token_secret: token_secret.into(),
        }
    }
}

/// A capability returning a [`Token`] on demand.
///
/// Sources are consulted on every outbound request and must be safe for
/// concurrent use.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> std::result::Result<Token, TokenSourceError>;
}

/// [`TokenSource`] holding one token and returning a copy of it forever.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: Token,
}

impl StaticTokenSource {
    pub fn new(token: Token) -> Self {
        StaticTokenSource { token }
    }
}

impl TokenSource for StaticTokenSource {
    fn token(&self) -> std::result::Result<Token, TokenSourceError> {
        Ok(self.token.clone())
    }
}

/// A decoded `application/x-www-form-urlencoded` token-endpoint response.
///
/// Provider-specific extras (`oauth_callback_confirmed`, `screen_name`, …)
/// are kept in [`remain`](Self::remain).
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    /// OAuth token
    #[serde(default)]
    pub oauth_token: String,
    /// OAuth token secret
    #[serde(default)]
    pub oauth_token_secret: String,
    /// Other contents
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

impl TokenResponse {
    pub fn parse(body: &[u8]) -> std::result::Result<TokenResponse, FlowError> {
        serde_urlencoded::from_bytes(body).map_err(|_| FlowError::MissingCredentialsInResponse)
    }

    /// Whether the provider confirmed the callback with the literal `"true"`.
    pub fn callback_confirmed(&self) -> bool {
        self.remain.get(OAUTH_CALLBACK_CONFIRMED_KEY).map(String::as_str) == Some("true")
    }

    /// The token pair, requiring both values to be non-empty.
    pub fn credentials(&self) -> std::result::Result<Token, FlowError> {
        if self.oauth_token.is_empty() || self.oauth_token_secret.is_empty() {
            return Err(FlowError::MissingCredentialsInResponse);
        }
        Ok(Token::new(
            self.oauth_token.clone(),
            self.oauth_token_secret.clone(),
        ))
    }
}

/// Adds [`parse_oauth_token`](TokenReader::parse_oauth_token) to responses.
// this trait is sealed
pub trait TokenReader: private::Sealed {
    fn parse_oauth_token(&self) -> Result<TokenResponse>;
}

impl TokenReader for http::Response<Vec<u8>> {
    fn parse_oauth_token(&self) -> Result<TokenResponse> {
        Ok(TokenResponse::parse(self.body())?)
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for http::Response<Vec<u8>> {}
}
