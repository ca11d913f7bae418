use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error used where causes originate outside this crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("percent coding failed: {0}")]
    Encode(#[from] EncodeError),
    #[error("parameter collection failed: {0}")]
    Params(#[from] ParamError),
    #[error("OAuth sign failed: {0}")]
    Sign(#[from] SignError),
    #[error("OAuth verification failed: {0}")]
    Verify(#[from] VerifyError),
    #[error("authorization flow failed: {0}")]
    Flow(#[from] FlowError),
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("token acquisition failed: {0}")]
    Token(#[from] TokenSourceError),
}

/// Strict RFC 5849 3.6 percent-coding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A `%` was not followed by two uppercase hexadecimal digits. Carries
    /// the offending escape, truncated to three bytes and lossily decoded.
    #[error("invalid percent escape {0:?}")]
    InvalidPercentEscape(String),
    /// The decoded byte sequence was not valid UTF-8.
    #[error("decoded bytes are not valid UTF-8")]
    NotUtf8(#[from] std::string::FromUtf8Error),
}

/// Failures while gathering the OAuth, query, and form parameters of a
/// request.
#[derive(Error, Debug)]
pub enum ParamError {
    /// An `Authorization: OAuth` pair without a `=` separator.
    #[error("malformed authorization header pair {0:?}")]
    MalformedAuthHeader(String),
    #[error("request URL is not usable: {0}")]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[derive(Error, Debug)]
pub enum SignError {
    #[error("HMAC rejected the signing key: {0}")]
    HmacKey(#[from] hmac::digest::InvalidLength),
    #[error("RSA signing failed: {0}")]
    Rsa(#[from] rsa::Error),
}

#[derive(Error, Debug)]
pub enum VerifyError {
    /// `oauth_timestamp` was absent or not a decimal epoch-seconds value.
    #[error("oauth_timestamp {0:?} is not seconds since the epoch")]
    BadTimestamp(String),
    #[error("timestamp {timestamp} is older than the allowed skew (server clock {now})")]
    ClockSkew { timestamp: u64, now: u64 },
    /// Returned by [`VerifierLookup`](crate::VerifierLookup) implementations
    /// for an `oauth_signature_method` they have no verifier for.
    #[error("unknown signature method {0:?}")]
    UnknownSignatureMethod(String),
    #[error("verifier lookup failed: {0}")]
    Lookup(#[source] BoxError),
    #[error("invalid signature: {0}")]
    InvalidSignature(#[source] BoxError),
    #[error(transparent)]
    Params(#[from] ParamError),
    #[error(transparent)]
    Sign(#[from] SignError),
}

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("authorize URL could not be parsed: {0}")]
    InvalidAuthorizeUrl(#[from] url::ParseError),
    #[error("endpoint URL is not usable: {0}")]
    InvalidEndpoint(#[from] http::Error),
    /// The provider answered the request-token call with
    /// `oauth_callback_confirmed` missing or not `"true"`.
    #[error("oauth_callback_confirmed was not true")]
    CallbackNotConfirmed,
    /// A token-endpoint response without a usable `oauth_token` and
    /// `oauth_token_secret` pair.
    #[error("response missing oauth_token or oauth_token_secret")]
    MissingCredentialsInResponse,
    /// The authorization callback carried no `oauth_token` or
    /// `oauth_verifier`.
    #[error("callback did not receive an oauth_token or oauth_verifier")]
    MissingCallbackParameters,
    #[error("provider returned HTTP {status}: {body:?}")]
    ProviderHttp { status: StatusCode, body: String },
}

/// An error raised by the underlying round tripper.
#[derive(Error, Debug)]
#[error("transport error: {0}")]
pub struct TransportError(#[source] pub BoxError);

impl TransportError {
    pub fn new<E: Into<BoxError>>(err: E) -> Self {
        TransportError(err.into())
    }
}

/// A token source that could not produce a token.
#[derive(Error, Debug)]
#[error("token unavailable: {0}")]
pub struct TokenSourceError(#[source] pub BoxError);

impl TokenSourceError {
    pub fn new<E: Into<BoxError>>(err: E) -> Self {
        TokenSourceError(err.into())
    }
}
