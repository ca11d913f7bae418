//! Consumer configuration and signed-header assembly.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use http::Request;

use crate::clock::{Clock, SystemClock};
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::noncer::{Base64Noncer, Noncer};
use crate::signature;
use crate::signer::{HmacSha1Signer, Signer};
use crate::token::{StaticTokenSource, Token};
use crate::transport::{RoundTripper, Transport};
use crate::{
    OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY,
    OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY,
    OAUTH_VERSION_KEY, OAUTH_VERSION_VALUE,
};

/// An OAuth 1 consumer's credentials, callback URL, provider endpoint, and
/// the signature method used for its requests.
///
/// Immutable after construction; share freely across threads. Every signed
/// request draws a fresh timestamp and nonce from the configured clock and
/// noncer.
///
/// ```no_run
/// use oauth1a::{Config, Endpoint};
///
/// let config = Config::new("consumer_key", "consumer_secret")
///     .callback_url("oob")
///     .endpoint(Endpoint::twitter());
/// ```
#[derive(Clone)]
pub struct Config {
    pub(crate) consumer_key: String,
    pub(crate) consumer_secret: String,
    pub(crate) callback_url: String,
    pub(crate) endpoint: Endpoint,
    pub(crate) signer: Arc<dyn Signer>,
    pub(crate) noncer: Arc<dyn Noncer>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Config {
    /// A configuration signing with HMAC-SHA1, a 32-byte base64 noncer, and
    /// the system clock. All three are replaceable below.
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        let consumer_secret = consumer_secret.into();
        Config {
            consumer_key: consumer_key.into(),
            signer: Arc::new(HmacSha1Signer::new(consumer_secret.clone())),
            consumer_secret,
            callback_url: String::new(),
            endpoint: Endpoint::default(),
            noncer: Arc::new(Base64Noncer::default()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the callback URL sent with the request-token call. May be empty,
    /// `"oob"`, or an absolute URL.
    pub fn callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = callback_url.into();
        self
    }

    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Replace the signature method, e.g. with
    /// [`HmacSha256Signer`](crate::HmacSha256Signer) or an RSA signer.
    pub fn signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    pub fn noncer(mut self, noncer: impl Noncer + 'static) -> Self {
        self.noncer = Arc::new(noncer);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    /// An authenticating round tripper over `base` that signs every request
    /// with this configuration and the given token.
    pub fn client<T: RoundTripper>(&self, base: T, token: Token) -> Transport<T, StaticTokenSource> {
        Transport::new(base, self.clone(), StaticTokenSource::new(token))
    }

    // The protocol parameters common to every signed request, excluding
    // oauth_signature. Timestamp and nonce are fresh on each call.
    fn common_oauth_params(&self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert(OAUTH_CONSUMER_KEY.to_string(), self.consumer_key.clone());
        params.insert(
            OAUTH_SIGNATURE_METHOD_KEY.to_string(),
            self.signer.name().to_string(),
        );
        params.insert(
            OAUTH_TIMESTAMP_KEY.to_string(),
            self.clock.epoch_seconds().to_string(),
        );
        params.insert(OAUTH_NONCE_KEY.to_string(), self.noncer.nonce());
        params.insert(OAUTH_VERSION_KEY.to_string(), OAUTH_VERSION_VALUE.to_string());
        params
    }

    /// Authorization header for the request-token call (RFC 5849 2.1):
    /// common parameters plus `oauth_callback`, signed with an empty token
    /// secret.
    pub(crate) fn request_token_auth_header<B: AsRef<[u8]>>(
        &self,
        req: &Request<B>,
    ) -> Result<String> {
        let mut oauth_params = self.common_oauth_params();
        oauth_params.insert(OAUTH_CALLBACK_KEY.to_string(), self.callback_url.clone());
        self.signed_auth_header(req, oauth_params, "")
    }

    /// Authorization header for the access-token call (RFC 5849 2.3):
    /// common parameters plus the temporary `oauth_token` and the
    /// `oauth_verifier`, signed with the temporary token secret.
    pub(crate) fn access_token_auth_header<B: AsRef<[u8]>>(
        &self,
        req: &Request<B>,
        temporary: &Token,
        verifier: &str,
    ) -> Result<String> {
        let mut oauth_params = self.common_oauth_params();
        oauth_params.insert(OAUTH_TOKEN_KEY.to_string(), temporary.token.clone());
        oauth_params.insert(OAUTH_VERIFIER_KEY.to_string(), verifier.to_string());
        self.signed_auth_header(req, oauth_params, &temporary.token_secret)
    }

    /// Authorization header for an authenticated resource request
    /// (RFC 5849 3.1).
    pub(crate) fn request_auth_header<B: AsRef<[u8]>>(
        &self,
        req: &Request<B>,
        token: &Token,
    ) -> Result<String> {
        let mut oauth_params = self.common_oauth_params();
        oauth_params.insert(OAUTH_TOKEN_KEY.to_string(), token.token.clone());
        self.signed_auth_header(req, oauth_params, &token.token_secret)
    }

    fn signed_auth_header<B: AsRef<[u8]>>(
        &self,
        req: &Request<B>,
        mut oauth_params: HashMap<String, String>,
        token_secret: &str,
    ) -> Result<String> {
        let url = signature::request_url(req)?;
        let params = signature::collect_parameters(req, &url, &oauth_params);
        let base = signature::signature_base(req.method(), &url, &params);
        let signed = self.signer.sign(token_secret, &base)?;
        oauth_params.insert(OAUTH_SIGNATURE_KEY.to_string(), signed);
        Ok(signature::auth_header_value(&oauth_params))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("consumer_key", &self.consumer_key)
            .field("callback_url", &self.callback_url)
            .field("endpoint", &self.endpoint)
            .field("signature_method", &self.signer.name())
            .finish_non_exhaustive()
    }
}
