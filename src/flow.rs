//! The three-legged authorization flow (RFC 5849 section 2).
//!
//! The coordinator is stateless between steps; callers carry the temporary
//! credential from [`request_token`](Flow::request_token) through
//! [`access_token`](Flow::access_token) themselves. Nothing is retried;
//! every failure is reported to the caller.

use std::collections::HashMap;

use http::{Method, Request, Response};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{FlowError, Result};
use crate::signature;
use crate::token::{Token, TokenReader};
use crate::transport::{with_authorization, RoundTripper};
use crate::{OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY};

/// Drives the request-token → authorize → access-token exchange against a
/// provider, over an injected transport.
///
/// ```no_run
/// # async fn run() -> oauth1a::Result<()> {
/// use oauth1a::{Config, Endpoint, Flow};
///
/// let config = Config::new("consumer_key", "consumer_secret")
///     .callback_url("http://localhost/callback")
///     .endpoint(Endpoint::twitter());
/// let flow = Flow::new(config, reqwest::Client::new());
///
/// let temporary = flow.request_token().await?;
/// println!("authorize at {}", flow.authorize_url(&temporary)?);
/// // ... resource owner authorizes, the provider redirects back ...
/// # let verifier = "verifier";
/// let token = flow.access_token(&temporary, verifier).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Flow<T> {
    config: Config,
    transport: T,
}

impl<T> Flow<T> {
    pub fn new(config: Config, transport: T) -> Self {
        Flow { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The configured authorize URL with `oauth_token` appended, preserving
    /// any query parameters already present.
    pub fn authorize_url(&self, temporary: &Token) -> Result<Url> {
        let mut url = Url::parse(&self.config.endpoint.authorize_url)
            .map_err(FlowError::InvalidAuthorizeUrl)?;
        url.query_pairs_mut()
            .append_pair(OAUTH_TOKEN_KEY, &temporary.token);
        Ok(url)
    }
}

impl<T: RoundTripper> Flow<T> {
    /// Obtains a temporary credential (RFC 5849 2.1) by POSTing a signed
    /// request carrying `oauth_callback`. The response must confirm the
    /// callback with the literal `"true"` and carry a non-empty token pair.
    pub async fn request_token(&self) -> Result<Token> {
        let url = &self.config.endpoint.request_token_url;
        debug!(url = %url, "requesting temporary credential");
        let req = empty_post(url)?;
        let header = self.config.request_token_auth_header(&req)?;
        let response = self.transport.round_trip(with_authorization(req, header)?).await?;
        let response = successful(response)?;

        let parsed = response.parse_oauth_token()?;
        if !parsed.callback_confirmed() {
            return Err(FlowError::CallbackNotConfirmed.into());
        }
        Ok(parsed.credentials()?)
    }

    /// Exchanges the temporary credential and verifier for a token
    /// credential (RFC 5849 2.3). The callback confirmation is not checked
    /// here; providers only send it on the request-token step.
    pub async fn access_token(&self, temporary: &Token, verifier: &str) -> Result<Token> {
        let url = &self.config.endpoint.access_token_url;
        debug!(url = %url, "exchanging verifier for token credential");
        let req = empty_post(url)?;
        let header = self.config.access_token_auth_header(&req, temporary, verifier)?;
        let response = self.transport.round_trip(with_authorization(req, header)?).await?;
        let response = successful(response)?;

        Ok(response.parse_oauth_token()?.credentials()?)
    }
}

/// Extracts `oauth_token` and `oauth_verifier` from an authorization
/// callback request, looking at the query string and, for form posts, the
/// body.
pub fn parse_authorization_callback<B: AsRef<[u8]>>(req: &Request<B>) -> Result<(String, String)> {
    let mut params: HashMap<String, String> = HashMap::new();
    if let Some(query) = req.uri().query() {
        signature::merge_form_encoded(&mut params, query.as_bytes());
    }
    let body = req.body().as_ref();
    if !body.is_empty() && signature::is_form_request(req) {
        signature::merge_form_encoded(&mut params, body);
    }

    match (params.remove(OAUTH_TOKEN_KEY), params.remove(OAUTH_VERIFIER_KEY)) {
        (Some(token), Some(verifier)) if !token.is_empty() && !verifier.is_empty() => {
            Ok((token, verifier))
        }
        _ => Err(FlowError::MissingCallbackParameters.into()),
    }
}

fn empty_post(url: &str) -> Result<Request<Vec<u8>>> {
    Ok(Request::builder()
        .method(Method::POST)
        .uri(url)
        .body(Vec::new())
        .map_err(FlowError::InvalidEndpoint)?)
}

fn successful(response: Response<Vec<u8>>) -> Result<Response<Vec<u8>>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = String::from_utf8_lossy(response.body()).into_owned();
    Err(FlowError::ProviderHttp { status, body }.into())
}
