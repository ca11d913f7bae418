//! The round-trip capability and the authenticating wrapper around it.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Request, Response};

use crate::config::Config;
use crate::error::{Result, TransportError};
use crate::token::TokenSource;

/// A black-box HTTP transport: accepts a request, returns a response.
///
/// The library never constructs a client of its own; callers inject one at
/// construction, which also makes it the layering point for retries,
/// tracing, or deadlines. Cancellation flows through the injected
/// transport unchanged.
#[async_trait]
pub trait RoundTripper: Send + Sync {
    async fn round_trip(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

#[async_trait]
impl<T: RoundTripper + ?Sized> RoundTripper for Arc<T> {
    async fn round_trip(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        (**self).round_trip(request).await
    }
}

/// `reqwest::Client` is the stock transport.
#[async_trait]
impl RoundTripper for reqwest::Client {
    async fn round_trip(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let request = reqwest::Request::try_from(request).map_err(TransportError::new)?;
        let response = self.execute(request).await.map_err(TransportError::new)?;

        let mut builder = Response::builder().status(response.status());
        for (name, value) in response.headers() {
            builder = builder.header(name, value);
        }
        let body = response.bytes().await.map_err(TransportError::new)?.to_vec();
        Ok(builder.body(body).map_err(TransportError::new)?)
    }
}

pub(crate) fn with_authorization(
    mut request: Request<Vec<u8>>,
    header: String,
) -> Result<Request<Vec<u8>>> {
    let value = HeaderValue::try_from(header).map_err(TransportError::new)?;
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(request)
}

/// A [`RoundTripper`] that signs every outbound request.
///
/// On each call it draws the token from its source, builds fresh OAuth
/// parameters (timestamp, nonce), signs the request with the configured
/// [`Signer`](crate::Signer), sets the `Authorization` header, and forwards
/// to the base transport. The request body is read in place for form
/// parameters and forwarded byte-for-byte.
#[derive(Debug, Clone)]
pub struct Transport<T, S> {
    base: T,
    config: Config,
    source: S,
}

impl<T, S> Transport<T, S> {
    pub fn new(base: T, config: Config, source: S) -> Self {
        Transport {
            base,
            config,
            source,
        }
    }
}

#[async_trait]
impl<T, S> RoundTripper for Transport<T, S>
where
    T: RoundTripper,
    S: TokenSource,
{
    async fn round_trip(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let token = self.source.token()?;
        let header = self.config.request_auth_header(&request, &token)?;
        let request = with_authorization(request, header)?;
        self.base.round_trip(request).await
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use http::header::CONTENT_TYPE;
    use http::Method;

    use super::testing::MockTransport;
    use super::*;
    use crate::clock::testing::FixedClock;
    use crate::noncer::NoncerFn;
    use crate::token::{StaticTokenSource, Token};

    fn test_config() -> Config {
        Config::new("consumer_key", "consumer_secret")
            .clock(FixedClock(123_456_789))
            .noncer(NoncerFn(|| "some_nonce".to_string()))
    }

    fn parse_header_params(header: &str) -> HashMap<String, String> {
        header
            .strip_prefix("OAuth ")
            .unwrap()
            .split(", ")
            .map(|pair| pair.split_once('=').unwrap())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn signs_outbound_requests() {
        let base = Arc::new(MockTransport::ok(""));
        let transport = Transport::new(
            base.clone(),
            test_config(),
            StaticTokenSource::new(Token::new("some_token", "some_secret")),
        );

        let request = Request::builder()
            .method(Method::GET)
            .uri("https://example.com/resource")
            .body(Vec::new())
            .unwrap();
        transport.round_trip(request).await.unwrap();

        let seen = base.take_request();
        let header = seen.headers()[AUTHORIZATION].to_str().unwrap().to_string();
        let params = parse_header_params(&header);
        assert_eq!(params["oauth_token"], "some_token");
        assert_eq!(params["oauth_consumer_key"], "consumer_key");
        assert_eq!(params["oauth_nonce"], "some_nonce");
        assert_eq!(params["oauth_signature_method"], "HMAC-SHA1");
        assert_eq!(params["oauth_timestamp"], "123456789");
        assert_eq!(params["oauth_version"], "1.0");
        assert!(!params["oauth_signature"].is_empty());
    }

    #[tokio::test]
    async fn form_body_is_forwarded_intact() {
        let base = Arc::new(MockTransport::ok(""));
        let transport = Transport::new(
            base.clone(),
            test_config(),
            StaticTokenSource::new(Token::new("some_token", "some_secret")),
        );

        let body = b"status=Hello+Ladies+%2B+Gentlemen%2C+a+signed+OAuth+request%21".to_vec();
        let request = Request::builder()
            .method(Method::POST)
            .uri("https://example.com/update")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body.clone())
            .unwrap();
        transport.round_trip(request).await.unwrap();

        let seen = base.take_request();
        assert_eq!(seen.body(), &body);
        assert!(seen.headers().contains_key(AUTHORIZATION));
    }

    #[tokio::test]
    async fn identical_requests_sign_identically_under_fixed_inputs() {
        let base = Arc::new(MockTransport::ok(""));
        let transport = Transport::new(
            base.clone(),
            test_config(),
            StaticTokenSource::new(Token::new("some_token", "some_secret")),
        );

        let build = || {
            Request::builder()
                .method(Method::GET)
                .uri("https://example.com/resource?q=1")
                .body(Vec::new())
                .unwrap()
        };
        transport.round_trip(build()).await.unwrap();
        transport.round_trip(build()).await.unwrap();

        let first = base.take_request();
        let second = base.take_request();
        assert_eq!(
            first.headers()[AUTHORIZATION],
            second.headers()[AUTHORIZATION]
        );
    }

    #[tokio::test]
    async fn token_source_failure_surfaces() {
        struct DryTokenSource;
        impl crate::token::TokenSource for DryTokenSource {
            fn token(&self) -> std::result::Result<Token, crate::error::TokenSourceError> {
                Err(crate::error::TokenSourceError::new("store offline"))
            }
        }

        let transport = Transport::new(Arc::new(MockTransport::ok("")), test_config(), DryTokenSource);
        let request = Request::builder()
            .uri("https://example.com/resource")
            .body(Vec::new())
            .unwrap();
        let err = transport.round_trip(request).await.unwrap_err();
        assert!(matches!(err, crate::Error::Token(_)));
    }
}
