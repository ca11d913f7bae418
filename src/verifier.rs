//! Server-side verification of signed requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use http::header::{FORWARDED, HOST};
use http::{HeaderMap, Request};
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{BoxError, ParamError, Result, VerifyError};
use crate::signature;
use crate::signer::Signer;
use crate::{OAUTH_CONSUMER_KEY, OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Checks a claimed signature against a signature base string.
pub trait Verifier: Send + Sync {
    fn verify(&self, base: &str, signature: &str) -> std::result::Result<(), VerifyError>;
}

/// Resolves the [`Verifier`] for a request from its consumer key and
/// signature method.
///
/// This callback is also the extension point for per-consumer policy and
/// nonce-uniqueness bookkeeping: the full parameter map is supplied so
/// implementations can record the timestamp/nonce pair before accepting.
pub trait VerifierLookup: Send + Sync {
    fn verifier(
        &self,
        consumer_key: &str,
        signature_method: &str,
        params: &HashMap<String, String>,
    ) -> std::result::Result<Box<dyn Verifier>, BoxError>;
}

/// Adapter letting a closure act as a [`VerifierLookup`].
pub struct LookupFn<F>(pub F);

impl<F> VerifierLookup for LookupFn<F>
where
    F: Fn(&str, &str, &HashMap<String, String>) -> std::result::Result<Box<dyn Verifier>, BoxError>
        + Send
        + Sync,
{
    fn verifier(
        &self,
        consumer_key: &str,
        signature_method: &str,
        params: &HashMap<String, String>,
    ) -> std::result::Result<Box<dyn Verifier>, BoxError> {
        (self.0)(consumer_key, signature_method, params)
    }
}

/// [`Verifier`] recomputing an HMAC signature and comparing in constant
/// time. The claimed signature arrives percent-decoded but still base64.
pub struct HmacVerifier {
    signer: Arc<dyn Signer>,
    token_secret: String,
}

impl HmacVerifier {
    /// Uses the signature method configured on `config` (HMAC-SHA1 unless
    /// replaced) and the token secret matching the request's `oauth_token`,
    /// empty for tokenless requests.
    pub fn new(config: &Config, token_secret: impl Into<String>) -> Self {
        HmacVerifier {
            signer: config.signer.clone(),
            token_secret: token_secret.into(),
        }
    }
}

impl Verifier for HmacVerifier {
    fn verify(&self, base: &str, signature: &str) -> std::result::Result<(), VerifyError> {
        let expected = self.signer.sign(&self.token_secret, base)?;
        if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            Ok(())
        } else {
            Err(VerifyError::InvalidSignature("signature mismatch".into()))
        }
    }
}

enum DigestKind {
    Sha1,
    Sha256,
}

/// [`Verifier`] for the RSA family: base64-decodes the claimed signature and
/// checks PKCS#1 v1.5 over the digest of the base string.
pub struct RsaVerifier {
    public_key: RsaPublicKey,
    digest: DigestKind,
}

impl RsaVerifier {
    /// Verifier for `RSA-SHA1` signatures.
    pub fn sha1(public_key: RsaPublicKey) -> Self {
        RsaVerifier {
            public_key,
            digest: DigestKind::Sha1,
        }
    }

    /// Verifier for `RSA-SHA256` signatures.
    pub fn sha256(public_key: RsaPublicKey) -> Self {
        RsaVerifier {
            public_key,
            digest: DigestKind::Sha256,
        }
    }
}

impl Verifier for RsaVerifier {
    fn verify(&self, base: &str, signature: &str) -> std::result::Result<(), VerifyError> {
        let raw = BASE64
            .decode(signature)
            .map_err(|err| VerifyError::InvalidSignature(Box::new(err)))?;
        let checked = match self.digest {
            DigestKind::Sha1 => self.public_key.verify(
                Pkcs1v15Sign::new::<Sha1>(),
                &Sha1::digest(base.as_bytes()),
                &raw,
            ),
            DigestKind::Sha256 => self.public_key.verify(
                Pkcs1v15Sign::new::<Sha256>(),
                &Sha256::digest(base.as_bytes()),
                &raw,
            ),
        };
        checked.map_err(|err| VerifyError::InvalidSignature(Box::new(err)))
    }
}

/// Verifies inbound signed requests: absolutizes the URL, collects the
/// parameters, checks the timestamp, and dispatches to the verifier the
/// lookup supplies.
///
/// Duplicated parameters are not supported; only the first value of a
/// repeated name is considered.
pub struct VerifierManager<L> {
    lookup: L,
    default_scheme: String,
    max_clock_skew: Option<Duration>,
    clock: Arc<dyn Clock>,
}

impl<L: VerifierLookup> VerifierManager<L> {
    /// `default_scheme` is consulted when neither the request URL nor the
    /// `Forwarded`/`X-Forwarded-Proto` headers name one. `max_clock_skew`
    /// of `None` disables the timestamp check.
    pub fn new(lookup: L, default_scheme: impl Into<String>, max_clock_skew: Option<Duration>) -> Self {
        VerifierManager {
            lookup,
            default_scheme: default_scheme.into(),
            max_clock_skew,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Verifies one request.
    ///
    /// The skew check is one-sided: only timestamps older than the allowed
    /// skew are rejected, future ones pass. Callers wanting a symmetric
    /// window must layer their own check. Nonce uniqueness is likewise left
    /// to the [`VerifierLookup`].
    pub fn verify<B: AsRef<[u8]>>(&self, req: &Request<B>) -> Result<()> {
        let url = absolute_request_url(req, &self.default_scheme)?;
        let (params, claimed_signature) = signature::collect_request_parameters(req, &url)?;

        let timestamp = params
            .get(OAUTH_TIMESTAMP_KEY)
            .map(String::as_str)
            .unwrap_or_default();
        self.check_timestamp(timestamp)?;

        let consumer_key = params
            .get(OAUTH_CONSUMER_KEY)
            .map(String::as_str)
            .unwrap_or_default();
        let signature_method = params
            .get(OAUTH_SIGNATURE_METHOD_KEY)
            .map(String::as_str)
            .unwrap_or_default();
        debug!(consumer_key, signature_method, "dispatching signature verifier");
        let verifier = self
            .lookup
            .verifier(consumer_key, signature_method, &params)
            .map_err(VerifyError::Lookup)?;

        let base = signature::signature_base(req.method(), &url, &params);
        verifier.verify(&base, &claimed_signature)?;
        Ok(())
    }

    fn check_timestamp(&self, raw: &str) -> std::result::Result<(), VerifyError> {
        let Some(max_skew) = self.max_clock_skew else {
            return Ok(());
        };
        let timestamp: u64 = raw
            .parse()
            .map_err(|_| VerifyError::BadTimestamp(raw.to_string()))?;
        let now = self.clock.epoch_seconds();
        if now.saturating_sub(timestamp) > max_skew.as_secs() {
            return Err(VerifyError::ClockSkew { timestamp, now });
        }
        Ok(())
    }
}

/// Builds an absolute URL for an inbound request. Proxied requests usually
/// carry an origin-form target; the host then comes from the `Host` header
/// and the scheme from `Forwarded` (RFC 7239), `X-Forwarded-Proto`, or the
/// configured default, in that order.
fn absolute_request_url<B>(
    req: &Request<B>,
    default_scheme: &str,
) -> std::result::Result<Url, ParamError> {
    let uri = req.uri();
    if uri.scheme().is_some() {
        return Ok(Url::parse(&uri.to_string())?);
    }

    let host = uri
        .authority()
        .map(|authority| authority.to_string())
        .or_else(|| {
            req.headers()
                .get(HOST)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_default();
    let scheme = forwarded_proto(req.headers())
        .or_else(|| {
            req.headers()
                .get(X_FORWARDED_PROTO)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| default_scheme.to_string());
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Ok(Url::parse(&format!("{scheme}://{host}{path_and_query}"))?)
}

// RFC 7239: pairs separated by ";", e.g. `for="127.0.0.1";proto=https`
fn forwarded_proto(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(FORWARDED)?.to_str().ok()?;
    for pair in raw.split(';') {
        if let Some((key, value)) = pair.trim().split_once('=') {
            if key == "proto" {
                return Some(value.trim_matches('"').to_string());
            }
        }
    }
    None
}
