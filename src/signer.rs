//! Signature methods: the HMAC family keyed by the concatenated encoded
//! secrets, and the RSA family using PKCS#1 v1.5 over a digest of the base
//! string.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;

use crate::encode::percent_encode;
use crate::error::SignError;

/// Produces `oauth_signature` values for signature base strings.
///
/// Implementations are immutable after construction and safe to share. The
/// signature itself is returned unencoded (base64 only); percent-encoding
/// is the header codec's job.
pub trait Signer: Send + Sync {
    /// The `oauth_signature_method` value this signer advertises.
    fn name(&self) -> &'static str;
    /// Signs `base` with the key derived for `token_secret`, returning the
    /// base64 signature.
    fn sign(&self, token_secret: &str, base: &str) -> Result<String, SignError>;
}

// RFC 5849 3.4.2: key is the encoded consumer secret and encoded token
// secret joined by "&". The token secret is empty for request-token calls.
fn hmac_signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    )
}

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// `HMAC-SHA1`, the default signature method.
#[derive(Debug, Clone)]
pub struct HmacSha1Signer {
    consumer_secret: String,
}

impl HmacSha1Signer {
    pub fn new(consumer_secret: impl Into<String>) -> Self {
        HmacSha1Signer {
            consumer_secret: consumer_secret.into(),
        }
    }
}

impl Signer for HmacSha1Signer {
    fn name(&self) -> &'static str {
        "HMAC-SHA1"
    }

    fn sign(&self, token_secret: &str, base: &str) -> Result<String, SignError> {
        let key = hmac_signing_key(&self.consumer_secret, token_secret);
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())?;
        mac.update(base.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

/// `HMAC-SHA256`; same keying as [`HmacSha1Signer`], SHA-256 primitive.
#[derive(Debug, Clone)]
pub struct HmacSha256Signer {
    consumer_secret: String,
}

impl HmacSha256Signer {
    pub fn new(consumer_secret: impl Into<String>) -> Self {
        HmacSha256Signer {
            consumer_secret: consumer_secret.into(),
        }
    }
}

impl Signer for HmacSha256Signer {
    fn name(&self) -> &'static str {
        "HMAC-SHA256"
    }

    fn sign(&self, token_secret: &str, base: &str) -> Result<String, SignError> {
        let key = hmac_signing_key(&self.consumer_secret, token_secret);
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())?;
        mac.update(base.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

/// `RSA-SHA1`: PKCS#1 v1.5 over the SHA-1 digest of the base string, keyed
/// by the consumer's private key. The token secret plays no part.
pub struct RsaSha1Signer {
    private_key: RsaPrivateKey,
}

impl RsaSha1Signer {
    pub fn new(private_key: RsaPrivateKey) -> Self {
        RsaSha1Signer { private_key }
    }
}

impl Signer for RsaSha1Signer {
    fn name(&self) -> &'static str {
        "RSA-SHA1"
    }

    fn sign(&self, _token_secret: &str, base: &str) -> Result<String, SignError> {
        let digest = Sha1::digest(base.as_bytes());
        let signature = self.private_key.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)?;
        Ok(BASE64.encode(signature))
    }
}

/// `RSA-SHA256`; like [`RsaSha1Signer`] with a SHA-256 digest.
pub struct RsaSha256Signer {
    private_key: RsaPrivateKey,
}

impl RsaSha256Signer {
    pub fn new(private_key: RsaPrivateKey) -> Self {
        RsaSha256Signer { private_key }
    }
}

impl Signer for RsaSha256Signer {
    fn name(&self) -> &'static str {
        "RSA-SHA256"
    }

    fn sign(&self, _token_secret: &str, base: &str) -> Result<String, SignError> {
        let digest = Sha256::digest(base.as_bytes());
        let signature = self.private_key.sign(Pkcs1v15Sign::new::<Sha256>(), &digest)?;
        Ok(BASE64.encode(signature))
    }
}
