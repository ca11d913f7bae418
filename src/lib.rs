/*!
oauth1a: OAuth 1.0a (RFC 5849) request signing and verification.

# Overview

This library builds and verifies signed OAuth 1.0a HTTP requests. A
consumer obtains a temporary credential, redirects the resource owner for
authorization, exchanges the verifier for a token credential, and then
makes authenticated calls whose `Authorization` headers survive proxies
and re-encodings. The symmetric server side accepts such requests.

The HTTP transport is injected: anything implementing [`RoundTripper`]
works, and `reqwest::Client` implements it out of the box.

# Three-legged authorization

```no_run
# async fn run() -> oauth1a::Result<()> {
use oauth1a::{Config, Endpoint, Flow};

let config = Config::new("consumer_key", "consumer_secret")
    .callback_url("http://localhost/callback")
    .endpoint(Endpoint::twitter());
let flow = Flow::new(config, reqwest::Client::new());

// step 1: temporary credential
let temporary = flow.request_token().await?;

// step 2: send the resource owner off to authorize
println!("open {} in your browser", flow.authorize_url(&temporary)?);

// step 3: exchange the verifier from the callback (or PIN) for the token
# let verifier = "verifier";
let token = flow.access_token(&temporary, verifier).await?;
println!("token: {} secret: {}", token.token, token.token_secret);
# Ok(())
# }
```

# Authenticated requests

```no_run
# async fn run() -> oauth1a::Result<()> {
use oauth1a::{Config, RoundTripper, Token};

let config = Config::new("consumer_key", "consumer_secret");
let client = config.client(reqwest::Client::new(), Token::new("token", "token_secret"));

let request = http::Request::get("https://api.twitter.com/1.1/statuses/home_timeline.json")
    .body(Vec::new())
    .map_err(|e| oauth1a::FlowError::InvalidEndpoint(e))?;
let response = client.round_trip(request).await?;
# Ok(())
# }
```

# Verifying inbound requests

```
use std::collections::HashMap;
use oauth1a::{BoxError, Config, HmacVerifier, LookupFn, Verifier, VerifierManager};

let manager = VerifierManager::new(
    LookupFn(|consumer_key: &str, _method: &str, _params: &HashMap<String, String>|
        -> Result<Box<dyn Verifier>, BoxError> {
        // look up the consumer's secret and the token secret here; this is
        // also the place to record the nonce for replay protection
        let config = Config::new(consumer_key, "consumer_secret");
        Ok(Box::new(HmacVerifier::new(&config, "")))
    }),
    "https",
    Some(std::time::Duration::from_secs(600)),
);
# let _ = manager;
```

Duplicated parameter names are unsupported throughout: only the first
value of a repeated key enters the signature base. Signing a form body
requires the exact `application/x-www-form-urlencoded` content type and
reads the buffered body in place; callers keep their bytes.
*/

mod clock;
mod config;
mod encode;
mod endpoint;
mod error;
mod flow;
mod noncer;
mod signature;
mod signer;
mod token;
mod transport;
mod verifier;

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use encode::{percent_decode, percent_encode};
pub use endpoint::Endpoint;
pub use error::{
    BoxError, EncodeError, Error, FlowError, ParamError, Result, SignError, TokenSourceError,
    TransportError, VerifyError,
};
pub use flow::{parse_authorization_callback, Flow};
pub use noncer::{Base64Noncer, HexNoncer, Noncer, NoncerFn};
pub use signature::{auth_header_value, normalized_parameter_string, signature_base};
pub use signer::{HmacSha1Signer, HmacSha256Signer, RsaSha1Signer, RsaSha256Signer, Signer};
pub use token::{StaticTokenSource, Token, TokenReader, TokenResponse, TokenSource};
pub use transport::{RoundTripper, Transport};
pub use verifier::{HmacVerifier, LookupFn, RsaVerifier, Verifier, VerifierLookup, VerifierManager};

pub const OAUTH_KEY_PREFIX: &str = "oauth_";
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
pub const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
pub const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
pub const OAUTH_CALLBACK_CONFIRMED_KEY: &str = "oauth_callback_confirmed";
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
pub const REALM_KEY: &str = "realm";

/// The only defined protocol version.
pub const OAUTH_VERSION_VALUE: &str = "1.0";
