//! Canonicalization: parameter collection, the normalized parameter string,
//! the signature base string (RFC 5849 3.4.1), and the `Authorization`
//! header codec (RFC 5849 3.5.1).
//!
//! Duplicate parameter names are not supported: for every source only the
//! first value of a repeated key is kept. Full RFC 5849 multi-value handling
//! would require threading multi-maps through the entire pipeline.

use std::collections::HashMap;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request};
use url::Url;

use crate::encode::{percent_decode, percent_encode};
use crate::error::ParamError;
use crate::{OAUTH_SIGNATURE_KEY, REALM_KEY};

/// `Authorization` scheme prefix; the trailing space is intentional.
pub(crate) const AUTHORIZATION_PREFIX: &str = "OAuth ";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Parses the request URI into an absolute [`Url`].
pub(crate) fn request_url<B>(req: &Request<B>) -> Result<Url, ParamError> {
    Ok(Url::parse(&req.uri().to_string())?)
}

/// The base string URI of RFC 5849 3.4.1.2: scheme and host lowercased,
/// default port dropped, query and fragment removed.
pub(crate) fn base_string_url(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.to_string()
}

/// Gathers the parameters that feed the signature base:
///
/// 1. query parameters of `url` (first value per key),
/// 2. form-body parameters, only when the `Content-Type` header is exactly
///    `application/x-www-form-urlencoded` and the body is non-empty,
/// 3. the supplied OAuth protocol parameters.
///
/// On a name collision OAuth parameters override body parameters, which
/// override query parameters. The request body is only borrowed; callers
/// keep the original bytes.
pub(crate) fn collect_parameters<B: AsRef<[u8]>>(
    req: &Request<B>,
    url: &Url,
    oauth_params: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params: HashMap<String, String> = HashMap::new();
    if let Some(query) = url.query() {
        merge_form_encoded(&mut params, query.as_bytes());
    }
    let body = req.body().as_ref();
    if !body.is_empty() && is_form_request(req) {
        merge_form_encoded(&mut params, body);
    }
    for (key, value) in oauth_params {
        params.insert(key.clone(), value.clone());
    }
    params
}

/// Collects the parameters of an inbound request, including those carried in
/// the `Authorization: OAuth` header, and splits out the claimed
/// `oauth_signature` (already percent-decoded). The `realm` parameter is
/// excluded per RFC 5849 3.4.1.3.1.
pub(crate) fn collect_request_parameters<B: AsRef<[u8]>>(
    req: &Request<B>,
    url: &Url,
) -> Result<(HashMap<String, String>, String), ParamError> {
    let mut params = collect_parameters(req, url, &HashMap::new());

    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if auth_header
        .to_ascii_lowercase()
        .starts_with(&AUTHORIZATION_PREFIX.to_ascii_lowercase())
    {
        for (key, value) in parse_auth_header_pairs(&auth_header[AUTHORIZATION_PREFIX.len()..])? {
            params.insert(key, value);
        }
    }

    let signature = params.remove(OAUTH_SIGNATURE_KEY).unwrap_or_default();
    Ok((params, signature))
}

/// Parses the pair list of an `OAuth` authorization header (prefix already
/// stripped). Values may be wrapped in double quotes; both sides are
/// percent-decoded with the strict RFC 5849 3.6 decoder. `realm` is dropped.
fn parse_auth_header_pairs(header: &str) -> Result<Vec<(String, String)>, ParamError> {
    let mut pairs = Vec::new();
    for raw in header.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| ParamError::MalformedAuthHeader(raw.to_string()))?;
        let key = percent_decode(key)?;
        if key == REALM_KEY {
            continue;
        }
        let value = percent_decode(value.trim_matches('"'))?;
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Percent-encodes each pair, sorts by encoded key (ties break on the
/// encoded value), and joins as `k=v&k=v`, yielding the normalized
/// parameter string of RFC 5849 3.4.1.3.2.
pub fn normalized_parameter_string(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    pairs.sort();
    let pairs: Vec<String> = pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    pairs.join("&")
}

/// The signature base string of RFC 5849 3.4.1: uppercase method, encoded
/// base string URI, and encoded normalized parameter string, joined with
/// `&` unconditionally.
pub fn signature_base(method: &Method, url: &Url, params: &HashMap<String, String>) -> String {
    let parts = [
        method.as_str().to_uppercase(),
        percent_encode(&base_string_url(url)),
        percent_encode(&normalized_parameter_string(params)),
    ];
    parts.join("&")
}

/// Formats OAuth protocol parameters (including `oauth_signature`) into an
/// `OAuth k=v, k=v` header value. Keys are sorted so output is
/// deterministic; values are not quoted.
pub fn auth_header_value(oauth_params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(String, String)> = oauth_params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    pairs.sort();
    let pairs: Vec<String> = pairs
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    format!("{AUTHORIZATION_PREFIX}{}", pairs.join(", "))
}

pub(crate) fn is_form_request<B>(req: &Request<B>) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        == Some(FORM_CONTENT_TYPE)
}

// First value per key; repeated names are a documented limitation.
pub(crate) fn merge_form_encoded(params: &mut HashMap<String, String>, input: &[u8]) {
    for (key, value) in url::form_urlencoded::parse(input) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
}
