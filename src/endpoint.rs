//! Provider endpoint URL triples. Plain data; no behavior attaches to it.

/// The three URLs of an OAuth 1 provider: where temporary credentials are
/// requested, where the resource owner authorizes, and where token
/// credentials are exchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub request_token_url: String,
    pub authorize_url: String,
    pub access_token_url: String,
}

impl Endpoint {
    pub fn new(
        request_token_url: impl Into<String>,
        authorize_url: impl Into<String>,
        access_token_url: impl Into<String>,
    ) -> Self {
        Endpoint {
            request_token_url: request_token_url.into(),
            authorize_url: authorize_url.into(),
            access_token_url: access_token_url.into(),
        }
    }

    /// Twitter's OAuth 1a endpoint.
    pub fn twitter() -> Self {
        Endpoint::new(
            "https://api.twitter.com/oauth/request_token",
            "https://api.twitter.com/oauth/authorize",
            "https://api.twitter.com/oauth/access_token",
        )
    }

    /// Tumblr's OAuth 1a endpoint.
    pub fn tumblr() -> Self {
        Endpoint::new(
            "https://www.tumblr.com/oauth/request_token",
            "https://www.tumblr.com/oauth/authorize",
            "https://www.tumblr.com/oauth/access_token",
        )
    }

    /// Dropbox's OAuth 1 endpoint.
    pub fn dropbox() -> Self {
        Endpoint::new(
            "https://api.dropbox.com/1/oauth/request_token",
            "https://www.dropbox.com/1/oauth/authorize",
            "https://api.dropbox.com/1/oauth/access_token",
        )
    }

    /// Discogs's OAuth 1a endpoint.
    pub fn discogs() -> Self {
        Endpoint::new(
            "https://api.discogs.com/oauth/request_token",
            "https://www.discogs.com/oauth/authorize",
            "https://api.discogs.com/oauth/access_token",
        )
    }

    /// Etsy's OAuth 1 endpoint. Etsy returns the authorize URL in the
    /// request-token response (`login_url`), so none is configured here.
    pub fn etsy() -> Self {
        Endpoint::new(
            "https://openapi.etsy.com/v2/oauth/request_token?scope=transactions_r",
            "",
            "https://openapi.etsy.com/v2/oauth/access_token",
        )
    }
}
