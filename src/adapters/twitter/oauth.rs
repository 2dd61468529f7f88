//! OAuth 1.0a request signing (HMAC-SHA1, RFC 5849) for user-context Twitter calls.
//!
//! Only query and form parameters take part in the signature; JSON and multipart bodies do not.

use crate::shared::config::TwitterCredentials;
use base64::Engine as _;
use rand::Rng;
use rand::distributions::Alphanumeric;
use ring::hmac;

const NONCE_LEN: usize = 32;

/// Builds `Authorization: OAuth ...` header values for one credential set.
pub struct OAuth1Signer {
    creds: TwitterCredentials,
}

impl OAuth1Signer {
    pub fn new(creds: TwitterCredentials) -> Self {
        Self { creds }
    }

    /// Header for `method url`, where `url` has no query string and `params` are the
    /// query (or form) parameters sent with the request.
    pub fn authorization_header(&self, method: &str, url: &str, params: &[(&str, &str)]) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, params, &nonce, &timestamp)
    }

    fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut oauth: Vec<(&str, String)> = vec![
            ("oauth_consumer_key", self.creds.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.creds.access_token.clone()),
            ("oauth_version", "1.0".to_string()),
        ];

        let mut all: Vec<(&str, &str)> = params.to_vec();
        all.extend(oauth.iter().map(|(k, v)| (*k, v.as_str())));
        let signature = self.sign(&signature_base_string(method, url, &all));
        oauth.push(("oauth_signature", signature));

        let fields = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("OAuth {}", fields)
    }

    fn sign(&self, base_string: &str) -> String {
        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.creds.consumer_secret),
            percent_encode(&self.creds.access_token_secret)
        );
        let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, signing_key.as_bytes());
        let tag = hmac::sign(&key, base_string.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(tag.as_ref())
    }
}

/// RFC 3986 encoding: everything except `A-Z a-z 0-9 - . _ ~`.
fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// `METHOD&enc(url)&enc(sorted k=v pairs)`, pairs sorted after encoding.
fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}
