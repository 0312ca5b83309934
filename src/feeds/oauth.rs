use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// OAuth 1.0a user-context credentials.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl OAuthCredentials {
    /// Build the `Authorization` header for a request with the given query/body parameters.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<String> {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();

        self.authorization_header_with(method, url, params, &nonce, &timestamp)
    }

    fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.consumer_key.clone()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.access_token.clone()),
            ("oauth_version", "1.0".to_string()),
        ];

        let signature = self.signature(method, url, params, &oauth_params)?;
        oauth_params.push(("oauth_signature", signature));

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();

        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, String)],
        oauth_params: &[(&str, String)],
    ) -> Result<String> {
        let mut encoded: Vec<(String, String)> = params
            .iter()
            .chain(oauth_params.iter())
            .map(|(k, v)| (encode(k), encode(v)))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            encode(url),
            encode(&param_string)
        );
        let signing_key = format!(
            "{}&{}",
            encode(&self.consumer_secret),
            encode(&self.access_token_secret)
        );

        let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid OAuth signing key: {}", e))?;
        mac.update(base_string.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

/// RFC 3986 percent-encoding: everything except `A-Z a-z 0-9 - . _ ~`.
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs_credentials() -> OAuthCredentials {
        OAuthCredentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            access_token_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        }
    }

    fn docs_params() -> Vec<(&'static str, String)> {
        vec![
            ("include_entities", "true".to_string()),
            (
                "status",
                "Hello Ladies + Gentlemen, a signed OAuth request!".to_string(),
            ),
        ]
    }

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("!"), "%21");
    }

    #[test]
    fn test_signature_matches_reference_request() {
        let creds = docs_credentials();
        let header = creds.authorization_header_with(
            "POST",
            "https://api.twitter.com/1.1/statuses/update.json",
            &docs_params(),
            "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
            "1318622958",
        )
        .unwrap();

        assert!(header.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\""));
    }

    #[test]
    fn test_header_lists_oauth_fields() {
        let creds = docs_credentials();
        let header = creds.authorization_header(
            "GET",
            "https://api.twitter.com/1.1/statuses/user_timeline.json",
            &[("screen_name", "alice".to_string())],
        )
        .unwrap();

        assert!(header.starts_with("OAuth "));
        for field in [
            "oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\"",
            "oauth_signature_method=\"HMAC-SHA1\"",
            "oauth_version=\"1.0\"",
            "oauth_nonce=",
            "oauth_timestamp=",
            "oauth_signature=",
        ] {
            assert!(header.contains(field), "missing {} in {}", field, header);
        }
        // Request parameters are signed but not sent in the header
        assert!(!header.contains("screen_name"));
    }

    #[test]
    fn test_nonce_changes_between_requests() {
        let creds = docs_credentials();
        let url = "https://api.twitter.com/1.1/statuses/user_timeline.json";
        let first = creds.authorization_header("GET", url, &[]).unwrap();
        let second = creds.authorization_header("GET", url, &[]).unwrap();
        assert_ne!(first, second);
    }
}
