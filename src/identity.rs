//! Player identity supplied by the authenticating proxy

use axum::http::HeaderMap;
use serde::Serialize;
use thiserror::Error;

use crate::config::IdentityConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("missing identity header {0}")]
    Missing(String),

    #[error("identity header {0} is not valid UTF-8")]
    Malformed(String),
}

/// Authenticated player; only used for logging and audit context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerIdentity {
    pub user_id: String,
    pub display_name: Option<String>,
}

/// Resolves the identity behind a request
pub trait IdentityProvider: Send + Sync {
    fn identify(&self, headers: &HeaderMap) -> Result<PlayerIdentity, IdentityError>;
}

/// Reads identity headers injected by a reverse proxy that already performed
/// the OAuth exchange
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    user_header: String,
    name_header: String,
}

impl HeaderIdentity {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            user_header: config.user_header.to_ascii_lowercase(),
            name_header: config.name_header.to_ascii_lowercase(),
        }
    }
}

impl IdentityProvider for HeaderIdentity {
    fn identify(&self, headers: &HeaderMap) -> Result<PlayerIdentity, IdentityError> {
        let user_id = headers
            .get(self.user_header.as_str())
            .ok_or_else(|| IdentityError::Missing(self.user_header.clone()))?
            .to_str()
            .map_err(|_| IdentityError::Malformed(self.user_header.clone()))?
            .trim();

        if user_id.is_empty() {
            return Err(IdentityError::Missing(self.user_header.clone()));
        }

        // A bad display name is not worth refusing the player over
        let display_name = headers
            .get(self.name_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(PlayerIdentity {
            user_id: user_id.to_string(),
            display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn provider() -> HeaderIdentity {
        HeaderIdentity::new(&IdentityConfig::default())
    }

    #[test]
    fn test_identify() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-user", HeaderValue::from_static("u-42"));
        headers.insert(
            "x-forwarded-preferred-username",
            HeaderValue::from_static("alice"),
        );

        let identity = provider().identify(&headers).unwrap();
        assert_eq!(identity.user_id, "u-42");
        assert_eq!(identity.display_name.as_deref(), Some("alice"));
    }

    #[test]
    fn test_display_name_optional() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-user", HeaderValue::from_static("u-42"));
        assert_eq!(provider().identify(&headers).unwrap().display_name, None);
    }

    #[test]
    fn test_missing_or_blank_user() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            provider().identify(&headers),
            Err(IdentityError::Missing(_))
        ));

        headers.insert("x-forwarded-user", HeaderValue::from_static("   "));
        assert!(matches!(
            provider().identify(&headers),
            Err(IdentityError::Missing(_))
        ));
    }

    #[test]
    fn test_non_utf8_user() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-user",
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        assert!(matches!(
            provider().identify(&headers),
            Err(IdentityError::Malformed(_))
        ));
    }
}
