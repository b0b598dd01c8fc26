//! Client configuration read from the environment.

use crate::client::LostFoundClient;

pub const DEFAULT_BASE_URL: &str = "https://public-api.delcom.org/api/v1";
pub const BASE_URL_ENV: &str = "LOSTFOUND_BASE_URL";
pub const TOKEN_ENV: &str = "LOSTFOUND_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            base_url: non_empty(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            token: non_empty(TOKEN_ENV),
        }
    }

    pub fn client(&self) -> LostFoundClient {
        let mut client = LostFoundClient::new(&self.base_url);
        client.set_token(self.token.clone());
        client
    }
}
