use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::SettingsError;
use crate::http::{ErrorPolicy, Headers};

#[derive(Debug)]
pub struct Client {
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub error_policy: ErrorPolicy,
    pub default_headers: Headers,
}

impl Client {
    pub fn new(sources: Vec<PartialClient>) -> Result<Self, SettingsError> {
        let merged: PartialClient =
            sources
                .into_iter()
                .fold(Default::default(), |acc, x| PartialClient {
                    base_url: acc.base_url.or(x.base_url),
                    timeout: acc.timeout.or(x.timeout),
                    error_policy: acc.error_policy.or(x.error_policy),
                    default_headers: acc.default_headers.or(x.default_headers),
                });

        Ok(Client {
            base_url: merged
                .base_url
                .ok_or_else(|| SettingsError::MissingValue("client.base_url".to_string()))?,
            timeout: merged.timeout,
            error_policy: merged.error_policy.ok_or_else(|| {
                SettingsError::MissingValue("client.error_policy".to_string())
            })?,
            default_headers: merged.default_headers.ok_or_else(|| {
                SettingsError::MissingValue("client.default_headers".to_string())
            })?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PartialClient {
    pub base_url: Option<Url>,

    #[serde(default)]
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,

    pub error_policy: Option<ErrorPolicy>,

    pub default_headers: Option<Headers>,
}
