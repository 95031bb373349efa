use std::env;

use crate::error::ConfigError;

const DEFAULT_API_VERSION: &str = "v1";
const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
const DEFAULT_SERVER_PORT: u16 = 3000;

/// Path appended to the site URL when a visitor backs out of checkout.
pub const DONATE_PATH: &str = "/donate";

#[derive(Clone, Debug)]
pub struct Config {
    pub sanity_project_id: String,
    pub sanity_dataset: String,
    pub sanity_use_cdn: bool,
    pub sanity_api_version: String,
    pub sanity_api_host: Option<String>,
    pub stripe_secret_key: String,
    pub publishable_key: String,
    pub site_url: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        Ok(Config {
            sanity_project_id: required("SANITY_PROJECT_ID")?,
            sanity_dataset: required("SANITY_DATASET")?,
            sanity_use_cdn: match lookup("SANITY_USE_CDN") {
                Some(value) => parse_bool("SANITY_USE_CDN", value)?,
                None => true,
            },
            sanity_api_version: lookup("SANITY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            sanity_api_host: lookup("SANITY_API_HOST"),
            stripe_secret_key: required("STRIPE_SECRET_KEY")?,
            publishable_key: required("PUBLISHABLE_KEY")?,
            site_url: required("URL")?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: match lookup("SERVER_PORT") {
                Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                    key: "SERVER_PORT",
                    value,
                })?,
                None => DEFAULT_SERVER_PORT,
            },
        })
    }

    pub fn success_url(&self) -> String {
        self.site_url.clone()
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.site_url, DONATE_PATH)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_bool(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
