//!  Delulu Travel Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Amadeus API Configuration
//!
//! Credentials, host selection and transport timeouts for the Amadeus
//! Self-Service API. Binaries fill this from flags or environment variables.

use std::fmt;

pub const TEST_BASE_URL: &str = "https://test.api.amadeus.com";
pub const PRODUCTION_BASE_URL: &str = "https://api.amadeus.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Amadeus environment. API keys are issued per environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum AmadeusHostname {
    #[default]
    Test,
    Production,
}

impl AmadeusHostname {
    pub fn base_url(self) -> &'static str {
        match self {
            AmadeusHostname::Test => TEST_BASE_URL,
            AmadeusHostname::Production => PRODUCTION_BASE_URL,
        }
    }
}

#[derive(Clone)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    pub hostname: AmadeusHostname,
    /// Overrides the hostname, e.g. for a proxy or a mock server.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl AmadeusConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            hostname: AmadeusHostname::default(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn hostname(mut self, hostname: AmadeusHostname) -> Self {
        self.hostname = hostname;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL without trailing slash.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(self.hostname.base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

// Keep the secret out of logs.
impl fmt::Debug for AmadeusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmadeusConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("hostname", &self.hostname)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Amadeus flags shared by the CLI and the MCP server.
#[cfg(feature = "cli")]
#[derive(clap::Args, Clone)]
pub struct AmadeusArgs {
    /// Amadeus API key
    #[arg(long, env = "AMADEUS_CLIENT_ID", hide_env_values = true)]
    pub amadeus_client_id: String,

    /// Amadeus API secret
    #[arg(long, env = "AMADEUS_CLIENT_SECRET", hide_env_values = true)]
    pub amadeus_client_secret: String,

    /// Amadeus environment: test or production
    #[arg(long, env = "AMADEUS_HOSTNAME", value_enum, default_value = "test")]
    pub amadeus_hostname: AmadeusHostname,

    /// Override the API base URL (takes precedence over the hostname)
    #[arg(long, env = "AMADEUS_BASE_URL")]
    pub amadeus_base_url: Option<String>,

    /// HTTP request and connect timeout in seconds
    #[arg(long, env = "AMADEUS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[cfg(feature = "cli")]
impl fmt::Debug for AmadeusArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&AmadeusConfig::from(self.clone()), f)
    }
}

#[cfg(feature = "cli")]
impl From<AmadeusArgs> for AmadeusConfig {
    fn from(args: AmadeusArgs) -> Self {
        let config = AmadeusConfig::new(args.amadeus_client_id, args.amadeus_client_secret)
            .hostname(args.amadeus_hostname)
            .timeout_secs(args.timeout_secs);
        match args.amadeus_base_url {
            Some(url) => config.base_url(url),
            None => config,
        }
    }
}
