//! # Client configuration — `technotes.toml`
//!
//! ```toml
//! [api]
//! base_url = "https://technotes-api.onrender.com"
//!
//! [auth]
//! max_renewals = 1            # refresh-and-replay attempts per call
//!
//! [polling]
//! notes_interval_secs = 15    # 0 disables polling
//! users_interval_secs = 60
//! refetch_on_focus = true
//! ```
//!
//! Every section defaults, so a missing or empty file is the shipped
//! configuration. Native builds layer the file and `TECHNOTES_*` environment
//! variables on top of the defaults with [`ClientConfig::load`]
//! (`TECHNOTES_API__BASE_URL=http://localhost:3500`).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use store::SubscriptionOptions;

pub const DEFAULT_BASE_URL: &str = "https://technotes-api.onrender.com";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_max_renewals")]
    pub max_renewals: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_notes_interval")]
    pub notes_interval_secs: u64,
    #[serde(default = "default_users_interval")]
    pub users_interval_secs: u64,
    #[serde(default = "default_refetch_on_focus")]
    pub refetch_on_focus: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_renewals() -> u32 {
    1
}

fn default_notes_interval() -> u64 {
    15
}

fn default_users_interval() -> u64 {
    60
}

fn default_refetch_on_focus() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_renewals: default_max_renewals(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            notes_interval_secs: default_notes_interval(),
            users_interval_secs: default_users_interval(),
            refetch_on_focus: default_refetch_on_focus(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api.base_url = base_url.into();
        self
    }

    pub fn filename() -> &'static str {
        "technotes.toml"
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Options for the notes list views.
    pub fn notes_options(&self) -> SubscriptionOptions {
        self.polling.options(self.polling.notes_interval_secs)
    }

    /// Options for the users list views.
    pub fn users_options(&self) -> SubscriptionOptions {
        self.polling.options(self.polling.users_interval_secs)
    }

    /// Defaults, then `technotes.toml` in the working directory, then
    /// `TECHNOTES_*` environment variables.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File, FileFormat};

        let defaults = Self::default();
        Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("auth.max_renewals", i64::from(defaults.auth.max_renewals))?
            .set_default("polling.notes_interval_secs", defaults.polling.notes_interval_secs as i64)?
            .set_default("polling.users_interval_secs", defaults.polling.users_interval_secs as i64)?
            .set_default("polling.refetch_on_focus", defaults.polling.refetch_on_focus)?
            .add_source(
                File::with_name(Self::filename())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("TECHNOTES")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl PollingConfig {
    fn options(&self, interval_secs: u64) -> SubscriptionOptions {
        let mut options = SubscriptionOptions::default().refetch_on_mount();
        if interval_secs > 0 {
            options = options.polling(Duration::from_secs(interval_secs));
        }
        if self.refetch_on_focus {
            options = options.refetch_on_focus();
        }
        options
    }
}
