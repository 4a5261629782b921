//! Runtime configuration, read from flags or the environment.

use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cms::CmsSettings;
use crate::contact::{ContactSettings, DEFAULT_RECIPIENT, DEFAULT_SENDER};
use crate::pages::SiteInfo;

#[derive(Debug, Clone, Parser)]
#[command(name = "studio-site", version, about = "Serve the studio website content and contact endpoint")]
pub struct SiteConfig {
    /// CMS project identifier.
    #[arg(long, env = "SANITY_PROJECT_ID", default_value = "")]
    pub project_id: String,

    /// CMS dataset name.
    #[arg(long, env = "SANITY_DATASET", default_value = "production")]
    pub dataset: String,

    #[arg(long, env = "SANITY_API_VERSION", default_value = "2024-01-01")]
    pub api_version: String,

    /// Query through the CDN-backed API host.
    #[arg(long, env = "SANITY_USE_CDN", default_value_t = true, action = ArgAction::Set)]
    pub use_cdn: bool,

    /// API key for the transactional email provider.
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    /// Address that receives contact form messages.
    #[arg(long, env = "CONTACT_EMAIL", default_value = DEFAULT_RECIPIENT)]
    pub contact_email: String,

    #[arg(long, env = "CONTACT_FROM", default_value = DEFAULT_SENDER)]
    pub contact_from: String,

    /// Public site URL used for canonical links.
    #[arg(long, env = "SITE_URL", default_value = "https://teamstaircase.com")]
    pub site_url: String,

    #[arg(long, env = "SITE_NAME", default_value = "Team Staircase")]
    pub site_name: String,

    /// Address the HTTP server listens on.
    #[arg(long, env = "BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// Timeout for outbound HTTP requests, in seconds.
    #[arg(long, env = "HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Render every prerenderable page before accepting requests.
    #[arg(long)]
    pub warm_cache: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl SiteConfig {
    pub fn cms_settings(&self) -> CmsSettings {
        if self.project_id.is_empty() {
            warn!("SANITY_PROJECT_ID is not set; content queries will return empty results");
        }
        CmsSettings {
            project_id: self.project_id.clone(),
            dataset: self.dataset.clone(),
            api_version: self.api_version.clone(),
            use_cdn: self.use_cdn,
        }
    }

    pub fn contact_settings(&self) -> ContactSettings {
        ContactSettings {
            recipient: self.contact_email.clone(),
            sender: self.contact_from.clone(),
            site_name: self.site_name.clone(),
        }
    }

    pub fn site_info(&self) -> SiteInfo {
        SiteInfo::new(&self.site_name, &self.site_url)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` if set, otherwise `debug` with `--verbose` and `info` without.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if self.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}
