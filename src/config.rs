use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const DEFAULT_QUERY: &str = "Find PhD research job openings in Europe that require an MSc in Animal Science, Health, Production, or Agricultural Science. Prioritize opportunities that match my skills in statistical analysis (Excel, R, SQL) and laboratory expertise (PCR, biochemical analysis). Extract detailed information, including job description, requirements, application links, location, and contact details of the poster.";

const DEFAULT_CONFIG_FILE: &str = "job_digest";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub query: String,
    pub site_filters: Vec<String>,
    pub search_url: String,
    /// Seconds-first cron expression for recurring runs.
    pub schedule: String,
    pub user_agents: Vec<String>,
    pub request_timeout_seconds: u64,
    /// Random pause between listing page visits, `[min, max]` in milliseconds.
    pub detail_delay_ms: [u64; 2],
    pub send_empty_digest: bool,
    /// Enables cross-run deduplication when set.
    pub seen_db_path: Option<String>,
    pub email: EmailConfig,
    #[serde(skip)]
    pub smtp: SmtpCredentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub subject: String,
    pub heading: String,
    /// Falls back to the SMTP account when unset.
    pub recipient: Option<String>,
}

/// Account used to authenticate with the mail provider, taken from
/// `SMTP_USER` / `SMTP_PASS`.
#[derive(Clone, Default)]
pub struct SmtpCredentials {
    pub user: String,
    pub pass: String,
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query: DEFAULT_QUERY.to_string(),
            site_filters: [
                "linkedin.com",
                "indeed.com",
                "researchgate.net",
                "glassdoor.com",
                "academia.edu",
                "x.com",
                "google.com",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            search_url: "https://www.google.com/search".to_string(),
            schedule: "0 */20 * * * *".to_string(),
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.5735.134 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.5672.126 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.5615.121 Safari/537.36".to_string(),
            ],
            request_timeout_seconds: 30,
            detail_delay_ms: [500, 1500],
            send_empty_digest: true,
            seen_db_path: None,
            email: EmailConfig::default(),
            smtp: SmtpCredentials::default(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            subject: "PhD Research Openings in Europe".to_string(),
            heading: "📢 PhD Research Openings in Europe".to_string(),
            recipient: None,
        }
    }
}

impl Config {
    /// Layers defaults, an optional `job_digest.toml` (or `$JOB_DIGEST_CONFIG`)
    /// and `JOB_DIGEST_*` variables, then reads the SMTP account.
    pub fn load() -> Result<Self> {
        let file = std::env::var("JOB_DIGEST_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config: Config = config::Config::builder()
            .add_source(config::File::with_name(&file).required(false))
            .add_source(
                config::Environment::with_prefix("JOB_DIGEST")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        // Not validated: a missing account shows up as a send failure
        config.smtp = SmtpCredentials {
            user: std::env::var("SMTP_USER").unwrap_or_default(),
            pass: std::env::var("SMTP_PASS").unwrap_or_default(),
        };

        Ok(config)
    }

    /// The full search engine query, with the `site:` filters appended.
    pub fn search_query(&self) -> String {
        if self.site_filters.is_empty() {
            return self.query.clone();
        }

        let sites = self
            .site_filters
            .iter()
            .map(|site| format!("site:{}", site))
            .collect::<Vec<_>>()
            .join(" OR ");

        format!("{} {}", self.query, sites)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn recipient(&self) -> &str {
        self.email.recipient.as_deref().unwrap_or(&self.smtp.user)
    }
}
