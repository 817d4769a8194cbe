//! Server configuration

use chrono_tz::Tz;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Event pages may not be cached for less than this
pub const MIN_REVALIDATE_SECS: u64 = 20;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Absolute base URL used in check-in links (no trailing slash)
    pub base_url: String,
    /// Cache lifetime of public event pages
    pub event_revalidate_secs: u64,
    /// Time zone for week buckets, date filters and semester inference
    pub org_timezone: Tz,
    /// Daily rolling log files go here when set and the directory exists
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let org_timezone = match std::env::var("ORG_TIMEZONE") {
            Ok(name) if !name.trim().is_empty() => name
                .trim()
                .parse::<Tz>()
                .map_err(|e| format!("ORG_TIMEZONE: {e}"))?,
            _ => Tz::UTC,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            admin_username: Self::require_secret("ADMIN_USERNAME", &environment)?,
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            base_url: normalize_base_url(
                &std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
            ),
            event_revalidate_secs: clamp_revalidate(
                std::env::var("EVENT_REVALIDATE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            org_timezone,
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn clamp_revalidate(secs: u64) -> u64 {
    secs.max(MIN_REVALIDATE_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revalidate_has_a_floor() {
        assert_eq!(clamp_revalidate(0), 20);
        assert_eq!(clamp_revalidate(19), 20);
        assert_eq!(clamp_revalidate(300), 300);
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        assert_eq!(
            normalize_base_url(" https://club.example.edu/ "),
            "https://club.example.edu"
        );
        assert_eq!(normalize_base_url("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn secrets_fall_back_only_in_development() {
        let name = "ROSTER_TEST_SECRET_THAT_IS_NEVER_SET";
        assert!(Config::require_secret(name, "development").is_ok());
        assert!(Config::require_secret(name, "production").is_err());
    }
}
