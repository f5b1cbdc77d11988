use chrono::Duration;
use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct Config {
    pub web: Web,
    pub database: Database,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub accounts: Accounts,
    #[serde(default)]
    pub feed: Feed,
}

#[derive(Clone, Deserialize)]
pub struct Web {
    pub domain: String,
    pub port: u16,
    #[serde(default = "host_default")]
    pub host: String,
}

#[derive(Clone, Deserialize)]
pub struct Database {
    pub uri: String,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Every cookie this service owns starts with `<cookie_prefix>-`.
    pub cookie_prefix: String,
    pub lifetime_hours: i64,
    pub refresh_threshold_minutes: i64,
    pub secure_cookies: bool,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Accounts {
    pub allow_signups: bool,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Feed {
    /// Events buffered per user before a slow subscriber starts lagging.
    pub capacity: usize,
}

fn host_default() -> String {
    String::from("0.0.0.0")
}

impl Session {
    pub fn cookie_name(&self) -> String {
        format!("{}-session", self.cookie_prefix)
    }

    pub fn owns_cookie(&self, name: &str) -> bool {
        name.starts_with(&format!("{}-", self.cookie_prefix))
    }

    pub fn lifetime(&self) -> Duration {
        Duration::hours(self.lifetime_hours)
    }

    pub fn refresh_threshold(&self) -> Duration {
        Duration::minutes(self.refresh_threshold_minutes)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            cookie_prefix: String::from("sb"),
            lifetime_hours: 24 * 7,
            refresh_threshold_minutes: 60,
            secure_cookies: true,
        }
    }
}

impl Default for Accounts {
    fn default() -> Self {
        Self {
            allow_signups: true,
        }
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [web]
            domain = "localhost:8080"
            port = 8080

            [database]
            uri = "postgres://kagemarks@localhost/kagemarks"
            "#,
        )
        .unwrap();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.session.cookie_name(), "sb-session");
        assert_eq!(config.session.lifetime(), Duration::days(7));
        assert!(config.accounts.allow_signups);
        assert_eq!(config.feed.capacity, 32);
    }

    #[test]
    fn cookie_ownership() {
        let session = Session {
            cookie_prefix: String::from("km"),
            ..Session::default()
        };
        assert!(session.owns_cookie("km-session"));
        assert!(session.owns_cookie("km-refresh"));
        assert!(!session.owns_cookie("kmsession"));
        assert!(!session.owns_cookie("sb-session"));
    }
}
