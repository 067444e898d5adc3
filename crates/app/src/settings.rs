//! Handles settings for the application. Configuration is written in
//! `settings.toml` and can be overridden by `FAMILY_LEDGER__*` environment
//! variables (e.g. `FAMILY_LEDGER__SERVER__PORT=8080`).
//!
//! See `settings.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use gateways::{MailConfig, PushConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Tracing level for the workspace crates.
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

fn default_token_ttl() -> i64 {
    60 * 24
}

const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub push: Option<PushConfig>,
    pub mail: Option<MailConfig>,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("FAMILY_LEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize::<Self>()?.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        let ttl = self.server.token_ttl_minutes;
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&ttl) {
            return Err(ConfigError::Message(format!(
                "server.token_ttl_minutes must be between 1 and {MAX_TOKEN_TTL_MINUTES}, got {ttl}"
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn optional_gateways_may_be_omitted() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            port = 3000
            database = "memory"
            jwt_secret = "s"
            "#,
        );
        assert!(matches!(settings.server.database, Database::Memory));
        assert_eq!(settings.server.token_ttl_minutes, 60 * 24);
        assert!(settings.push.is_none());
        assert!(settings.mail.is_none());
    }

    #[test]
    fn sqlite_path_and_gateways_are_read() {
        let settings = parse(
            r#"
            [app]
            level = "info"

            [server]
            bind = "0.0.0.0"
            port = 8080
            database = { sqlite = "ledger.db" }
            jwt_secret = "s"
            token_ttl_minutes = 15

            [push]
            endpoint = "https://fcm.googleapis.com/fcm/send"
            server_key = "abc"

            [mail]
            endpoint = "https://mail.example.com/send"
            api_key = "key"
            from = "noreply@example.com"
            "#,
        );
        assert!(matches!(settings.server.database, Database::Sqlite(ref p) if p == "ledger.db"));
        assert_eq!(settings.server.token_ttl_minutes, 15);
        assert_eq!(settings.push.map(|p| p.server_key), Some("abc".to_string()));
        assert_eq!(
            settings.mail.map(|m| m.from),
            Some("noreply@example.com".to_string())
        );
    }

    #[test]
    fn token_ttl_must_be_in_range() {
        let with_ttl = |ttl: i64| {
            parse(&format!(
                r#"
                [app]
                level = "info"

                [server]
                port = 3000
                database = "memory"
                jwt_secret = "s"
                token_ttl_minutes = {ttl}
                "#
            ))
            .validate()
        };
        assert!(with_ttl(0).is_err());
        assert!(with_ttl(-5).is_err());
        assert!(with_ttl(i64::MAX).is_err());
        assert_eq!(with_ttl(90).unwrap().server.token_ttl_minutes, 90);
    }
}
