use std::env;

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub app_env: String,
    pub public_url: String,
    pub smtp: SmtpConfig,
}

/// Outgoing mail settings. Delivery is disabled unless a host and sender are set.
#[derive(Debug, Clone, Default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: Option<String>,
    pub from_name: String,
    pub tls: bool,
}

impl SmtpConfig {
    pub fn is_configured(&self) -> bool {
        self.host.is_some() && self.from_address.is_some()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = non_empty("DATABASE_URL")
            .ok_or_else(|| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = non_empty("JWT_SECRET")
            .ok_or_else(|| "JWT_SECRET must be set".to_string())?;

        let db_max_connections = match non_empty("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("DB_MAX_CONNECTIONS is not a number: {}", raw))?,
            None => 10,
        };

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let app_env = non_empty("APP_ENV").unwrap_or_else(|| "development".to_string());
        let public_url = non_empty("PUBLIC_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let smtp_port = match non_empty("SMTP_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("SMTP_PORT is not a valid port: {}", raw))?,
            None => 587,
        };

        let smtp = SmtpConfig {
            host: non_empty("SMTP_HOST"),
            port: smtp_port,
            username: non_empty("SMTP_USERNAME"),
            password: non_empty("SMTP_PASSWORD"),
            from_address: non_empty("SMTP_FROM"),
            from_name: non_empty("SMTP_FROM_NAME").unwrap_or_else(|| "Alumni Network".to_string()),
            tls: non_empty("SMTP_TLS")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
        };

        Ok(Self {
            database_url,
            db_max_connections,
            jwt_secret,
            bind_addr,
            app_env,
            public_url,
            smtp,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}
