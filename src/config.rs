use std::env;
use std::path::PathBuf;

/// Upper bound for `TOKEN_TTL_HOURS`: one year.
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct Config {
    /// PostgreSQL URL. When unset the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub token_ttl_hours: i64,
    pub cors_origin: String,
    pub seed_file: PathBuf,
    pub seed_on_startup: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5263".to_string())
                .parse()
                .unwrap_or(5263),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_issuer: env::var("JWT_ISSUER").ok().filter(|s| !s.is_empty()),
            jwt_audience: env::var("JWT_AUDIENCE").ok().filter(|s| !s.is_empty()),
            token_ttl_hours: parse_ttl_hours(env::var("TOKEN_TTL_HOURS").ok().as_deref()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            seed_file: env::var("SEED_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data.json")),
            seed_on_startup: env::var("SEED_ON_STARTUP")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
        })
    }

    /// Configuration for tests and local experiments: memory store, fixed secret.
    pub fn for_tests() -> Self {
        Config {
            database_url: None,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            jwt_secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            jwt_issuer: Some("rental-shop".to_string()),
            jwt_audience: Some("rental-shop-web".to_string()),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
            cors_origin: "*".to_string(),
            seed_file: PathBuf::from("data.json"),
            seed_on_startup: false,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Unparseable values fall back to the default; the rest are clamped to 1 hour..1 year.
fn parse_ttl_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .map(|hours| hours.clamp(1, MAX_TOKEN_TTL_HOURS))
        .unwrap_or(DEFAULT_TOKEN_TTL_HOURS)
}
