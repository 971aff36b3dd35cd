use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Local upload directory and the per-file size ceiling
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_file_size: usize,
}

/// Signed session cookie settings
#[derive(Clone)]
pub struct SessionConfig {
    /// Signing secret, at least 64 bytes. `None` means a key is generated at startup.
    pub secret: Option<String>,
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any variable source
    pub fn from_lookup<F>(var: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            app: AppConfig::from_lookup(&var)?,
            database: DatabaseConfig::from_lookup(&var)?,
            upload: UploadConfig::from_lookup(&var)?,
            session: SessionConfig::from_lookup(&var)?,
        })
    }
}

/// Parse `raw`, falling back to `default` when the variable is unset
fn parse_or<T: FromStr>(name: &str, raw: Option<String>, default: T, expected: &str) -> Result<T, String> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be {}", name, expected)),
        None => Ok(default),
    }
}

impl AppConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 10000;

    fn from_lookup<F>(var: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = var("HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let port = parse_or("PORT", var("PORT"), Self::DEFAULT_PORT, "a valid port number")?;

        Ok(Self { host, port })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_URL: &'static str = "sqlite://medivault.db";
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

    fn from_lookup<F>(var: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = var("DATABASE_URL").unwrap_or_else(|| Self::DEFAULT_URL.to_string());

        let max_connections = parse_or(
            "DB_MAX_CONNECTIONS",
            var("DB_MAX_CONNECTIONS"),
            Self::DEFAULT_MAX_CONNECTIONS,
            "a valid number",
        )?;
        let min_connections = parse_or(
            "DB_MIN_CONNECTIONS",
            var("DB_MIN_CONNECTIONS"),
            Self::DEFAULT_MIN_CONNECTIONS,
            "a valid number",
        )?;
        let acquire_timeout_secs = parse_or(
            "DB_ACQUIRE_TIMEOUT_SECS",
            var("DB_ACQUIRE_TIMEOUT_SECS"),
            Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            "a valid number",
        )?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
        })
    }
}

impl UploadConfig {
    const DEFAULT_DIR: &'static str = "uploads";
    const DEFAULT_MAX_FILE_SIZE: usize = 16 * 1024 * 1024; // 16MB

    fn from_lookup<F>(var: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dir = var("UPLOAD_DIR").unwrap_or_else(|| Self::DEFAULT_DIR.to_string());
        let max_file_size = parse_or(
            "MAX_UPLOAD_SIZE",
            var("MAX_UPLOAD_SIZE"),
            Self::DEFAULT_MAX_FILE_SIZE,
            "a valid number",
        )?;

        Ok(Self {
            dir: PathBuf::from(dir),
            max_file_size,
        })
    }
}

impl SessionConfig {
    pub const MIN_SECRET_LEN: usize = 64;

    fn from_lookup<F>(var: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = var("SESSION_SECRET").filter(|s| !s.is_empty());

        if let Some(ref s) = secret {
            if s.len() < Self::MIN_SECRET_LEN {
                return Err(format!(
                    "SESSION_SECRET must be at least {} bytes",
                    Self::MIN_SECRET_LEN
                ));
            }
        }

        let cookie_secure = parse_or(
            "SESSION_COOKIE_SECURE",
            var("SESSION_COOKIE_SECURE"),
            false,
            "true or false",
        )?;

        Ok(Self {
            secret,
            cookie_secure,
        })
    }
}
