/// Configuration management for the API server
///
/// Configuration is read from environment variables (a `.env` file is
/// loaded first when present).
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `APP_STAGE`: `poc`, `dev` or `production` (default: poc)
/// - `JWT_SECRET`: Session signing secret, at least 32 characters
///   (required outside `poc`)
/// - `LOGIN_MAX_FAILURES`: Failures that lock an account (default: 5)
/// - `LOGIN_LOCKOUT_MINUTES`: Failure counting window (default: 30)
///
/// # Example
///
/// ```no_run
/// use siteadmin_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```
use serde::{Deserialize, Serialize};
use siteadmin_shared::auth::lockout::{DEFAULT_MAX_FAILURES, DEFAULT_WINDOW_MINUTES};
use siteadmin_shared::services::auth::AuthOptions;
use std::{env, fmt, str::FromStr};

/// Secret used in `poc` when `JWT_SECRET` is not set
const DEV_JWT_SECRET: &str = "siteadmin-development-secret-change-me";

/// Deployment stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Mock logins accepted without a password check
    #[default]
    Poc,
    Dev,
    Production,
}

impl FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "poc" => Ok(Stage::Poc),
            "dev" | "development" => Ok(Stage::Dev),
            "production" | "prod" => Ok(Stage::Production),
            other => anyhow::bail!("Unknown APP_STAGE: {}", other),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Poc => "poc",
            Stage::Dev => "dev",
            Stage::Production => "production",
        };
        f.write_str(name)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Session and login configuration
    pub auth: AuthConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// Deployment stage
    pub stage: Stage,
}

/// Session and login configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Failed logins within the window that lock an account
    pub max_failures: usize,

    /// Length of the failure counting window
    pub lockout_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                stage: Stage::Poc,
            },
            auth: AuthConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                max_failures: DEFAULT_MAX_FAILURES,
                lockout_minutes: DEFAULT_WINDOW_MINUTES,
            },
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A numeric variable cannot be parsed
    /// - `APP_STAGE` is not a known stage
    /// - `JWT_SECRET` is missing or shorter than 32 characters outside `poc`
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let stage = env::var("APP_STAGE")
            .map(|s| s.parse::<Stage>())
            .unwrap_or(Ok(Stage::Poc))?;

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if stage == Stage::Poc => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => anyhow::bail!("JWT_SECRET environment variable is required"),
        };
        if stage != Stage::Poc && jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let max_failures = env::var("LOGIN_MAX_FAILURES")
            .unwrap_or_else(|_| DEFAULT_MAX_FAILURES.to_string())
            .parse::<usize>()?;
        let lockout_minutes = env::var("LOGIN_LOCKOUT_MINUTES")
            .unwrap_or_else(|_| DEFAULT_WINDOW_MINUTES.to_string())
            .parse::<i64>()?;
        if max_failures == 0 || lockout_minutes <= 0 {
            anyhow::bail!("LOGIN_MAX_FAILURES and LOGIN_LOCKOUT_MINUTES must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                stage,
            },
            auth: AuthConfig {
                jwt_secret,
                max_failures,
                lockout_minutes,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Production turns on `Secure` cookies and HSTS
    pub fn is_production(&self) -> bool {
        self.api.stage == Stage::Production
    }

    /// Options for the auth service; `poc` enables the login bypass
    pub fn auth_options(&self) -> AuthOptions {
        AuthOptions {
            jwt_secret: self.auth.jwt_secret.clone(),
            bypass: self.api.stage == Stage::Poc,
            max_failures: self.auth.max_failures,
            lockout_window: chrono::Duration::minutes(self.auth.lockout_minutes),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let mut config = Config::default();
        config.api.host = "127.0.0.1".to_string();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_default_is_poc_with_bypass() {
        let config = Config::default();
        assert_eq!(config.api.stage, Stage::Poc);
        assert!(!config.is_production());

        let options = config.auth_options();
        assert!(options.bypass);
        assert_eq!(options.max_failures, 5);
        assert_eq!(options.lockout_window, chrono::Duration::minutes(30));
    }

    #[test]
    fn test_stage_parsing() {
        assert_eq!("POC".parse::<Stage>().unwrap(), Stage::Poc);
        assert_eq!("dev".parse::<Stage>().unwrap(), Stage::Dev);
        assert_eq!("production".parse::<Stage>().unwrap(), Stage::Production);
        assert!("staging".parse::<Stage>().is_err());
        assert_eq!(Stage::Production.to_string(), "production");
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://a.example, https://b.example,,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }

    #[test]
    fn test_secret_is_not_serialized() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert!(json["auth"].get("jwt_secret").is_none());
        assert_eq!(json["api"]["stage"], "poc");
    }
}
