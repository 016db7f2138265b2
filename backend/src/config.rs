//! Server configuration loaded from environment variables.

/// Runtime configuration for the backend.
///
/// All fields except `JWT_SECRET` have defaults suitable for local
/// development; in production everything is overridden via the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite database URL (default: `sqlite:little_hero.db`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HMAC secret used to verify bearer tokens issued by the auth provider.
    pub jwt_secret: String,
    /// OpenAI API key; story generation fails cleanly when absent.
    pub openai_api_key: Option<String>,
    /// Chat model used for story generation (default: `gpt-4o`).
    pub openai_model: String,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var          | Required | Default                 |
    /// |------------------|----------|-------------------------|
    /// | `HOST`           | no       | `127.0.0.1`             |
    /// | `PORT`           | no       | `3000`                  |
    /// | `DATABASE_URL`   | no       | `sqlite:little_hero.db` |
    /// | `CORS_ORIGINS`   | no       | `http://localhost:8080` |
    /// | `JWT_SECRET`     | **yes**  | --                      |
    /// | `OPENAI_API_KEY` | no       | unset                   |
    /// | `OPENAI_MODEL`   | no       | `gpt-4o`                |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or if `PORT` is not a
    /// valid port number.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:little_hero.db".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let jwt_secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!jwt_secret.is_empty(), "JWT_SECRET must not be empty");

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let openai_model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".into());

        Self {
            host,
            port,
            database_url,
            cors_origins,
            jwt_secret,
            openai_api_key,
            openai_model,
        }
    }
}
