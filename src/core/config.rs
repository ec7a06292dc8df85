use std::env;

/// Google OAuth2 token endpoint, shared by all three credential shapes.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub google_auth: GoogleAuthConfig,
    pub drive: DriveConfig,
    pub sheets: SheetsConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Which credential shape produces Google access tokens.
/// Selected once at startup; business logic never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    ServiceAccount,
    RefreshToken,
    OauthSession,
}

#[derive(Debug, Clone)]
pub struct GoogleAuthConfig {
    pub mode: AuthMode,
    pub token_url: String,
    pub service_account: Option<ServiceAccountConfig>,
    pub refresh_token: Option<RefreshTokenConfig>,
    pub oauth: Option<OAuthClientConfig>,
}

/// Static service credentials (signed JWT grant).
#[derive(Debug, Clone)]
pub struct ServiceAccountConfig {
    pub client_email: String,
    /// PEM-encoded RSA private key. `\n` escapes from the environment
    /// are expanded to real newlines.
    pub private_key: String,
}

/// Long-lived refresh token obtained once out of band.
#[derive(Debug, Clone)]
pub struct RefreshTokenConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

/// Session-scoped OAuth flow (per-operator tokens in a session store).
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Deployment base URL, used to build the callback redirect URI.
    pub base_url: String,
}

impl OAuthClientConfig {
    pub fn redirect_uri(&self) -> String {
        format!("{}/api/auth/callback", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct DriveConfig {
    /// Root container under which per-substation folders live.
    pub root_folder_id: String,
}

#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// Timezone for the server-side row timestamp.
    pub timezone: chrono_tz::Tz,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            google_auth: GoogleAuthConfig::from_env()?,
            drive: DriveConfig::from_env()?,
            sheets: SheetsConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 25 * 1024 * 1024; // 25MB, scanned PDFs

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl GoogleAuthConfig {
    pub fn from_env() -> Result<Self, String> {
        let mode = match env::var("GOOGLE_AUTH_MODE")
            .unwrap_or_else(|_| "service_account".to_string())
            .as_str()
        {
            "service_account" => AuthMode::ServiceAccount,
            "refresh_token" => AuthMode::RefreshToken,
            "oauth_session" => AuthMode::OauthSession,
            other => {
                return Err(format!(
                    "GOOGLE_AUTH_MODE must be one of service_account, refresh_token, oauth_session (got '{}')",
                    other
                ))
            }
        };

        let service_account = match mode {
            AuthMode::ServiceAccount => Some(ServiceAccountConfig::from_env()?),
            _ => None,
        };

        let refresh_token = match mode {
            AuthMode::RefreshToken => Some(RefreshTokenConfig::from_env()?),
            _ => None,
        };

        // The OAuth client is also loaded opportunistically in the other
        // modes so the /api/auth endpoints can mint refresh tokens for
        // manual configuration.
        let oauth = match mode {
            AuthMode::OauthSession => Some(OAuthClientConfig::from_env()?),
            _ => OAuthClientConfig::from_env().ok(),
        };

        Ok(Self {
            mode,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            service_account,
            refresh_token,
            oauth,
        })
    }
}

impl ServiceAccountConfig {
    pub fn from_env() -> Result<Self, String> {
        let client_email = env::var("GOOGLE_CLIENT_EMAIL")
            .map_err(|_| "GOOGLE_CLIENT_EMAIL environment variable is required".to_string())?;

        let private_key = env::var("GOOGLE_PRIVATE_KEY")
            .map_err(|_| "GOOGLE_PRIVATE_KEY environment variable is required".to_string())?
            .replace("\\n", "\n");

        Ok(Self {
            client_email,
            private_key,
        })
    }
}

impl RefreshTokenConfig {
    pub fn from_env() -> Result<Self, String> {
        let client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| "GOOGLE_CLIENT_ID environment variable is required".to_string())?;

        let client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .map_err(|_| "GOOGLE_CLIENT_SECRET environment variable is required".to_string())?;

        let refresh_token = env::var("GOOGLE_REFRESH_TOKEN")
            .map_err(|_| "GOOGLE_REFRESH_TOKEN environment variable is required".to_string())?;

        Ok(Self {
            client_id,
            client_secret,
            refresh_token,
        })
    }
}

impl OAuthClientConfig {
    pub fn from_env() -> Result<Self, String> {
        let client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| "GOOGLE_CLIENT_ID environment variable is required".to_string())?;

        let client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .map_err(|_| "GOOGLE_CLIENT_SECRET environment variable is required".to_string())?;

        let base_url = env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            client_id,
            client_secret,
            base_url,
        })
    }
}

impl DriveConfig {
    pub fn from_env() -> Result<Self, String> {
        let root_folder_id = env::var("GOOGLE_DRIVE_FOLDER_ID")
            .map_err(|_| "GOOGLE_DRIVE_FOLDER_ID environment variable is required".to_string())?;

        Ok(Self { root_folder_id })
    }
}

impl SheetsConfig {
    const DEFAULT_TIMEZONE: &'static str = "Asia/Bangkok";

    pub fn from_env() -> Result<Self, String> {
        let spreadsheet_id = env::var("GOOGLE_SHEET_ID")
            .map_err(|_| "GOOGLE_SHEET_ID environment variable is required".to_string())?;

        let timezone = env::var("SHEET_TIMEZONE")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEZONE.to_string())
            .parse::<chrono_tz::Tz>()
            .map_err(|e| format!("SHEET_TIMEZONE is not a valid IANA timezone: {}", e))?;

        Ok(Self {
            spreadsheet_id,
            timezone,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Substation Repair API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Equipment-repair report recording for electrical substations".to_string()
        });

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
