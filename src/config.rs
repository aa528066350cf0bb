use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct JobsApiConfig {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub jobs_api: JobsApiConfig,
    pub upload_root: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://app.db?mode=rwc".into());
        let session = SessionConfig {
            secret: std::env::var("SECRET_KEY").unwrap_or_else(|_| "dev-secret".into()),
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "job-portal".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "job-portal-users".into()),
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let jobs_api = JobsApiConfig {
            url: std::env::var("JOBS_API_URL")
                .unwrap_or_else(|_| "https://remotive.com/api/remote-jobs".into()),
            timeout_secs: std::env::var("JOBS_API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        let upload_root = std::env::var("UPLOAD_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static/uploads"));

        Ok(Self {
            database_url,
            session,
            jobs_api,
            upload_root,
        })
    }
}
