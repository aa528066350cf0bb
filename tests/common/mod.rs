//! Shared harness: the full router over an in-memory SQLite store, a fake
//! job board and a temporary upload root.
#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use job_portal::{
    config::{AppConfig, JobsApiConfig, SessionConfig},
    db,
    jobs::client::{Job, JobSource},
    storage::{AssetKind, LocalStorage, StorageClient},
    AppState,
};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-battery-staple";

pub struct FakeJobs {
    pub jobs: Vec<Job>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeJobs {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobSource for FakeJobs {
    async fn fetch_all(&self) -> anyhow::Result<Vec<Job>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("job board timed out");
        }
        Ok(self.jobs.clone())
    }
}

/// Local storage that refuses to store resumes.
pub struct ResumeRejectingStorage(pub LocalStorage);

#[async_trait]
impl StorageClient for ResumeRejectingStorage {
    async fn save(
        &self,
        kind: AssetKind,
        user_id: i64,
        file_name: &str,
        body: Bytes,
    ) -> anyhow::Result<String> {
        if kind == AssetKind::Resume {
            anyhow::bail!("resume bucket unavailable");
        }
        self.0.save(kind, user_id, file_name, body).await
    }

    async fn delete(&self, url: &str) -> anyhow::Result<()> {
        self.0.delete(url).await
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub jobs: Arc<FakeJobs>,
    pub uploads: TempDir,
}

pub fn job(title: &str) -> Job {
    Job {
        title: title.to_string(),
        company_name: "Acme".to_string(),
        url: format!("https://jobs.example/{}", title.replace(' ', "-")),
        ..Job::default()
    }
}

pub async fn spawn_app(jobs: Vec<Job>) -> TestApp {
    spawn_app_with(jobs, false).await
}

pub async fn spawn_app_with(jobs: Vec<Job>, fail: bool) -> TestApp {
    spawn(jobs, fail, |root| {
        Arc::new(LocalStorage::new(root)) as Arc<dyn StorageClient>
    })
    .await
}

pub async fn spawn_app_rejecting_resumes() -> TestApp {
    spawn(vec![], false, |root| {
        Arc::new(ResumeRejectingStorage(LocalStorage::new(root))) as Arc<dyn StorageClient>
    })
    .await
}

async fn spawn(
    jobs: Vec<Job>,
    fail: bool,
    storage: impl FnOnce(&std::path::Path) -> Arc<dyn StorageClient>,
) -> TestApp {
    // One connection: every connection to `sqlite::memory:` is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    db::migrate(&pool).await.expect("migrations");

    let uploads = tempfile::tempdir().expect("upload dir");
    let config = Arc::new(AppConfig {
        database_url: "sqlite::memory:".into(),
        session: SessionConfig {
            secret: "test-secret".into(),
            issuer: "test".into(),
            audience: "test".into(),
            ttl_minutes: 5,
        },
        jobs_api: JobsApiConfig {
            url: "http://jobs.invalid".into(),
            timeout_secs: 1,
        },
        upload_root: uploads.path().to_path_buf(),
    });
    let fake = Arc::new(FakeJobs {
        jobs,
        fail,
        calls: AtomicUsize::new(0),
    });
    let storage = storage(uploads.path());
    let state = AppState::from_parts(pool, config, storage, fake.clone() as Arc<dyn JobSource>);

    TestApp {
        router: job_portal::build_app(state.clone()),
        state,
        jobs: fake,
        uploads,
    }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("router call")
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn signup(&self, name: &str, email: &str) -> Response<Body> {
        let body = format!(
            "name={}&email={}&password={PASSWORD}",
            name.replace(' ', "+"),
            email.replace('@', "%40")
        );
        self.post_form("/signup", &body).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response<Body> {
        let body = format!("email={}&password={password}", email.replace('@', "%40"));
        self.post_form("/login", &body).await
    }

    /// Register an account and log it in; returns `(user_id, cookie header)`.
    pub async fn registered_user(&self, email: &str) -> (i64, String) {
        let res = self.signup("Test User", email).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let res = self.login(email, PASSWORD).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let cookie = session_cookie(&res).expect("session cookie");
        let id = location(&res)
            .trim_start_matches("/dashboard/")
            .parse()
            .expect("dashboard id");
        (id, cookie)
    }

    pub async fn set_role(&self, user_id: i64, role: &str) {
        sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role)
            .bind(user_id)
            .execute(&self.state.db)
            .await
            .unwrap();
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(&self.state.db)
            .await
            .unwrap()
    }
}

pub fn location(res: &Response<Body>) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `name=value` part of the session `Set-Cookie` header, ready for a `Cookie` header.
pub fn session_cookie(res: &Response<Body>) -> Option<String> {
    res.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_string(res: Response<Body>) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Minimal `multipart/form-data` encoder for the profile form.
pub struct MultipartBody {
    boundary: &'static str,
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: "portal-test-boundary",
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str, cookie: &str) -> Request<Body> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .header(header::COOKIE, cookie)
            .body(Body::from(self.buf))
            .unwrap()
    }
}
