use askama::Template;
use axum::response::Html;

use crate::{
    applications::{funnel::Funnel, repo::Application},
    error::AppError,
    jobs::client::Job,
    users::{dto::Experience, repo::User},
};

#[derive(Template)]
#[template(path = "main.html")]
pub struct LandingPage {}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupPage<'a> {
    pub error: &'a str,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage<'a> {
    pub error: &'a str,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage<'a> {
    pub user: &'a User,
    pub jobs: &'a [Job],
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage<'a> {
    pub user: &'a User,
    pub experiences: &'a [Experience],
}

#[derive(Template)]
#[template(path = "edit_profile.html")]
pub struct EditProfilePage<'a> {
    pub user: &'a User,
    pub experiences: &'a [Experience],
}

#[derive(Template)]
#[template(path = "applications.html")]
pub struct ApplicationsPage<'a> {
    pub user: &'a User,
    pub apps: &'a [Application],
    pub funnel: Funnel,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub status: u16,
    pub message: &'a str,
}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

// Display helpers called from templates; unset columns render as empty text.
impl User {
    pub fn role_text(&self) -> &str {
        self.role.as_deref().unwrap_or("")
    }

    pub fn address_text(&self) -> &str {
        self.address.as_deref().unwrap_or("")
    }

    pub fn linkedin_text(&self) -> &str {
        self.linkedin.as_deref().unwrap_or("")
    }

    pub fn about_text(&self) -> &str {
        self.about.as_deref().unwrap_or("")
    }

    pub fn resume_path(&self) -> &str {
        self.resume.as_deref().unwrap_or("")
    }
}

impl Application {
    pub fn title_text(&self) -> &str {
        self.job_title.as_deref().unwrap_or("")
    }

    pub fn company_text(&self) -> &str {
        self.company.as_deref().unwrap_or("")
    }

    pub fn url_text(&self) -> &str {
        self.job_url.as_deref().unwrap_or("")
    }
}
