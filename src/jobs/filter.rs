use super::client::{Job, JobSource};

/// Most listings shown on a dashboard.
pub const MAX_LISTINGS: usize = 30;

/// Lowercased whitespace-separated tokens of a role.
pub fn role_keywords(role: &str) -> Vec<String> {
    role.split_whitespace().map(str::to_lowercase).collect()
}

/// Keep postings whose title contains any token of `role`, case-insensitively,
/// in source order and capped at [`MAX_LISTINGS`].
pub fn filter_by_role(jobs: Vec<Job>, role: &str) -> Vec<Job> {
    let keywords = role_keywords(role);
    if keywords.is_empty() {
        return Vec::new();
    }
    jobs.into_iter()
        .filter(|job| {
            let title = job.title.to_lowercase();
            keywords.iter().any(|k| title.contains(k.as_str()))
        })
        .take(MAX_LISTINGS)
        .collect()
}

/// Listings for a user's stored role. A blank role never reaches the job board.
pub async fn listings_for_role(
    source: &dyn JobSource,
    role: Option<&str>,
) -> anyhow::Result<Vec<Job>> {
    let role = role.unwrap_or_default();
    if role_keywords(role).is_empty() {
        return Ok(Vec::new());
    }
    let jobs = source.fetch_all().await?;
    Ok(filter_by_role(jobs, role))
}
