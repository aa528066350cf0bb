use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};

/// A job a user applied to, copied from the listing at apply time.
#[derive(Debug, Clone, FromRow)]
pub struct Application {
    pub id: i64,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub job_url: Option<String>,
    pub user_id: i64,
}

/// Listing fields supplied by the caller when applying.
#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub job_url: Option<String>,
}

impl Application {
    pub async fn insert(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        new: &NewApplication,
    ) -> Result<Application, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (job_title, company, job_url, user_id)
            VALUES (?, ?, ?, ?)
            RETURNING id, job_title, company, job_url, user_id
            "#,
        )
        .bind(&new.job_title)
        .bind(&new.company)
        .bind(&new.job_url)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn list_by_user(db: &SqlitePool, user_id: i64) -> Result<Vec<Application>, sqlx::Error> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT id, job_title, company, job_url, user_id
              FROM applications
             WHERE user_id = ?
             ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }
}
