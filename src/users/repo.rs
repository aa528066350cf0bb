use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};

use super::dto::Experience;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String, // Argon2 hash, never rendered
    pub role: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub about: Option<String>,
    pub resume: Option<String>,
    pub image: String,
    pub applied_count: i64,
    pub shortlisted_count: i64,
    pub interview_count: i64,
    pub rejected_count: i64,
}

/// Scalar profile columns overwritten by a profile edit.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub role: Option<String>,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub about: Option<String>,
}

/// Per-stage funnel counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCounts {
    pub applied: i64,
    pub shortlisted: i64,
    pub interview: i64,
    pub rejected: i64,
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, address, linkedin, about, \
     resume, image, applied_count, shortlisted_count, interview_count, rejected_count";

impl User {
    pub fn stage_counts(&self) -> StageCounts {
        StageCounts {
            applied: self.applied_count,
            shortlisted: self.shortlisted_count,
            interview: self.interview_count,
            rejected: self.rejected_count,
        }
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Insert a new account; a taken email surfaces as a unique violation.
    pub async fn create(
        tx: &mut Transaction<'_, Sqlite>,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut **tx)
        .await
    }

    pub async fn update_profile(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
               SET name = ?, role = ?, address = ?, linkedin = ?, about = ?
             WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.role)
        .bind(&update.address)
        .bind(&update.linkedin)
        .bind(&update.about)
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn set_image(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
        path: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET image = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn set_resume(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
        path: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET resume = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Bump the applied counter in place so concurrent applies never lose an update.
    pub async fn increment_applied(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET applied_count = applied_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Overwrite all four funnel counters. No page drives this; review tooling does.
    pub async fn set_stage_counts(
        db: &SqlitePool,
        id: i64,
        counts: StageCounts,
    ) -> Result<bool, sqlx::Error> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET applied_count = ?, shortlisted_count = ?, interview_count = ?, rejected_count = ?
             WHERE id = ?
            "#,
        )
        .bind(counts.applied)
        .bind(counts.shortlisted)
        .bind(counts.interview)
        .bind(counts.rejected)
        .bind(id)
        .execute(db)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}

#[derive(Debug, FromRow)]
struct ExperienceRow {
    title: String,
    company: String,
    description: String,
}

/// Ordered work history of a user.
pub async fn list_experiences(db: &SqlitePool, user_id: i64) -> Result<Vec<Experience>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExperienceRow>(
        r#"
        SELECT title, company, description
          FROM experiences
         WHERE user_id = ?
         ORDER BY position ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Experience {
            title: r.title,
            company: r.company,
            description: r.description,
        })
        .collect())
}

/// Replace the whole work history of a user with `entries`, keeping their order.
pub async fn replace_experiences(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    entries: &[Experience],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM experiences WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

    for (position, entry) in entries.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO experiences (user_id, position, title, company, description)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(position as i64)
        .bind(&entry.title)
        .bind(&entry.company)
        .bind(&entry.description)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
