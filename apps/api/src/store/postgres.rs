use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::simulation::{SimulationRow, SimulationStatus};
use crate::models::user::{NewUser, User};
use crate::store::{SimulationStore, Store, StoreError, StoreResult, UserStore};

const USER_COLUMNS: &str = "id, name, email, password_hash, is_premium, created_at, updated_at";
const SIMULATION_COLUMNS: &str =
    "id, user_id, wizard_data, report_data, status, revision, created_at, updated_at";

/// Postgres-backed store. Every operation is a single statement, so each is
/// atomic without an explicit transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

fn map_unique_violation(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        info!("Created user {}", user.id);
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("User"))
    }
}

#[async_trait]
impl SimulationStore for PgStore {
    async fn upsert_simulation(
        &self,
        user_id: Uuid,
        wizard_data: &Value,
    ) -> StoreResult<SimulationRow> {
        // report_data survives a re-save; status drops back to draft so the
        // stale report is visible as such.
        let row = sqlx::query_as::<_, SimulationRow>(&format!(
            r#"
            INSERT INTO simulations (id, user_id, wizard_data, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
               SET wizard_data = EXCLUDED.wizard_data,
                   status = EXCLUDED.status,
                   revision = simulations.revision + 1,
                   updated_at = NOW()
            RETURNING {SIMULATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(wizard_data)
        .bind(SimulationStatus::Draft.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Saved wizard data for user {user_id} (simulation {}, revision {})",
            row.id, row.revision
        );
        Ok(row)
    }

    async fn current_simulation(&self, user_id: Uuid) -> StoreResult<SimulationRow> {
        sqlx::query_as::<_, SimulationRow>(&format!(
            "SELECT {SIMULATION_COLUMNS} FROM simulations WHERE user_id = $1 \
             ORDER BY updated_at DESC, revision DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Simulation"))
    }

    async fn attach_report(
        &self,
        user_id: Uuid,
        revision: i64,
        report: &Value,
    ) -> StoreResult<SimulationRow> {
        let updated = sqlx::query_as::<_, SimulationRow>(&format!(
            r#"
            UPDATE simulations
               SET report_data = $3, status = $4, updated_at = NOW()
             WHERE user_id = $1 AND revision = $2
            RETURNING {SIMULATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(revision)
        .bind(report)
        .bind(SimulationStatus::Completed.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = updated else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM simulations WHERE user_id = $1)")
                    .bind(user_id)
                    .fetch_one(&self.pool)
                    .await?;
            return Err(if exists {
                StoreError::StaleRevision(revision)
            } else {
                StoreError::NotFound("Simulation")
            });
        };

        info!("Attached report to simulation {} for user {user_id}", row.id);
        Ok(row)
    }

    async fn current_report(&self, user_id: Uuid) -> StoreResult<Value> {
        let report: Option<Option<Value>> = sqlx::query_scalar(
            "SELECT report_data FROM simulations WHERE user_id = $1 \
             ORDER BY updated_at DESC, revision DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        report.flatten().ok_or(StoreError::NotFound("Report"))
    }

    async fn list_simulations(&self, user_id: Uuid) -> StoreResult<Vec<SimulationRow>> {
        Ok(sqlx::query_as::<_, SimulationRow>(&format!(
            "SELECT {SIMULATION_COLUMNS} FROM simulations WHERE user_id = $1 \
             ORDER BY updated_at DESC, revision DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_simulation(&self, user_id: Uuid, id: Uuid) -> StoreResult<SimulationRow> {
        sqlx::query_as::<_, SimulationRow>(&format!(
            "SELECT {SIMULATION_COLUMNS} FROM simulations WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("Simulation"))
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use serde_json::json;
    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct FakeDbError(ErrorKind);

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake database error ({:?})", self.0)
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            match self.0 {
                ErrorKind::UniqueViolation => Some(Cow::Borrowed("23505")),
                _ => None,
            }
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    #[test]
    fn test_unique_violation_is_duplicate_email() {
        let err = sqlx::Error::Database(Box::new(FakeDbError(ErrorKind::UniqueViolation)));
        assert!(matches!(map_unique_violation(err), StoreError::DuplicateEmail));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = sqlx::Error::Database(Box::new(FakeDbError(ErrorKind::CheckViolation)));
        assert!(matches!(map_unique_violation(err), StoreError::Database(_)));
        assert!(matches!(
            map_unique_violation(sqlx::Error::RowNotFound),
            StoreError::Database(sqlx::Error::RowNotFound)
        ));
    }

    // The tests below need a reachable Postgres at DATABASE_URL:
    //   cargo test -- --ignored

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_duplicate_email_rejected(pool: PgPool) {
        let store = PgStore::new(pool);
        store.create_user(new_user("a@example.com")).await.unwrap();
        let err = store.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_upsert_conflict_updates_in_place(pool: PgPool) {
        let store = PgStore::new(pool);
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        let first = store
            .upsert_simulation(user.id, &json!({"step6": {"country": "usa"}}))
            .await
            .unwrap();
        store
            .attach_report(user.id, first.revision, &json!({"n": 1}))
            .await
            .unwrap();
        let second = store
            .upsert_simulation(user.id, &json!({"step6": {"country": "canada"}}))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.revision, first.revision + 1);
        assert_eq!(second.status, "draft");
        assert_eq!(second.report_data, Some(json!({"n": 1})));
        assert_eq!(store.list_simulations(user.id).await.unwrap().len(), 1);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_attach_report_checks_revision(pool: PgPool) {
        let store = PgStore::new(pool);
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        assert!(matches!(
            store.attach_report(user.id, 1, &json!({})).await.unwrap_err(),
            StoreError::NotFound("Simulation")
        ));

        let loaded = store.upsert_simulation(user.id, &json!({"a": 1})).await.unwrap();
        store.upsert_simulation(user.id, &json!({"a": 2})).await.unwrap();
        assert!(matches!(
            store
                .attach_report(user.id, loaded.revision, &json!({}))
                .await
                .unwrap_err(),
            StoreError::StaleRevision(_)
        ));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_current_report_distinguishes_missing_row_and_null(pool: PgPool) {
        let store = PgStore::new(pool);
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        // No row at all.
        assert!(matches!(
            store.current_report(user.id).await.unwrap_err(),
            StoreError::NotFound("Report")
        ));

        // Row with NULL report_data.
        let row = store.upsert_simulation(user.id, &json!({"a": 1})).await.unwrap();
        assert!(matches!(
            store.current_report(user.id).await.unwrap_err(),
            StoreError::NotFound("Report")
        ));

        store
            .attach_report(user.id, row.revision, &json!({"n": 1}))
            .await
            .unwrap();
        assert_eq!(store.current_report(user.id).await.unwrap(), json!({"n": 1}));
    }
}
