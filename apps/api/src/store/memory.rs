use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::simulation::{SimulationRow, SimulationStatus};
use crate::models::user::{NewUser, User};
use crate::store::{SimulationStore, Store, StoreError, StoreResult, UserStore};

#[derive(Default)]
struct Users {
    by_id: HashMap<Uuid, User>,
    by_email: HashMap<String, Uuid>,
}

/// Process-local store. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Users>,
    /// Keyed by owning user: one current simulation each.
    simulations: RwLock<HashMap<Uuid, SimulationRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Flips the premium flag; the service itself never changes plans.
    pub async fn set_premium(&self, email: &str, is_premium: bool) {
        let mut users = self.users.write().await;
        let Some(id) = users.by_email.get(email).copied() else {
            return;
        };
        if let Some(user) = users.by_id.get_mut(&id) {
            user.is_premium = is_premium;
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.by_email.contains_key(&new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_premium: false,
            created_at: now,
            updated_at: now,
        };
        users.by_email.insert(user.email.clone(), user.id);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<User> {
        self.users
            .read()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("User"))
    }
}

#[async_trait]
impl SimulationStore for MemoryStore {
    async fn upsert_simulation(
        &self,
        user_id: Uuid,
        wizard_data: &Value,
    ) -> StoreResult<SimulationRow> {
        let now = Utc::now();
        let mut simulations = self.simulations.write().await;
        let row = simulations
            .entry(user_id)
            .and_modify(|row| {
                row.wizard_data = wizard_data.clone();
                row.status = SimulationStatus::Draft.as_str().to_string();
                row.revision += 1;
                row.updated_at = now;
            })
            .or_insert_with(|| SimulationRow {
                id: Uuid::new_v4(),
                user_id,
                wizard_data: wizard_data.clone(),
                report_data: None,
                status: SimulationStatus::Draft.as_str().to_string(),
                revision: 1,
                created_at: now,
                updated_at: now,
            });
        Ok(row.clone())
    }

    async fn current_simulation(&self, user_id: Uuid) -> StoreResult<SimulationRow> {
        self.simulations
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(StoreError::NotFound("Simulation"))
    }

    async fn attach_report(
        &self,
        user_id: Uuid,
        revision: i64,
        report: &Value,
    ) -> StoreResult<SimulationRow> {
        let mut simulations = self.simulations.write().await;
        let row = simulations
            .get_mut(&user_id)
            .ok_or(StoreError::NotFound("Simulation"))?;
        if row.revision != revision {
            return Err(StoreError::StaleRevision(revision));
        }
        row.report_data = Some(report.clone());
        row.status = SimulationStatus::Completed.as_str().to_string();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn current_report(&self, user_id: Uuid) -> StoreResult<Value> {
        self.simulations
            .read()
            .await
            .get(&user_id)
            .and_then(|row| row.report_data.clone())
            .ok_or(StoreError::NotFound("Report"))
    }

    async fn list_simulations(&self, user_id: Uuid) -> StoreResult<Vec<SimulationRow>> {
        Ok(self
            .simulations
            .read()
            .await
            .get(&user_id)
            .cloned()
            .into_iter()
            .collect())
    }

    async fn get_simulation(&self, user_id: Uuid, id: Uuid) -> StoreResult<SimulationRow> {
        self.simulations
            .read()
            .await
            .get(&user_id)
            .filter(|row| row.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("Simulation"))
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();
        let err = store.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_new_user_defaults_to_free_plan() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();
        assert!(!user.is_premium);
        let found = store.find_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(store.find_user_by_email("b@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_keeps_single_row_and_bumps_revision() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let first = store
            .upsert_simulation(user_id, &json!({"step6": {"country": "usa"}}))
            .await
            .unwrap();
        let second = store
            .upsert_simulation(user_id, &json!({"step6": {"country": "canada"}}))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.revision, first.revision + 1);
        assert_eq!(second.wizard_data["step6"]["country"], "canada");
        assert_eq!(store.list_simulations(user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_attach_report_requires_simulation() {
        let store = MemoryStore::new();
        let err = store
            .attach_report(Uuid::new_v4(), 1, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Simulation")));
    }

    #[tokio::test]
    async fn test_report_overwritten_and_resave_resets_status() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let saved = store.upsert_simulation(user_id, &json!({"a": 1})).await.unwrap();

        assert!(matches!(
            store.current_report(user_id).await.unwrap_err(),
            StoreError::NotFound("Report")
        ));

        store
            .attach_report(user_id, saved.revision, &json!({"n": 1}))
            .await
            .unwrap();
        let row = store
            .attach_report(user_id, saved.revision, &json!({"n": 2}))
            .await
            .unwrap();
        assert_eq!(row.status, "completed");
        assert_eq!(store.current_report(user_id).await.unwrap(), json!({"n": 2}));

        let row = store.upsert_simulation(user_id, &json!({"a": 2})).await.unwrap();
        assert_eq!(row.status, "draft");
    }

    #[tokio::test]
    async fn test_attach_report_rejects_outdated_revision() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let loaded = store.upsert_simulation(user_id, &json!({"a": 1})).await.unwrap();
        store.upsert_simulation(user_id, &json!({"a": 2})).await.unwrap();

        let err = store
            .attach_report(user_id, loaded.revision, &json!({"n": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::StaleRevision(1)));

        let row = store.current_simulation(user_id).await.unwrap();
        assert_eq!(row.status, "draft");
        assert!(row.report_data.is_none());
    }

    #[tokio::test]
    async fn test_get_simulation_scoped_to_owner() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let row = store.upsert_simulation(owner, &json!({"a": 1})).await.unwrap();

        assert!(store.get_simulation(owner, row.id).await.is_ok());
        assert!(store.get_simulation(Uuid::new_v4(), row.id).await.is_err());
    }
}
