//! Persistence seam — trait-based stores with swappable backends.
//!
//! `PgStore` (sqlx/Postgres) is the production backend, `MemoryStore` backs
//! tests and `STORE_BACKEND=memory`. `AppState` carries an `Arc<dyn Store>`,
//! chosen at startup from config.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::simulation::SimulationRow;
use crate::models::user::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("simulation changed since revision {0}")]
    StaleRevision(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User identity and password verifier, keyed by id and by normalized email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DuplicateEmail` if the email is taken.
    async fn create_user(&self, new_user: NewUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn get_user(&self, id: Uuid) -> StoreResult<User>;
}

/// One current wizard submission (plus its report) per user.
#[async_trait]
pub trait SimulationStore: Send + Sync {
    /// Replaces the user's current wizard data, resets status to draft and
    /// bumps the revision. Creates the row on first save.
    async fn upsert_simulation(&self, user_id: Uuid, wizard_data: &Value)
        -> StoreResult<SimulationRow>;

    async fn current_simulation(&self, user_id: Uuid) -> StoreResult<SimulationRow>;

    /// Overwrites `report_data` on the current simulation and marks it
    /// completed, provided it is still at `revision`. Fails with
    /// `StaleRevision` if the wizard data was re-saved in between.
    async fn attach_report(
        &self,
        user_id: Uuid,
        revision: i64,
        report: &Value,
    ) -> StoreResult<SimulationRow>;

    async fn current_report(&self, user_id: Uuid) -> StoreResult<Value>;

    /// Newest first.
    async fn list_simulations(&self, user_id: Uuid) -> StoreResult<Vec<SimulationRow>>;

    /// A simulation owned by someone else is reported as not found.
    async fn get_simulation(&self, user_id: Uuid, id: Uuid) -> StoreResult<SimulationRow>;
}

/// Everything the handlers need from a backend.
#[async_trait]
pub trait Store: UserStore + SimulationStore {
    fn backend_name(&self) -> &'static str;

    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> bool;
}
