//! In-process repositories backing `AppState::fake()` and the HTTP tests.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{
    repo::{UserRepo, UserRepoError},
    repo_types::{NewUser, User},
};
use crate::calculations::{
    repo::CalculationRepo,
    repo_types::{Calculation, CalculationValues},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    // insertion order doubles as creation order
    calculations: Vec<Calculation>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the active flag; there is no API route for this.
    pub async fn set_active(&self, user_id: Uuid, active: bool) -> bool {
        let mut tables = self.tables.write().await;
        match tables.users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.is_active = active;
                user.updated_at = OffsetDateTime::now_utc();
                true
            }
            None => false,
        }
    }

    /// Removes a user and, like the foreign key, their calculations.
    pub async fn remove_user(&self, user_id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != user_id);
        tables.calculations.retain(|c| c.user_id != user_id);
        tables.users.len() != before
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new: NewUser<'_>) -> Result<User, UserRepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == new.username) {
            return Err(UserRepoError::Duplicate("Username"));
        }
        if tables.users.iter().any(|u| u.email == new.email) {
            return Err(UserRepoError::Duplicate("Email"));
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            username: new.username.to_string(),
            email: new.email.to_string(),
            password_hash: new.password_hash.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CalculationRepo for MemoryStore {
    async fn insert(
        &self,
        owner: Uuid,
        values: CalculationValues,
        result: f64,
    ) -> anyhow::Result<Calculation> {
        let mut tables = self.tables.write().await;
        let now = OffsetDateTime::now_utc();
        let calc = Calculation {
            id: Uuid::new_v4(),
            a: values.a,
            b: values.b,
            kind: values.kind,
            result: Some(result),
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        tables.calculations.push(calc.clone());
        Ok(calc)
    }

    async fn list_by_owner(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Calculation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .calculations
            .iter()
            .rev()
            .filter(|c| c.user_id == owner)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Calculation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .calculations
            .iter()
            .find(|c| c.id == id && c.user_id == owner)
            .cloned())
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        values: CalculationValues,
        result: f64,
    ) -> anyhow::Result<Option<Calculation>> {
        let mut tables = self.tables.write().await;
        let Some(calc) = tables
            .calculations
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
        else {
            return Ok(None);
        };
        calc.a = values.a;
        calc.b = values.b;
        calc.kind = values.kind;
        calc.result = Some(result);
        calc.updated_at = OffsetDateTime::now_utc().max(calc.updated_at);
        Ok(Some(calc.clone()))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.calculations.len();
        tables
            .calculations
            .retain(|c| !(c.id == id && c.user_id == owner));
        Ok(tables.calculations.len() != before)
    }

    async fn count_by_owner(&self, owner: Uuid) -> anyhow::Result<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .calculations
            .iter()
            .filter(|c| c.user_id == owner)
            .count() as i64)
    }
}
