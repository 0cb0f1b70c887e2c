use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Calculation, CalculationRow, CalculationValues};

/// Owner-scoped persistence for calculation records.
///
/// Every lookup filters on both the record id and the owner, so a foreign id
/// is indistinguishable from a missing one.
#[async_trait]
pub trait CalculationRepo: Send + Sync {
    async fn insert(
        &self,
        owner: Uuid,
        values: CalculationValues,
        result: f64,
    ) -> anyhow::Result<Calculation>;

    /// Newest first.
    async fn list_by_owner(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Calculation>>;

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Calculation>>;

    /// Returns `None` when the row is gone or belongs to someone else.
    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        values: CalculationValues,
        result: f64,
    ) -> anyhow::Result<Option<Calculation>>;

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;

    async fn count_by_owner(&self, owner: Uuid) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgCalculationRepo {
    db: PgPool,
}

impl PgCalculationRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn into_model(row: CalculationRow) -> anyhow::Result<Calculation> {
    let id = row.id;
    Calculation::try_from(row).with_context(|| format!("decode calculation {}", id))
}

#[async_trait]
impl CalculationRepo for PgCalculationRepo {
    async fn insert(
        &self,
        owner: Uuid,
        values: CalculationValues,
        result: f64,
    ) -> anyhow::Result<Calculation> {
        let row = sqlx::query_as::<_, CalculationRow>(
            r#"
            INSERT INTO calculations (id, a, b, type, result, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, a, b, type, result, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(values.a)
        .bind(values.b)
        .bind(values.kind.as_str())
        .bind(result)
        .bind(owner)
        .fetch_one(&self.db)
        .await
        .context("insert calculation")?;
        into_model(row)
    }

    async fn list_by_owner(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Calculation>> {
        let rows = sqlx::query_as::<_, CalculationRow>(
            r#"
            SELECT id, a, b, type, result, user_id, created_at, updated_at
            FROM calculations
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("list calculations by user")?;
        rows.into_iter().map(into_model).collect()
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Calculation>> {
        let row = sqlx::query_as::<_, CalculationRow>(
            r#"
            SELECT id, a, b, type, result, user_id, created_at, updated_at
            FROM calculations
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await
        .context("find calculation")?;
        row.map(into_model).transpose()
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        values: CalculationValues,
        result: f64,
    ) -> anyhow::Result<Option<Calculation>> {
        let row = sqlx::query_as::<_, CalculationRow>(
            r#"
            UPDATE calculations
               SET a = $3, b = $4, type = $5, result = $6, updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING id, a, b, type, result, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(values.a)
        .bind(values.b)
        .bind(values.kind.as_str())
        .bind(result)
        .fetch_optional(&self.db)
        .await
        .context("update calculation")?;
        row.map(into_model).transpose()
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let done = sqlx::query(r#"DELETE FROM calculations WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await
            .context("delete calculation")?;
        Ok(done.rows_affected() > 0)
    }

    async fn count_by_owner(&self, owner: Uuid) -> anyhow::Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM calculations WHERE user_id = $1"#)
                .bind(owner)
                .fetch_one(&self.db)
                .await
                .context("count calculations by user")?;
        Ok(count)
    }
}
