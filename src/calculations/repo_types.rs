use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::operation::{EvalError, Operation};

/// Row as stored in the `calculations` table.
#[derive(Debug, FromRow)]
pub struct CalculationRow {
    pub id: Uuid,
    pub a: f64,
    pub b: f64,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub result: Option<f64>,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Calculation record owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub id: Uuid,
    pub a: f64,
    pub b: f64,
    #[serde(rename = "type")]
    pub kind: Operation,
    pub result: Option<f64>,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fully merged operands ready to be evaluated and written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationValues {
    pub a: f64,
    pub b: f64,
    pub kind: Operation,
}

impl TryFrom<CalculationRow> for Calculation {
    type Error = EvalError;

    fn try_from(r: CalculationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            a: r.a,
            b: r.b,
            kind: r.kind.parse()?,
            result: r.result,
            user_id: r.user_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
