use serde::{Deserialize, Serialize};

use super::operation::Operation;
use super::repo_types::{Calculation, CalculationValues};
use crate::config::PageConfig;
use crate::error::AppError;

/// Body of `POST /api/calculations`. A client-sent `result` is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateCalculationRequest {
    pub a: f64,
    pub b: f64,
    #[serde(rename = "type")]
    pub kind: Operation,
}

/// Body of `PATCH /api/calculations/{id}`; absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCalculationRequest {
    pub a: Option<f64>,
    pub b: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<Operation>,
}

impl From<CreateCalculationRequest> for CalculationValues {
    fn from(r: CreateCalculationRequest) -> Self {
        Self {
            a: r.a,
            b: r.b,
            kind: r.kind,
        }
    }
}

impl UpdateCalculationRequest {
    pub fn merge_onto(&self, current: &Calculation) -> CalculationValues {
        CalculationValues {
            a: self.a.unwrap_or(current.a),
            b: self.b.unwrap_or(current.b),
            kind: self.kind.unwrap_or(current.kind),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// A validated `LIMIT`/`OFFSET` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    /// Negative `skip` is an error; `limit` is clamped into `1..=max_limit`.
    pub fn window(&self, pages: &PageConfig) -> Result<Window, AppError> {
        if self.skip < 0 {
            return Err(AppError::Validation("skip must be greater than or equal to 0".into()));
        }
        let limit = self
            .limit
            .unwrap_or(pages.default_limit)
            .clamp(1, pages.max_limit);
        Ok(Window {
            limit,
            offset: self.skip,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}
