//! Owner-scoped calculation operations.
//!
//! The result column is always derived here from the stored operands; the
//! repository never receives a value that did not come out of [`evaluate`].

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::dto::{UpdateCalculationRequest, Window};
use super::operation::evaluate;
use super::repo::CalculationRepo;
use super::repo_types::{Calculation, CalculationValues};
use crate::error::AppError;

const RESOURCE: &str = "Calculation";

pub async fn create(
    repo: &dyn CalculationRepo,
    owner: Uuid,
    values: CalculationValues,
) -> Result<Calculation, AppError> {
    let result = evaluate(values.a, values.b, values.kind).map_err(|e| {
        warn!(user_id = %owner, kind = %values.kind, error = %e, "calculation rejected");
        e
    })?;
    let calc = repo.insert(owner, values, result).await?;
    info!(user_id = %owner, calculation_id = %calc.id, kind = %calc.kind, "calculation created");
    Ok(calc)
}

pub async fn list(
    repo: &dyn CalculationRepo,
    owner: Uuid,
    window: Window,
) -> Result<Vec<Calculation>, AppError> {
    let rows = repo
        .list_by_owner(owner, window.limit, window.offset)
        .await?;
    debug!(user_id = %owner, limit = window.limit, offset = window.offset, returned = rows.len(), "calculations listed");
    Ok(rows)
}

pub async fn get(repo: &dyn CalculationRepo, owner: Uuid, id: Uuid) -> Result<Calculation, AppError> {
    repo.find_owned(owner, id)
        .await?
        .ok_or(AppError::NotFound(RESOURCE))
}

pub async fn update(
    repo: &dyn CalculationRepo,
    owner: Uuid,
    id: Uuid,
    patch: &UpdateCalculationRequest,
) -> Result<Calculation, AppError> {
    let current = get(repo, owner, id).await?;
    let merged = patch.merge_onto(&current);
    let result = evaluate(merged.a, merged.b, merged.kind).map_err(|e| {
        warn!(user_id = %owner, calculation_id = %id, error = %e, "calculation update rejected");
        e
    })?;
    let calc = repo
        .update_owned(owner, id, merged, result)
        .await?
        .ok_or(AppError::NotFound(RESOURCE))?;
    info!(user_id = %owner, calculation_id = %id, "calculation updated");
    Ok(calc)
}

pub async fn delete(repo: &dyn CalculationRepo, owner: Uuid, id: Uuid) -> Result<(), AppError> {
    if !repo.delete_owned(owner, id).await? {
        return Err(AppError::NotFound(RESOURCE));
    }
    info!(user_id = %owner, calculation_id = %id, "calculation deleted");
    Ok(())
}

pub async fn count(repo: &dyn CalculationRepo, owner: Uuid) -> Result<i64, AppError> {
    Ok(repo.count_by_owner(owner).await?)
}
