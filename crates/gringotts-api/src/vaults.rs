//! Vault endpoints: thin handlers over the vault repository.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use gringotts_data::vaults::{self, NewVault, VaultRow};

use crate::errors::ApiError;
use crate::state::ApiState;

/// Wire representation of a vault.
#[derive(Debug, Serialize, Deserialize)]
pub struct VaultResponse {
    /// Vault identifier.
    pub id: Uuid,
    /// Name of the account holder.
    pub owner: String,
    /// Current balance in galleons.
    pub galleons: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<VaultRow> for VaultResponse {
    fn from(row: VaultRow) -> Self {
        Self {
            id: row.id,
            owner: row.owner,
            galleons: row.galleons,
            created_at: row.created_at,
        }
    }
}

/// Request body for opening a vault.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVaultRequest {
    /// Name of the account holder.
    pub owner: String,
    /// Opening balance in galleons; defaults to zero.
    #[serde(default)]
    pub galleons: i64,
}

/// List every vault, oldest first.
///
/// # Errors
///
/// Returns 500 when the listing query fails.
pub async fn list_vaults(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<VaultResponse>>, ApiError> {
    let rows = vaults::list_vaults(&state.pool).await.map_err(|err| {
        error!(error = %err, "failed to list vaults");
        ApiError::internal("failed to list vaults")
    })?;
    Ok(Json(rows.into_iter().map(VaultResponse::from).collect()))
}

/// Open a vault for the requested owner.
///
/// # Errors
///
/// Returns 400 when the owner is blank and 500 when the insert fails.
pub async fn create_vault(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<CreateVaultRequest>,
) -> Result<(StatusCode, Json<VaultResponse>), ApiError> {
    let owner = request.owner.trim();
    if owner.is_empty() {
        return Err(ApiError::bad_request("owner must not be empty"));
    }
    let row = vaults::insert_vault(
        &state.pool,
        &NewVault {
            owner,
            galleons: request.galleons,
        },
    )
    .await
    .map_err(|err| {
        error!(error = %err, "failed to open vault");
        ApiError::internal("failed to open vault")
    })?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// Fetch a single vault by identifier.
///
/// # Errors
///
/// Returns 404 when the vault does not exist and 500 when the query fails.
pub async fn get_vault(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<VaultResponse>, ApiError> {
    let row = vaults::fetch_vault(&state.pool, id).await.map_err(|err| {
        error!(error = %err, vault_id = %id, "failed to fetch vault");
        ApiError::internal("failed to fetch vault")
    })?;
    row.map(VaultResponse::from)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("no vault with id {id}")))
}
