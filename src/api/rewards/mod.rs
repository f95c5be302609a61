//! Token reward ledger endpoints

use axum::{extract::State, routing::get, Router};
use serde::Serialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Envelope};
use crate::domain::reward::RewardEntry;

/// Create the rewards router
pub fn create_reward_router() -> Router<AppState> {
    Router::new().route("/", get(get_ledger))
}

/// Ledger entry response
#[derive(Debug, Serialize)]
pub struct RewardEntryResponse {
    pub id: String,
    pub kind: String,
    pub amount: i64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub created_at: String,
}

impl From<&RewardEntry> for RewardEntryResponse {
    fn from(entry: &RewardEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            kind: entry.kind().to_string(),
            amount: entry.amount(),
            reason: entry.reason().to_string(),
            reference_id: entry.reference_id().map(String::from),
            created_at: entry.created_at().to_rfc3339(),
        }
    }
}

/// Ledger response with balance
#[derive(Debug, Serialize)]
pub struct LedgerResponse {
    pub balance: i64,
    pub entries: Vec<RewardEntryResponse>,
}

/// GET /api/rewards
///
/// The authenticated user's token ledger and balance.
pub async fn get_ledger(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Envelope<LedgerResponse>, ApiError> {
    let ledger = state.reward_service.ledger(user.id()).await?;

    Ok(Envelope::ok(LedgerResponse {
        balance: ledger.balance,
        entries: ledger.entries.iter().map(RewardEntryResponse::from).collect(),
    }))
}
