//! Cache-resident session payload.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// The session payload stored in the cache under `session:{token}`.
///
/// This is the authoritative record of "who is logged in" for the lifetime
/// of a token; the relational `sessions` table only records provenance for
/// audit and the sessions-management UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
}
