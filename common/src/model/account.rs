use serde::{Deserialize, Serialize};

/// A registered reviewer account.
///
/// The password is kept in memory only and is never serialized back out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
}
