use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    /// Role name; absent for accounts that have not been approved yet
    pub role: Option<String>,
    pub exp: usize,

    pub token_type: TokenType,
    /// Present only if this user belongs to a team
    pub team_id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
