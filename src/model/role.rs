use strum_macros::{AsRefStr, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Hr,
    Leader,
    Staff,
    Member,
    Guest,
}

impl Role {
    /// Resolves the role carried by a token. No role at all means `Guest`;
    /// an unknown role name is rejected.
    pub fn from_claim(role: Option<&str>) -> Option<Self> {
        match role {
            None => Some(Role::Guest),
            Some(name) => name.trim().to_lowercase().parse().ok(),
        }
    }

    pub fn is_staff_level(&self) -> bool {
        !matches!(self, Role::Guest)
    }

    pub fn can_manage_board(&self) -> bool {
        matches!(self, Role::Admin | Role::Hr | Role::Leader)
    }
}
