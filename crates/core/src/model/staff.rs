use crate::model::ids::{StaffId, UserId};

/// A staff member linked to a backend user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffProfile {
    pub id: StaffId,
    pub user_id: UserId,
    pub name: String,
}

impl StaffProfile {
    #[must_use]
    pub fn new(id: StaffId, user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            user_id,
            name: name.into(),
        }
    }
}
