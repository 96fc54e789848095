use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_owner(&self) -> bool {
        self.role == "owner"
    }

    pub fn can_edit(&self) -> bool {
        self.role == "owner" || self.role == "editor"
    }
}
