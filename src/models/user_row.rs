#[derive(Clone)]
pub struct UserRow {
    pub username: String,
    pub role: String,
}
