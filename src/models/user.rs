use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    /// Hex-encoded SHA-256 of the password. Plain passwords are never stored.
    pub password: String,
    pub created_at: String,
}

impl User {
    #[cfg(test)]
    pub fn new(username: impl Into<String>, plain_password: &str) -> Self {
        Self {
            id: None,
            username: username.into(),
            password: hash_password(plain_password),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub fn hash_password(plain: &str) -> String {
    format!("{:x}", Sha256::digest(plain.as_bytes()))
}
