use anyhow::{bail, Result};
use rusqlite::params;
use tracing::{info, warn};

use super::schema;
use super::Database;
use crate::models::hash_password;

const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "password";

/// Credential record inserted on first provisioning.
#[derive(Debug, Clone)]
pub(crate) struct SeedUser {
    pub(crate) username: String,
    /// Already hashed; stored verbatim.
    pub(crate) password_hash: String,
}

impl Default for SeedUser {
    fn default() -> Self {
        Self {
            username: DEMO_USERNAME.into(),
            password_hash: hash_password(DEMO_PASSWORD),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BootstrapReport {
    pub(crate) collections: Vec<String>,
    pub(crate) seed_inserted: bool,
}

impl Database {
    /// Provision collections, indexes and the seed user.
    ///
    /// Safe to run against a store that is already provisioned: the schema is
    /// created with `IF NOT EXISTS` and the seed user is only inserted when no
    /// user with that name exists yet.
    pub(crate) fn bootstrap(&mut self, seed: &SeedUser) -> Result<BootstrapReport> {
        self.migrate()?;

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users (username, password, created_at) VALUES (?1, ?2, ?3)",
            params![
                seed.username,
                seed.password_hash,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;

        if inserted == 0 {
            if let Some(existing) = self.find_user(&seed.username)? {
                if existing.password != seed.password_hash {
                    warn!(user = %existing.username, "seed user kept with a different password");
                }
            }
        }

        let collections = self.collections()?;
        let missing: Vec<&str> = schema::COLLECTIONS
            .iter()
            .copied()
            .filter(|name| !collections.iter().any(|c| c == name))
            .collect();
        if !missing.is_empty() {
            bail!("Store is missing collections: {}", missing.join(", "));
        }

        let report = BootstrapReport {
            collections,
            seed_inserted: inserted > 0,
        };
        info!(
            collections = report.collections.len(),
            seed_inserted = report.seed_inserted,
            seed_user = %seed.username,
            "store bootstrap completed"
        );
        Ok(report)
    }
}
