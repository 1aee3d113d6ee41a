//! In-memory `PartyDirectory` backend.
//!
//! Backs the CLI driver and the test suite. The production document store
//! sits behind the same trait; nothing in the core depends on this backend.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::model::{Answer, InvitationFlags, Party, PartyId};
use crate::store::codes::generate_code;
use crate::store::traits::PartyDirectory;

/// Directory of parties held in memory behind an async lock.
pub struct InMemoryDirectory {
    parties: RwLock<HashMap<PartyId, Party>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            parties: RwLock::new(HashMap::new()),
        }
    }

    /// Organizer-side seeding: register one invited party.
    pub async fn insert_party(&self, party: Party) {
        let mut parties = self.parties.write().await;
        parties.insert(party.id, party);
    }

    /// Load a JSON seed file (an array of parties) into the directory.
    /// Returns the number of parties loaded.
    pub async fn load_seed(&self, path: &Path) -> Result<usize, StoreError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Backend(format!("read {}: {e}", path.display())))?;
        let seeded: Vec<Party> = serde_json::from_str(&raw)?;
        let count = seeded.len();
        let mut parties = self.parties.write().await;
        for party in seeded {
            parties.insert(party.id, party);
        }
        Ok(count)
    }

    pub async fn len(&self) -> usize {
        self.parties.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.parties.read().await.is_empty()
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PartyDirectory for InMemoryDirectory {
    async fn fetch_all_parties(&self) -> Result<Vec<Party>, StoreError> {
        let parties = self.parties.read().await;
        let mut all: Vec<Party> = parties.values().cloned().collect();
        // HashMap iteration order is arbitrary; keep scans deterministic.
        all.sort_by_key(|p| p.id);
        Ok(all)
    }

    async fn fetch_party(&self, id: PartyId) -> Result<Option<Party>, StoreError> {
        let parties = self.parties.read().await;
        Ok(parties.get(&id).cloned())
    }

    async fn fetch_party_by_confirmation_code(
        &self,
        code: &str,
    ) -> Result<Option<Party>, StoreError> {
        let parties = self.parties.read().await;
        Ok(parties
            .values()
            .find(|p| p.confirmation_code.as_deref() == Some(code))
            .cloned())
    }

    async fn submit_answers(
        &self,
        party_id: PartyId,
        flags: InvitationFlags,
        answers: &[Answer],
    ) -> Result<String, StoreError> {
        let mut parties = self.parties.write().await;
        let party = parties.get_mut(&party_id).ok_or_else(|| StoreError::NotFound {
            entity: "party".to_string(),
            id: party_id.to_string(),
        })?;

        let code = generate_code();

        // Merge semantics: only the RSVP fields change; identity, label,
        // and membership stay as the organizer created them.
        party.flags = flags;
        party.responses = answers.to_vec();
        party.confirmation_code = Some(code.clone());
        party.submitted_at = Some(Utc::now());

        tracing::info!(%party_id, code, guests = answers.len(), "RSVP submitted");
        Ok(code)
    }
}
