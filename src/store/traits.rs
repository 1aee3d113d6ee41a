//! `PartyDirectory` trait — the core's single persistence collaborator.
//!
//! The directory is an opaque keyed document store; the core never defines
//! a wire protocol or file format for it.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Answer, InvitationFlags, Party, PartyId};

/// Backend-agnostic party directory covering lookup and RSVP submission.
#[async_trait]
pub trait PartyDirectory: Send + Sync {
    /// Full-directory read. Used by search (linear scan) and reporting.
    async fn fetch_all_parties(&self) -> Result<Vec<Party>, StoreError>;

    /// Look up one party by id. Used for direct-link entry.
    async fn fetch_party(&self, id: PartyId) -> Result<Option<Party>, StoreError>;

    /// Look up the party holding a confirmation code. Used by the
    /// post-submission lookup view.
    async fn fetch_party_by_confirmation_code(
        &self,
        code: &str,
    ) -> Result<Option<Party>, StoreError>;

    /// Persist a final answer set onto the party document (merge: unrelated
    /// party fields are untouched) and return a freshly generated
    /// confirmation code.
    async fn submit_answers(
        &self,
        party_id: PartyId,
        flags: InvitationFlags,
        answers: &[Answer],
    ) -> Result<String, StoreError>;
}
