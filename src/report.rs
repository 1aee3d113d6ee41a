//! Organizer-side aggregation over the party directory.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::StoreError;
use crate::model::{EventKind, MealChoice, Party};
use crate::store::PartyDirectory;

/// Aggregate attendance and meal totals across the whole directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectorySummary {
    pub total_parties: usize,
    pub submitted_parties: usize,
    pub total_members: usize,
    /// Members covered by a submitted response.
    pub total_respondents: usize,
    pub ceremony_attending: usize,
    pub celebration_attending: usize,
    /// Respondents who declined every event they were invited to.
    pub declined: usize,
    pub meal_counts: BTreeMap<MealChoice, usize>,
}

/// Summarize a snapshot of the directory. Pure.
pub fn summarize(parties: &[Party]) -> DirectorySummary {
    let mut summary = DirectorySummary {
        total_parties: parties.len(),
        ..Default::default()
    };

    for party in parties {
        summary.total_members += party.members.len();
        if !party.has_submitted() {
            continue;
        }
        summary.submitted_parties += 1;

        for answer in &party.responses {
            summary.total_respondents += 1;
            let ceremony = answer.is_attending(EventKind::Ceremony);
            let celebration = answer.is_attending(EventKind::Celebration);
            if ceremony {
                summary.ceremony_attending += 1;
            }
            if celebration {
                summary.celebration_attending += 1;
            }
            if !ceremony && !celebration {
                summary.declined += 1;
            }
            if let Some(meal) = answer.meal {
                *summary.meal_counts.entry(meal).or_insert(0) += 1;
            }
        }
    }

    summary
}

/// Fetch the directory and summarize it.
pub async fn directory_summary(
    directory: &Arc<dyn PartyDirectory>,
) -> Result<DirectorySummary, StoreError> {
    let parties = directory.fetch_all_parties().await?;
    Ok(summarize(&parties))
}
