//! Wizard controller — owns the session's party, answers, and phase.
//!
//! Phases progress `Searching → Answering → Confirming → Submitted`. The
//! controller mediates between the directory lookup, the per-guest answer
//! map, and the submission collaborator; step validity is delegated to the
//! planner.

use std::fmt;
use std::sync::Arc;

use crate::error::{StoreError, WizardError};
use crate::model::{
    Answer, AnswerMap, Attendance, EventKind, MealChoice, MemberId, Party, PartyId, seed_answers,
};
use crate::store::PartyDirectory;
use crate::wizard::planner::{StepKind, StepPlanner, WizardStep};

/// Coarse phase of the wizard, used for transition checks and error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    Searching,
    Answering,
    Confirming,
    Submitted,
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Searching => "searching",
            Self::Answering => "answering",
            Self::Confirming => "confirming",
            Self::Submitted => "submitted",
        };
        write!(f, "{s}")
    }
}

/// Full wizard state, including the answering position and the assigned
/// confirmation code once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Searching,
    Answering { position: usize },
    Confirming,
    Submitted { code: String },
}

impl WizardState {
    pub fn phase(&self) -> WizardPhase {
        match self {
            Self::Searching => WizardPhase::Searching,
            Self::Answering { .. } => WizardPhase::Answering,
            Self::Confirming => WizardPhase::Confirming,
            Self::Submitted { .. } => WizardPhase::Submitted,
        }
    }
}

/// One RSVP session. Owns its party selection and answer map; no state is
/// shared across sessions.
pub struct WizardController {
    directory: Arc<dyn PartyDirectory>,
    planner: StepPlanner,
    state: WizardState,
    party: Option<Party>,
    answers: AnswerMap,
    submitting: bool,
}

impl WizardController {
    pub fn new(directory: Arc<dyn PartyDirectory>, planner: StepPlanner) -> Self {
        Self {
            directory,
            planner,
            state: WizardState::Searching,
            party: None,
            answers: AnswerMap::new(),
            submitting: false,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn phase(&self) -> WizardPhase {
        self.state.phase()
    }

    pub fn party(&self) -> Option<&Party> {
        self.party.as_ref()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Whether a submission round-trip is in flight; the UI disables the
    /// submit affordance while true.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Current step sequence, freshly derived from party + answers.
    pub fn steps(&self) -> Vec<WizardStep> {
        self.planner.plan(self.party.as_ref(), &self.answers)
    }

    /// The step the guest is currently on.
    pub fn current_step(&self) -> WizardStep {
        let steps = self.steps();
        let position = match &self.state {
            WizardState::Searching => 1,
            WizardState::Answering { position } => *position,
            WizardState::Confirming | WizardState::Submitted { .. } => steps.len(),
        };
        steps
            .into_iter()
            .find(|s| s.position == position)
            .unwrap_or_else(|| WizardStep {
                position: 1,
                kind: StepKind::FindInvitation,
                label: "Find Invitation",
                complete: false,
            })
    }

    // ── Entry points ────────────────────────────────────────────────

    /// Select a party from search results and seed its answer map.
    ///
    /// A party that already carries a confirmation code re-enters the
    /// read-only submitted view instead of replaying the questions.
    pub fn select_party(&mut self, party: Party) -> Result<(), WizardError> {
        if self.phase() != WizardPhase::Searching {
            return Err(WizardError::InvalidTransition {
                phase: self.phase(),
                action: "select_party",
            });
        }

        if let Some(code) = party.confirmation_code.clone() {
            self.answers = recalled_answers(&party);
            self.party = Some(party);
            self.state = WizardState::Submitted { code };
            return Ok(());
        }

        self.answers = seed_answers(&party);
        self.party = Some(party);
        self.state = match first_answering_position(&self.steps()) {
            Some(position) => WizardState::Answering { position },
            // Nothing to answer: straight to confirmation.
            None => WizardState::Confirming,
        };
        Ok(())
    }

    /// Direct-link entry: load a party by id, skipping search.
    pub async fn enter_by_id(&mut self, id: PartyId) -> Result<(), WizardError> {
        if self.phase() != WizardPhase::Searching {
            return Err(WizardError::InvalidTransition {
                phase: self.phase(),
                action: "enter_by_id",
            });
        }
        let party = self
            .directory
            .fetch_party(id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity: "party".to_string(),
                id: id.to_string(),
            })?;
        self.select_party(party)
    }

    /// Post-submission lookup: resolve a confirmation code to the
    /// read-only submitted view.
    pub async fn enter_by_confirmation_code(&mut self, code: &str) -> Result<(), WizardError> {
        if self.phase() != WizardPhase::Searching {
            return Err(WizardError::InvalidTransition {
                phase: self.phase(),
                action: "enter_by_confirmation_code",
            });
        }
        let party = self
            .directory
            .fetch_party_by_confirmation_code(code)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity: "party".to_string(),
                id: code.to_string(),
            })?;
        self.select_party(party)
    }

    // ── Answer mutators ─────────────────────────────────────────────

    /// Record a member's attendance decision for one event.
    ///
    /// Clears the member's meal choice whenever the governing decision is
    /// no longer "yes", so a meal can never outlive the decision that
    /// required it.
    pub fn set_attendance(
        &mut self,
        member_id: MemberId,
        event: EventKind,
        decision: Attendance,
    ) -> Result<(), WizardError> {
        let governor = self.meal_governor();
        let answer = self.answer_mut(member_id)?;
        answer.set_attendance(event, decision);
        if let Some(governing_event) = governor {
            if !answer.is_attending(governing_event) {
                answer.meal = None;
            }
        }
        Ok(())
    }

    /// Record a member's meal choice. Only valid while the governing
    /// attendance decision is "yes" and the choice is on the active menu.
    pub fn set_meal(&mut self, member_id: MemberId, meal: MealChoice) -> Result<(), WizardError> {
        let governor = self.meal_governor();
        let menu = self.planner.policy.menu;
        let step = match &self.state {
            WizardState::Answering { position } => *position,
            _ => 0,
        };
        let answer = self.answer_mut(member_id)?;

        let governed = match governor {
            Some(event) => answer.is_attending(event),
            None => false,
        };
        if !governed || !menu.offers(meal) {
            return Err(WizardError::ValidationBlocked { step });
        }

        answer.meal = Some(meal);
        Ok(())
    }

    /// Record a free-text note for one event.
    pub fn set_note(
        &mut self,
        member_id: MemberId,
        event: EventKind,
        note: impl Into<String>,
    ) -> Result<(), WizardError> {
        let answer = self.answer_mut(member_id)?;
        let note = note.into();
        let slot = match event {
            EventKind::Ceremony => &mut answer.ceremony_note,
            EventKind::Celebration => &mut answer.celebration_note,
        };
        *slot = if note.is_empty() { None } else { Some(note) };
        Ok(())
    }

    /// Record free-text dietary notes.
    pub fn set_dietary_notes(
        &mut self,
        member_id: MemberId,
        notes: impl Into<String>,
    ) -> Result<(), WizardError> {
        let answer = self.answer_mut(member_id)?;
        let notes = notes.into();
        answer.dietary_notes = if notes.is_empty() { None } else { Some(notes) };
        Ok(())
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Whether the current step's completion predicate holds and a next
    /// step exists. Drives the enabled state of the "next" affordance.
    pub fn can_advance(&self) -> bool {
        if self.phase() != WizardPhase::Answering {
            return false;
        }
        let steps = self.steps();
        let current = self.current_step();
        current.complete && current.position < steps.len()
    }

    /// Move to the next planned step.
    pub fn advance(&mut self) -> Result<(), WizardError> {
        let WizardState::Answering { position } = self.state else {
            return Err(WizardError::InvalidTransition {
                phase: self.phase(),
                action: "advance",
            });
        };

        let steps = self.steps();
        let current = self.current_step();
        if !current.complete {
            return Err(WizardError::ValidationBlocked { step: position });
        }

        let next_position = position + 1;
        let next = steps.iter().find(|s| s.position == next_position);
        self.state = match next.map(|s| s.kind) {
            Some(StepKind::Confirmation) | None => WizardState::Confirming,
            Some(_) => WizardState::Answering {
                position: next_position,
            },
        };
        Ok(())
    }

    /// Step backwards.
    ///
    /// From the first answering step this is a full reset: back to search
    /// with every answer discarded. Later steps retreat non-destructively.
    pub fn retreat(&mut self) -> Result<(), WizardError> {
        match &self.state {
            WizardState::Searching | WizardState::Submitted { .. } => {
                Err(WizardError::InvalidTransition {
                    phase: self.phase(),
                    action: "retreat",
                })
            }
            WizardState::Answering { position } => {
                let steps = self.steps();
                match first_answering_position(&steps) {
                    Some(first) if *position > first => {
                        self.state = WizardState::Answering {
                            position: position - 1,
                        };
                        Ok(())
                    }
                    _ => {
                        self.reset_to_search();
                        Ok(())
                    }
                }
            }
            WizardState::Confirming => {
                let steps = self.steps();
                match last_answering_position(&steps) {
                    Some(position) => {
                        self.state = WizardState::Answering { position };
                        Ok(())
                    }
                    // No answering steps at all: back to search.
                    None => {
                        self.reset_to_search();
                        Ok(())
                    }
                }
            }
        }
    }

    /// Submit the completed answer set.
    ///
    /// Valid only from the confirmation step. On failure the wizard stays
    /// in `Confirming` with all answers intact; on success it carries the
    /// returned confirmation code into the terminal `Submitted` state.
    pub async fn submit(&mut self) -> Result<String, WizardError> {
        if self.phase() != WizardPhase::Confirming {
            return Err(WizardError::InvalidTransition {
                phase: self.phase(),
                action: "submit",
            });
        }
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        let Some(party) = self.party.clone() else {
            return Err(WizardError::InvalidTransition {
                phase: self.phase(),
                action: "submit",
            });
        };

        let answers: Vec<Answer> = self.answers.values().cloned().collect();
        self.submitting = true;
        let result = self
            .directory
            .submit_answers(party.id, party.flags, &answers)
            .await;
        self.submitting = false;

        match result {
            Ok(code) => {
                tracing::info!(party_id = %party.id, code, "RSVP submission confirmed");
                if let Some(p) = self.party.as_mut() {
                    p.confirmation_code = Some(code.clone());
                    p.responses = answers;
                }
                self.state = WizardState::Submitted { code: code.clone() };
                Ok(code)
            }
            Err(err) => {
                tracing::warn!(party_id = %party.id, error = %err, "RSVP submission failed");
                Err(err.into())
            }
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    fn meal_governor(&self) -> Option<EventKind> {
        let party = self.party.as_ref()?;
        self.planner.policy.meal_governor(party.flags.kind())
    }

    fn answer_mut(&mut self, member_id: MemberId) -> Result<&mut Answer, WizardError> {
        if self.phase() != WizardPhase::Answering {
            return Err(WizardError::InvalidTransition {
                phase: self.phase(),
                action: "edit_answer",
            });
        }
        self.answers
            .get_mut(&member_id)
            .ok_or(WizardError::UnknownMember(member_id))
    }

    fn reset_to_search(&mut self) {
        self.party = None;
        self.answers.clear();
        self.state = WizardState::Searching;
    }
}

fn first_answering_position(steps: &[WizardStep]) -> Option<usize> {
    steps
        .iter()
        .find(|s| is_answering(s.kind))
        .map(|s| s.position)
}

fn last_answering_position(steps: &[WizardStep]) -> Option<usize> {
    steps
        .iter()
        .rev()
        .find(|s| is_answering(s.kind))
        .map(|s| s.position)
}

fn is_answering(kind: StepKind) -> bool {
    matches!(kind, StepKind::CombinedRsvp | StepKind::SingleEventRsvp(_))
}

/// Rebuild the answer map for an already-submitted party from its stored
/// responses, keeping the key set exactly the member ids.
fn recalled_answers(party: &Party) -> AnswerMap {
    party
        .members
        .iter()
        .map(|member| {
            let answer = party
                .responses
                .iter()
                .find(|r| r.member_id == member.id)
                .cloned()
                .unwrap_or_else(|| Answer::seeded_from(member));
            (member.id, answer)
        })
        .collect()
}
