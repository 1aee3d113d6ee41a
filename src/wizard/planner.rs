//! RSVP step planner.
//!
//! Recomputes the applicable wizard steps from the selected party's
//! invitation flags and the current answers. Steps are values, re-derived
//! on every query: identical inputs always produce the identical sequence.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerMap, EventKind, InvitationKind, MealMenu, Party};

/// Whether a single-event invitation gets a meal requirement attached to
/// its one RSVP step. The original form shipped three mutually
/// inconsistent revisions of this behavior, so it is policy, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingleEventMeal {
    Never,
    CeremonyOnly,
    CelebrationOnly,
    Always,
}

/// Meal policy fed to the planner: which menu is offered and when a meal
/// selection is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealPolicy {
    pub menu: MealMenu,
    pub single_event_meal: SingleEventMeal,
}

impl Default for MealPolicy {
    fn default() -> Self {
        Self {
            menu: MealMenu::ChickenVeal,
            single_event_meal: SingleEventMeal::CeremonyOnly,
        }
    }
}

impl MealPolicy {
    /// The event whose "yes" answer requires a meal choice, if any, for a
    /// given invitation kind. On combined invitations the ceremony governs.
    pub fn meal_governor(&self, kind: InvitationKind) -> Option<EventKind> {
        match kind {
            InvitationKind::BothEvents => Some(EventKind::Ceremony),
            InvitationKind::SingleEvent(event) => match (self.single_event_meal, event) {
                (SingleEventMeal::Never, _) => None,
                (SingleEventMeal::Always, e) => Some(e),
                (SingleEventMeal::CeremonyOnly, EventKind::Ceremony) => Some(EventKind::Ceremony),
                (SingleEventMeal::CelebrationOnly, EventKind::Celebration) => {
                    Some(EventKind::Celebration)
                }
                _ => None,
            },
            InvitationKind::NoEvents => None,
        }
    }
}

/// What one wizard step asks of the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    FindInvitation,
    /// Attendance for both events plus meal selection on one screen.
    CombinedRsvp,
    /// Attendance for the single invited event.
    SingleEventRsvp(EventKind),
    Confirmation,
}

/// One screen of the wizard. Ephemeral: derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    /// 1-based position in the current sequence.
    pub position: usize,
    pub kind: StepKind,
    pub label: &'static str,
    pub complete: bool,
}

/// Plans the step sequence for a party and its answers.
#[derive(Debug, Clone, Default)]
pub struct StepPlanner {
    pub policy: MealPolicy,
}

impl StepPlanner {
    pub fn new(policy: MealPolicy) -> Self {
        Self { policy }
    }

    /// Compute the ordered applicable steps. Pure function of its inputs.
    ///
    /// With no party selected the sequence collapses to the single find
    /// step. Otherwise the invitation kind decides the answering step, and
    /// a confirmation step (always complete, terminal) closes the list.
    pub fn plan(&self, party: Option<&Party>, answers: &AnswerMap) -> Vec<WizardStep> {
        let mut steps = vec![WizardStep {
            position: 1,
            kind: StepKind::FindInvitation,
            label: "Find Invitation",
            complete: party.is_some(),
        }];

        let Some(party) = party else {
            return steps;
        };

        let kind = party.flags.kind();
        match kind {
            InvitationKind::BothEvents => steps.push(WizardStep {
                position: steps.len() + 1,
                kind: StepKind::CombinedRsvp,
                label: "RSVP",
                complete: self.combined_complete(party, answers),
            }),
            InvitationKind::SingleEvent(event) => steps.push(WizardStep {
                position: steps.len() + 1,
                kind: StepKind::SingleEventRsvp(event),
                label: "RSVP",
                complete: self.single_event_complete(party, answers, event),
            }),
            InvitationKind::NoEvents => {}
        }

        steps.push(WizardStep {
            position: steps.len() + 1,
            kind: StepKind::Confirmation,
            label: "Confirmation",
            complete: true,
        });

        steps
    }

    /// Combined step: every member has decided both events, and every
    /// member whose governing decision is "yes" has picked a meal.
    fn combined_complete(&self, party: &Party, answers: &AnswerMap) -> bool {
        let governor = self.policy.meal_governor(InvitationKind::BothEvents);
        party.members.iter().all(|member| {
            let Some(answer) = answers.get(&member.id) else {
                return false;
            };
            let decided = answer.ceremony_attendance.is_some()
                && answer.celebration_attendance.is_some();
            decided && self.meal_satisfied(answer, governor)
        })
    }

    /// Single-event step: every member has decided the invited event; a
    /// meal is additionally required when the policy attaches one.
    fn single_event_complete(
        &self,
        party: &Party,
        answers: &AnswerMap,
        event: EventKind,
    ) -> bool {
        let governor = self
            .policy
            .meal_governor(InvitationKind::SingleEvent(event));
        party.members.iter().all(|member| {
            let Some(answer) = answers.get(&member.id) else {
                return false;
            };
            answer.attendance(event).is_some() && self.meal_satisfied(answer, governor)
        })
    }

    fn meal_satisfied(
        &self,
        answer: &crate::model::Answer,
        governor: Option<EventKind>,
    ) -> bool {
        match governor {
            Some(event) if answer.is_attending(event) => answer.meal.is_some(),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Attendance, InvitationFlags, MealChoice, Member, Party, seed_answers,
    };

    fn party_with(flags: InvitationFlags) -> Party {
        Party::new(
            Some("Smith Family".to_string()),
            vec![Member::new("John", "Smith")],
            flags,
        )
    }

    #[test]
    fn no_party_collapses_to_find_step() {
        let planner = StepPlanner::default();
        let steps = planner.plan(None, &AnswerMap::new());
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].kind, StepKind::FindInvitation);
        assert!(!steps[0].complete);
    }

    #[test]
    fn both_events_yields_combined_step() {
        let planner = StepPlanner::default();
        let party = party_with(InvitationFlags::both());
        let answers = seed_answers(&party);
        let steps = planner.plan(Some(&party), &answers);

        let kinds: Vec<StepKind> = steps.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::FindInvitation,
                StepKind::CombinedRsvp,
                StepKind::Confirmation
            ]
        );
        assert!(steps[0].complete);
        assert!(!steps[1].complete, "no decisions made yet");
        assert!(steps[2].complete, "confirmation is always complete");
    }

    #[test]
    fn positions_are_one_based_and_sequential() {
        let planner = StepPlanner::default();
        let party = party_with(InvitationFlags::only(EventKind::Celebration));
        let answers = seed_answers(&party);
        let steps = planner.plan(Some(&party), &answers);
        let positions: Vec<usize> = steps.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn no_events_skips_the_answering_step() {
        let planner = StepPlanner::default();
        let party = party_with(InvitationFlags {
            ceremony: false,
            celebration: false,
        });
        let answers = seed_answers(&party);
        let steps = planner.plan(Some(&party), &answers);
        let kinds: Vec<StepKind> = steps.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![StepKind::FindInvitation, StepKind::Confirmation]);
    }

    #[test]
    fn combined_step_gating_follows_the_meal_governor() {
        let planner = StepPlanner::default();
        let party = party_with(InvitationFlags::both());
        let mut answers = seed_answers(&party);
        let member_id = party.members[0].id;

        let combined_complete =
            |answers: &AnswerMap| planner.plan(Some(&party), answers)[1].complete;

        assert!(!combined_complete(&answers));

        // Ceremony yes alone: celebration undecided and meal missing.
        answers
            .get_mut(&member_id)
            .unwrap()
            .set_attendance(EventKind::Ceremony, Attendance::Yes);
        assert!(!combined_complete(&answers));

        // Both decided, but ceremony-yes still demands a meal.
        answers
            .get_mut(&member_id)
            .unwrap()
            .set_attendance(EventKind::Celebration, Attendance::No);
        assert!(!combined_complete(&answers));

        answers.get_mut(&member_id).unwrap().meal = Some(MealChoice::Chicken);
        assert!(combined_complete(&answers));

        // Ceremony no instead: the meal requirement evaporates.
        let mut declined = seed_answers(&party);
        let a = declined.get_mut(&member_id).unwrap();
        a.set_attendance(EventKind::Ceremony, Attendance::No);
        a.set_attendance(EventKind::Celebration, Attendance::Yes);
        assert!(combined_complete(&declined));
    }

    #[test]
    fn single_event_step_requires_only_that_decision_by_default_policy() {
        // Default policy attaches meals to ceremony only, so a
        // celebration-only invitation never asks for a meal.
        let planner = StepPlanner::default();
        let party = party_with(InvitationFlags::only(EventKind::Celebration));
        let mut answers = seed_answers(&party);
        let member_id = party.members[0].id;

        assert!(!planner.plan(Some(&party), &answers)[1].complete);

        answers
            .get_mut(&member_id)
            .unwrap()
            .set_attendance(EventKind::Celebration, Attendance::Yes);
        assert!(planner.plan(Some(&party), &answers)[1].complete);
    }

    #[test]
    fn single_event_meal_policy_attaches_meal_requirement() {
        let planner = StepPlanner::new(MealPolicy {
            menu: MealMenu::ChickenBeef,
            single_event_meal: SingleEventMeal::Always,
        });
        let party = party_with(InvitationFlags::only(EventKind::Celebration));
        let mut answers = seed_answers(&party);
        let member_id = party.members[0].id;

        answers
            .get_mut(&member_id)
            .unwrap()
            .set_attendance(EventKind::Celebration, Attendance::Yes);
        assert!(
            !planner.plan(Some(&party), &answers)[1].complete,
            "attending under Always policy requires a meal"
        );

        answers.get_mut(&member_id).unwrap().meal = Some(MealChoice::Beef);
        assert!(planner.plan(Some(&party), &answers)[1].complete);
    }

    #[test]
    fn meal_governor_matrix() {
        let policy = MealPolicy::default();
        assert_eq!(
            policy.meal_governor(InvitationKind::BothEvents),
            Some(EventKind::Ceremony)
        );
        assert_eq!(
            policy.meal_governor(InvitationKind::SingleEvent(EventKind::Ceremony)),
            Some(EventKind::Ceremony)
        );
        assert_eq!(
            policy.meal_governor(InvitationKind::SingleEvent(EventKind::Celebration)),
            None
        );
        assert_eq!(policy.meal_governor(InvitationKind::NoEvents), None);

        let never = MealPolicy {
            menu: MealMenu::ChickenVeal,
            single_event_meal: SingleEventMeal::Never,
        };
        assert_eq!(
            never.meal_governor(InvitationKind::SingleEvent(EventKind::Ceremony)),
            None
        );
    }

    #[test]
    fn plan_is_deterministic() {
        let planner = StepPlanner::default();
        let party = party_with(InvitationFlags::both());
        let answers = seed_answers(&party);
        let first = planner.plan(Some(&party), &answers);
        let second = planner.plan(Some(&party), &answers);
        assert_eq!(first, second);
    }
}
