//! Domain model: parties, members, and per-member RSVP answers.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Party identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(pub Uuid);

impl PartyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PartyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Member identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One invited individual belonging to a party. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Member {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
        }
    }

    /// Lowercase `"first last"` string used by the relevance scorer.
    pub fn full_name_lower(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).to_lowercase()
    }
}

/// The two independently-invitable sub-events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Ceremony,
    Celebration,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ceremony => write!(f, "ceremony"),
            Self::Celebration => write!(f, "celebration"),
        }
    }
}

/// A party's invitation eligibility flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationFlags {
    pub ceremony: bool,
    pub celebration: bool,
}

impl InvitationFlags {
    pub fn both() -> Self {
        Self {
            ceremony: true,
            celebration: true,
        }
    }

    pub fn only(event: EventKind) -> Self {
        Self {
            ceremony: event == EventKind::Ceremony,
            celebration: event == EventKind::Celebration,
        }
    }

    pub fn invited_to(&self, event: EventKind) -> bool {
        match event {
            EventKind::Ceremony => self.ceremony,
            EventKind::Celebration => self.celebration,
        }
    }

    /// Collapse the boolean pair into a tagged variant so the planner can
    /// branch once instead of scattering flag conditionals.
    pub fn kind(&self) -> InvitationKind {
        match (self.ceremony, self.celebration) {
            (true, true) => InvitationKind::BothEvents,
            (true, false) => InvitationKind::SingleEvent(EventKind::Ceremony),
            (false, true) => InvitationKind::SingleEvent(EventKind::Celebration),
            (false, false) => InvitationKind::NoEvents,
        }
    }
}

/// Which combination of events a party is invited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationKind {
    BothEvents,
    SingleEvent(EventKind),
    NoEvents,
}

/// An invited group sharing one invitation record.
///
/// Created externally by an organizer; read-only to the core except for the
/// submission fields, which the directory merge-writes at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub members: Vec<Member>,
    #[serde(flatten)]
    pub flags: InvitationFlags,
    /// Present only after a completed submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_code: Option<String>,
    /// RSVP responses captured at submission time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Party {
    pub fn new(label: Option<String>, members: Vec<Member>, flags: InvitationFlags) -> Self {
        Self {
            id: PartyId::new(),
            label,
            members,
            flags,
            confirmation_code: None,
            responses: Vec::new(),
            submitted_at: None,
        }
    }

    /// Lowercase label, empty string if absent.
    pub fn label_lower(&self) -> String {
        self.label.as_deref().unwrap_or("").to_lowercase()
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn has_submitted(&self) -> bool {
        self.confirmation_code.is_some()
    }
}

/// Attendance decision. Tri-state in practice: an unanswered decision is
/// `None` at the `Answer` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Yes,
    No,
}

impl Attendance {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Meal choice. The offered pair depends on the configured menu; the type
/// covers the union so stored submissions from either menu deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealChoice {
    Chicken,
    Veal,
    Beef,
}

impl fmt::Display for MealChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chicken => write!(f, "chicken"),
            Self::Veal => write!(f, "veal"),
            Self::Beef => write!(f, "beef"),
        }
    }
}

/// The two-option meal enumeration offered to guests. The directory has
/// carried both pairings at different times, so the active menu is a policy
/// parameter rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MealMenu {
    ChickenVeal,
    ChickenBeef,
}

impl MealMenu {
    pub fn options(&self) -> [MealChoice; 2] {
        match self {
            Self::ChickenVeal => [MealChoice::Chicken, MealChoice::Veal],
            Self::ChickenBeef => [MealChoice::Chicken, MealChoice::Beef],
        }
    }

    pub fn offers(&self, choice: MealChoice) -> bool {
        self.options().contains(&choice)
    }
}

/// A member's RSVP responses for one party's invitation.
///
/// Seeded with identity fields when a party is selected, decisions unset;
/// mutated only through the wizard's input handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub member_id: MemberId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceremony_attendance: Option<Attendance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celebration_attendance: Option<Attendance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal: Option<MealChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceremony_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celebration_note: Option<String>,
}

impl Answer {
    /// Fresh answer for a member: identity copied, all decisions unset.
    pub fn seeded_from(member: &Member) -> Self {
        Self {
            member_id: member.id,
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            email: member.email.clone(),
            ceremony_attendance: None,
            celebration_attendance: None,
            meal: None,
            dietary_notes: None,
            ceremony_note: None,
            celebration_note: None,
        }
    }

    pub fn attendance(&self, event: EventKind) -> Option<Attendance> {
        match event {
            EventKind::Ceremony => self.ceremony_attendance,
            EventKind::Celebration => self.celebration_attendance,
        }
    }

    pub fn set_attendance(&mut self, event: EventKind, decision: Attendance) {
        match event {
            EventKind::Ceremony => self.ceremony_attendance = Some(decision),
            EventKind::Celebration => self.celebration_attendance = Some(decision),
        }
    }

    pub fn is_attending(&self, event: EventKind) -> bool {
        self.attendance(event).is_some_and(|d| d.is_yes())
    }
}

/// Per-member answers for the currently selected party, keyed by member id.
///
/// The key set is always exactly the selected party's member ids: seeded
/// wholesale on select, cleared wholesale on reset, never partially keyed.
pub type AnswerMap = BTreeMap<MemberId, Answer>;

/// Seed one answer per member of `party`.
pub fn seed_answers(party: &Party) -> AnswerMap {
    party
        .members
        .iter()
        .map(|m| (m.id, Answer::seeded_from(m)))
        .collect()
}
