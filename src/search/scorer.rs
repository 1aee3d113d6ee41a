//! Relevance scoring for party candidates.
//!
//! Scores are additive integers built from three layers: a full-phrase
//! bonus, per-token credits against the label and the member-name group,
//! and a multi-token bonus. A candidate matches iff its score is nonzero.

use std::collections::HashSet;

use crate::model::Party;
use crate::search::tokenizer::tokenize;

// Full-phrase bonuses.
const LABEL_PHRASE_EXACT: u32 = 200;
const LABEL_PHRASE_CONTAINS: u32 = 150;
const MEMBER_PHRASE_EXACT: u32 = 180;
const MEMBER_PHRASE_CONTAINS: u32 = 120;

// Per-token credits. Each distinct token is credited at most once against
// the label and at most once against the member-name group, so repeated
// tokens or many members sharing a name cannot inflate the score.
const LABEL_TOKEN_EXACT: u32 = 100;
const LABEL_TOKEN_PREFIX: u32 = 50;
const LABEL_TOKEN_CONTAINS: u32 = 25;
const MEMBER_TOKEN_EXACT: u32 = 80;
const MEMBER_TOKEN_PREFIX: u32 = 40;
const MEMBER_TOKEN_COMPONENT: u32 = 60;
const MEMBER_TOKEN_CONTAINS: u32 = 15;

const MULTI_TOKEN_BONUS: u32 = 10;

/// Scores at or above this come from an exact full-phrase match; the engine
/// suppresses weaker partial matches whenever one is present.
pub const EXACT_PHRASE_THRESHOLD: u32 = 180;

/// Score one candidate party against a free-text query.
///
/// Returns 0 when nothing in the party matches. The query is trimmed and
/// lowercased internally; callers pass the raw user input.
pub fn score(query: &str, party: &Party) -> u32 {
    let normalized_query = query.trim().to_lowercase();
    if normalized_query.is_empty() {
        return 0;
    }
    let query_tokens = tokenize(&normalized_query);

    let label = party.label_lower();
    let member_names: Vec<(String, String, String)> = party
        .members
        .iter()
        .map(|m| {
            (
                m.full_name_lower(),
                m.first_name.to_lowercase(),
                m.last_name.to_lowercase(),
            )
        })
        .collect();

    let mut total = 0u32;

    // Full-phrase bonus, once per candidate.
    if !label.is_empty() && label.contains(&normalized_query) {
        total += if label == normalized_query {
            LABEL_PHRASE_EXACT
        } else {
            LABEL_PHRASE_CONTAINS
        };
    }
    for (full, _, _) in &member_names {
        if full.contains(&normalized_query) {
            total += if full == &normalized_query {
                MEMBER_PHRASE_EXACT
            } else {
                MEMBER_PHRASE_CONTAINS
            };
        }
    }

    // Per-token credits over distinct tokens only.
    let mut seen: HashSet<&str> = HashSet::new();
    let mut matched_tokens = 0u32;
    for token in &query_tokens {
        if !seen.insert(token.as_str()) {
            continue;
        }
        let label_credit = label_token_credit(&label, token);
        let member_credit = member_token_credit(&member_names, token);
        if label_credit > 0 || member_credit > 0 {
            matched_tokens += 1;
        }
        total += label_credit + member_credit;
    }

    // Multi-token bonus for queries where several distinct tokens hit.
    if matched_tokens > 1 {
        total += MULTI_TOKEN_BONUS * matched_tokens;
    }

    total
}

fn label_token_credit(label: &str, token: &str) -> u32 {
    if label.is_empty() {
        return 0;
    }
    if label == token {
        LABEL_TOKEN_EXACT
    } else if label.starts_with(token) {
        LABEL_TOKEN_PREFIX
    } else if label.contains(token) {
        LABEL_TOKEN_CONTAINS
    } else {
        0
    }
}

/// Credit a token against the member-name group: only the first member name
/// (in party order) containing the token counts.
fn member_token_credit(member_names: &[(String, String, String)], token: &str) -> u32 {
    for (full, first, last) in member_names {
        if !full.contains(token) {
            continue;
        }
        return if full == token {
            MEMBER_TOKEN_EXACT
        } else if full.starts_with(token) {
            MEMBER_TOKEN_PREFIX
        } else if first == token || last == token {
            MEMBER_TOKEN_COMPONENT
        } else {
            MEMBER_TOKEN_CONTAINS
        };
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InvitationFlags, Member, Party};

    fn party(label: Option<&str>, names: &[(&str, &str)]) -> Party {
        Party::new(
            label.map(|l| l.to_string()),
            names.iter().map(|(f, l)| Member::new(*f, *l)).collect(),
            InvitationFlags::both(),
        )
    }

    #[test]
    fn empty_query_scores_zero() {
        let p = party(Some("Smith Family"), &[("John", "Smith")]);
        assert_eq!(score("", &p), 0);
        assert_eq!(score("   ", &p), 0);
    }

    #[test]
    fn no_overlap_scores_zero() {
        let p = party(Some("Smith Family"), &[("John", "Smith")]);
        assert_eq!(score("garcia", &p), 0);
    }

    #[test]
    fn exact_label_phrase() {
        let p = party(Some("Smith Family"), &[("John", "Smith")]);
        // Label phrase exact (200); token "smith": label prefix (50) +
        // member last-name component (60); token "family": label contains
        // (25); two distinct tokens matched (+20).
        assert_eq!(score("Smith Family", &p), 200 + 50 + 60 + 25 + 20);
    }

    #[test]
    fn exact_member_phrase_clears_threshold() {
        let p = party(Some("Smith Family"), &[("John", "Smith")]);
        let s = score("John Smith", &p);
        assert!(s >= EXACT_PHRASE_THRESHOLD, "score {s}");
        // Member phrase exact (180); token "john": member prefix (40);
        // token "smith": label prefix (50) + member component (60);
        // multi-token bonus (20).
        assert_eq!(s, 180 + 40 + 50 + 60 + 20);
    }

    #[test]
    fn single_token_query_also_earns_phrase_containment() {
        let p = party(Some("The Smith Family"), &[("John", "Smith")]);
        // Label phrase contains (150) + member phrase contains (120) +
        // token "smith": label contains (25) + member component (60).
        assert_eq!(score("smith", &p), 150 + 120 + 25 + 60);
    }

    #[test]
    fn token_prefix_on_member_name() {
        let p = party(None, &[("John", "Doe")]);
        // "jo" is a substring of "john doe" (phrase contains, 120) and a
        // prefix of the full name (40).
        assert_eq!(score("jo", &p), MEMBER_PHRASE_CONTAINS + MEMBER_TOKEN_PREFIX);
    }

    #[test]
    fn repeated_tokens_credited_once() {
        let p = party(None, &[("John", "Smith")]);
        // "smith": phrase contains (120) + component (60).
        assert_eq!(score("smith", &p), 120 + 60);
        // "smith smith": the doubled phrase is no longer a substring, and
        // the duplicate token earns nothing extra.
        assert_eq!(score("smith smith", &p), 60);
    }

    #[test]
    fn only_first_matching_member_credits_a_token() {
        let one = party(None, &[("John", "Smith")]);
        let many = party(
            None,
            &[("John", "Smith"), ("Jane", "Smith"), ("Jim", "Smith")],
        );
        // Phrase containment sums across members, token credit does not.
        let phrase = |p: &Party| p.members.len() as u32 * MEMBER_PHRASE_CONTAINS;
        assert_eq!(score("smith", &one) - phrase(&one), MEMBER_TOKEN_COMPONENT);
        assert_eq!(score("smith", &many) - phrase(&many), MEMBER_TOKEN_COMPONENT);
    }

    #[test]
    fn multi_token_bonus_requires_two_distinct_hits() {
        let p = party(None, &[("John", "Smith")]);
        // "john" is a prefix of "john smith" (40); "garcia" misses; only
        // one token matched, no bonus.
        assert_eq!(score("john garcia", &p), MEMBER_TOKEN_PREFIX);
        // Three tokens, two hits: prefix (40) + component (60) + bonus (20).
        assert_eq!(score("john smith stranger", &p), 40 + 60 + 20);
    }

    #[test]
    fn empty_label_earns_no_label_credit() {
        let p = party(None, &[("John", "Doe")]);
        assert_eq!(
            score("doe", &p),
            MEMBER_PHRASE_CONTAINS + MEMBER_TOKEN_COMPONENT
        );
    }
}
