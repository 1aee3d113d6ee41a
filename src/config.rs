//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::model::MealMenu;
use crate::wizard::{MealPolicy, SingleEventMeal};

/// Top-level configuration for the RSVP core.
#[derive(Debug, Clone)]
pub struct GuestlistConfig {
    /// Meal policy fed to the step planner.
    pub meal_policy: MealPolicy,
    /// Optional JSON seed file for the in-memory directory.
    pub seed_path: Option<PathBuf>,
}

impl Default for GuestlistConfig {
    fn default() -> Self {
        Self {
            meal_policy: MealPolicy::default(),
            seed_path: None,
        }
    }
}

impl GuestlistConfig {
    /// Build configuration from environment variables.
    ///
    /// - `GUESTLIST_MEAL_MENU`: `chicken-veal` (default) or `chicken-beef`
    /// - `GUESTLIST_SINGLE_EVENT_MEAL`: `never`, `ceremony-only` (default),
    ///   `celebration-only`, or `always`
    /// - `GUESTLIST_SEED`: path to a JSON array of parties
    pub fn from_env() -> Result<Self, ConfigError> {
        let menu = match std::env::var("GUESTLIST_MEAL_MENU") {
            Ok(raw) => parse_menu(&raw)?,
            Err(_) => MealMenu::ChickenVeal,
        };

        let single_event_meal = match std::env::var("GUESTLIST_SINGLE_EVENT_MEAL") {
            Ok(raw) => parse_single_event_meal(&raw)?,
            Err(_) => SingleEventMeal::CeremonyOnly,
        };

        let seed_path = std::env::var("GUESTLIST_SEED").ok().map(PathBuf::from);

        Ok(Self {
            meal_policy: MealPolicy {
                menu,
                single_event_meal,
            },
            seed_path,
        })
    }
}

fn parse_menu(raw: &str) -> Result<MealMenu, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "chicken-veal" => Ok(MealMenu::ChickenVeal),
        "chicken-beef" => Ok(MealMenu::ChickenBeef),
        other => Err(ConfigError::InvalidValue {
            key: "GUESTLIST_MEAL_MENU".to_string(),
            message: format!("unknown menu '{other}' (expected chicken-veal or chicken-beef)"),
        }),
    }
}

fn parse_single_event_meal(raw: &str) -> Result<SingleEventMeal, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "never" => Ok(SingleEventMeal::Never),
        "ceremony-only" => Ok(SingleEventMeal::CeremonyOnly),
        "celebration-only" => Ok(SingleEventMeal::CelebrationOnly),
        "always" => Ok(SingleEventMeal::Always),
        other => Err(ConfigError::InvalidValue {
            key: "GUESTLIST_SINGLE_EVENT_MEAL".to_string(),
            message: format!(
                "unknown policy '{other}' (expected never, ceremony-only, celebration-only, or always)"
            ),
        }),
    }
}
