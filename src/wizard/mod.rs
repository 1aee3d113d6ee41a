//! RSVP wizard: step planning and the session state machine.

pub mod controller;
pub mod planner;

pub use controller::{WizardController, WizardPhase, WizardState};
pub use planner::{MealPolicy, SingleEventMeal, StepKind, StepPlanner, WizardStep};
