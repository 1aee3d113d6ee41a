//! End-to-end RSVP flow: search the directory, select a party, answer the
//! planned steps, submit, and re-enter with the confirmation code.

use std::sync::Arc;

use guestlist::model::{
    Attendance, EventKind, InvitationFlags, MealChoice, Member, Party,
};
use guestlist::report;
use guestlist::search::{EXACT_PHRASE_THRESHOLD, SearchEngine, SearchOutcome};
use guestlist::store::{InMemoryDirectory, PartyDirectory};
use guestlist::wizard::{StepKind, StepPlanner, WizardController, WizardPhase};

fn seeded_directory() -> (Arc<InMemoryDirectory>, Party, Party) {
    let smiths = Party::new(
        Some("Smith Family".to_string()),
        vec![Member::new("John", "Smith"), Member::new("Jane", "Smith")],
        InvitationFlags::both(),
    );
    let doe = Party::new(
        None,
        vec![Member::new("John", "Doe")],
        InvitationFlags::only(EventKind::Ceremony),
    );
    let directory = Arc::new(InMemoryDirectory::new());
    (directory, smiths, doe)
}

async fn search_results(
    engine: &SearchEngine,
    query: &str,
) -> Vec<guestlist::search::ScoredParty> {
    let ticket = engine.ticket();
    match engine.search(query, ticket).await.unwrap() {
        SearchOutcome::Results(results) => results,
        SearchOutcome::Superseded => panic!("current ticket superseded"),
    }
}

#[tokio::test]
async fn search_select_answer_submit_and_reenter() {
    let (directory, smiths, doe) = seeded_directory();
    directory.insert_party(smiths.clone()).await;
    directory.insert_party(doe).await;

    let directory: Arc<dyn PartyDirectory> = directory;
    let engine = SearchEngine::new(Arc::clone(&directory));

    // An exact full-name query suppresses the weaker "John Doe" token hit.
    let results = search_results(&engine, "John Smith").await;
    assert_eq!(results.len(), 1);
    assert!(results[0].score >= EXACT_PHRASE_THRESHOLD);
    assert_eq!(results[0].party.id, smiths.id);

    let mut wizard =
        WizardController::new(Arc::clone(&directory), StepPlanner::default());
    wizard.select_party(results[0].party.clone()).unwrap();
    assert_eq!(wizard.phase(), WizardPhase::Answering);

    let john = smiths.members[0].id;
    let jane = smiths.members[1].id;

    // John attends both; Jane declines both.
    wizard
        .set_attendance(john, EventKind::Ceremony, Attendance::Yes)
        .unwrap();
    wizard
        .set_attendance(john, EventKind::Celebration, Attendance::Yes)
        .unwrap();
    wizard
        .set_attendance(jane, EventKind::Ceremony, Attendance::No)
        .unwrap();
    wizard
        .set_attendance(jane, EventKind::Celebration, Attendance::No)
        .unwrap();

    // John still owes a meal choice before the step completes.
    assert!(!wizard.can_advance());
    wizard.set_meal(john, MealChoice::Veal).unwrap();
    wizard.set_dietary_notes(john, "gluten free").unwrap();
    assert!(wizard.can_advance());

    wizard.advance().unwrap();
    assert_eq!(wizard.phase(), WizardPhase::Confirming);
    let code = wizard.submit().await.unwrap();
    assert_eq!(code.len(), 6);

    // The code resolves back to a read-only view of the same answers.
    let mut revisit =
        WizardController::new(Arc::clone(&directory), StepPlanner::default());
    revisit.enter_by_confirmation_code(&code).await.unwrap();
    assert_eq!(revisit.phase(), WizardPhase::Submitted);
    let recalled = &revisit.answers()[&john];
    assert_eq!(recalled.meal, Some(MealChoice::Veal));
    assert_eq!(recalled.dietary_notes.as_deref(), Some("gluten free"));
    assert!(
        revisit
            .set_attendance(john, EventKind::Ceremony, Attendance::No)
            .is_err()
    );

    // Organizer totals reflect the one submitted party.
    let summary = report::directory_summary(&directory).await.unwrap();
    assert_eq!(summary.total_parties, 2);
    assert_eq!(summary.submitted_parties, 1);
    assert_eq!(summary.ceremony_attending, 1);
    assert_eq!(summary.celebration_attending, 1);
    assert_eq!(summary.declined, 1);
    assert_eq!(summary.meal_counts[&MealChoice::Veal], 1);
}

#[tokio::test]
async fn ceremony_only_party_plans_a_single_event_step_with_meal() {
    let (directory, _, doe) = seeded_directory();
    let member_id = doe.members[0].id;
    directory.insert_party(doe.clone()).await;

    let directory: Arc<dyn PartyDirectory> = directory;
    let mut wizard =
        WizardController::new(Arc::clone(&directory), StepPlanner::default());
    wizard.select_party(doe).unwrap();

    let steps = wizard.steps();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[1].kind, StepKind::SingleEventRsvp(EventKind::Ceremony));

    // Default policy attaches a meal to the ceremony.
    wizard
        .set_attendance(member_id, EventKind::Ceremony, Attendance::Yes)
        .unwrap();
    assert!(!wizard.can_advance());
    wizard.set_meal(member_id, MealChoice::Chicken).unwrap();
    wizard.advance().unwrap();

    let code = wizard.submit().await.unwrap();
    let stored = directory
        .fetch_party_by_confirmation_code(&code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.responses.len(), 1);
    assert_eq!(stored.responses[0].meal, Some(MealChoice::Chicken));
}

#[tokio::test]
async fn newer_query_supersedes_the_older_one() {
    let (directory, smiths, _) = seeded_directory();
    directory.insert_party(smiths).await;

    let engine = SearchEngine::new(directory as Arc<dyn PartyDirectory>);
    let stale = engine.ticket();
    let current = engine.ticket();

    assert!(matches!(
        engine.search("smi", stale).await.unwrap(),
        SearchOutcome::Superseded
    ));
    assert!(matches!(
        engine.search("smith", current).await.unwrap(),
        SearchOutcome::Results(_)
    ));
}

#[tokio::test]
async fn retreating_out_of_the_wizard_discards_the_session() {
    let (directory, smiths, _) = seeded_directory();
    let member_id = smiths.members[0].id;
    directory.insert_party(smiths.clone()).await;

    let directory: Arc<dyn PartyDirectory> = directory;
    let engine = SearchEngine::new(Arc::clone(&directory));
    let mut wizard =
        WizardController::new(Arc::clone(&directory), StepPlanner::default());

    let results = search_results(&engine, "smith family").await;
    wizard.select_party(results[0].party.clone()).unwrap();
    wizard
        .set_attendance(member_id, EventKind::Ceremony, Attendance::Yes)
        .unwrap();

    wizard.retreat().unwrap();
    assert_eq!(wizard.phase(), WizardPhase::Searching);
    assert!(wizard.party().is_none());
    assert!(wizard.answers().is_empty());

    // A fresh selection starts from blank answers.
    let results = search_results(&engine, "smith family").await;
    wizard.select_party(results[0].party.clone()).unwrap();
    assert!(wizard.answers()[&member_id].ceremony_attendance.is_none());
}
