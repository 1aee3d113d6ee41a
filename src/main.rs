use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::io::{AsyncBufReadExt, BufReader};

use guestlist::config::GuestlistConfig;
use guestlist::model::{Attendance, EventKind, MealChoice, MemberId, PartyId};
use guestlist::report;
use guestlist::search::{SearchEngine, SearchOutcome};
use guestlist::store::{InMemoryDirectory, PartyDirectory};
use guestlist::wizard::{StepPlanner, WizardController, WizardPhase};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = GuestlistConfig::from_env()?;

    let directory = Arc::new(InMemoryDirectory::new());
    if let Some(seed_path) = &config.seed_path {
        directory.load_seed(seed_path).await?;
        eprintln!(
            "   Seeded {} parties from {}",
            directory.len().await,
            seed_path.display()
        );
    }
    if directory.is_empty().await {
        tracing::warn!("party directory is empty; searches will find nothing");
    }

    let directory: Arc<dyn PartyDirectory> = directory;
    let engine = SearchEngine::new(Arc::clone(&directory));
    let mut wizard = WizardController::new(
        Arc::clone(&directory),
        StepPlanner::new(config.meal_policy),
    );

    eprintln!("Guestlist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Type a name to search for an invitation.");
    eprintln!(
        "   Commands: /pick N, /id <uuid>, /code XYZ123, /summary, /steps, /next, /back, /submit, /quit"
    );
    eprintln!("   Answers:  ceremony N yes|no, celebration N yes|no, meal N chicken|veal|beef, diet N <text>, note N <event> <text>\n");

    let mut last_results = Vec::new();
    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            eprint!("> ");
            continue;
        }
        if line == "/quit" {
            break;
        }
        if let Err(e) = handle_line(&line, &engine, &mut wizard, &directory, &mut last_results).await
        {
            println!("✗ {e}");
        }
        print_position(&wizard);
        eprint!("> ");
    }

    Ok(())
}

fn print_position(wizard: &WizardController) {
    let step = wizard.current_step();
    match wizard.phase() {
        WizardPhase::Searching => {}
        WizardPhase::Submitted => {}
        _ => println!(
            "— step {}/{}: {}{}",
            step.position,
            wizard.steps().len(),
            step.label,
            if step.complete { " (complete)" } else { "" }
        ),
    }
}

async fn handle_line(
    line: &str,
    engine: &SearchEngine,
    wizard: &mut WizardController,
    directory: &Arc<dyn PartyDirectory>,
    last_results: &mut Vec<guestlist::search::ScoredParty>,
) -> anyhow::Result<()> {
    let mut parts = line.splitn(3, ' ');
    let head = parts.next().unwrap_or_default();

    match head {
        "/summary" => {
            let summary = report::directory_summary(directory).await?;
            println!(
                "{} parties ({} submitted), {} members, ceremony {}, celebration {}, declined {}",
                summary.total_parties,
                summary.submitted_parties,
                summary.total_members,
                summary.ceremony_attending,
                summary.celebration_attending,
                summary.declined,
            );
            for (meal, count) in &summary.meal_counts {
                println!("   {meal}: {count}");
            }
        }
        "/steps" => {
            for step in wizard.steps() {
                println!(
                    "   {}. {}{}",
                    step.position,
                    step.label,
                    if step.complete { " ✓" } else { "" }
                );
            }
        }
        "/pick" => {
            let index: usize = parts.next().unwrap_or_default().parse()?;
            let picked = last_results
                .get(index.saturating_sub(1))
                .context("no such search result")?;
            wizard.select_party(picked.party.clone())?;
            print_party(wizard);
        }
        "/id" => {
            let raw = parts.next().context("usage: /id <uuid>")?;
            let id = PartyId(raw.parse().context("expected a party uuid")?);
            wizard.enter_by_id(id).await?;
            print_party(wizard);
        }
        "/code" => {
            let code = parts.next().context("usage: /code XYZ123")?;
            wizard.enter_by_confirmation_code(code).await?;
            print_party(wizard);
        }
        "/next" => wizard.advance()?,
        "/back" => wizard.retreat()?,
        "/submit" => {
            let code = wizard.submit().await?;
            println!("✓ RSVP submitted — confirmation code {code}");
        }
        "ceremony" | "celebration" => {
            let event = if head == "ceremony" {
                EventKind::Ceremony
            } else {
                EventKind::Celebration
            };
            let member = member_at(wizard, parts.next().unwrap_or_default())?;
            let decision = match parts.next().unwrap_or_default() {
                "yes" => Attendance::Yes,
                "no" => Attendance::No,
                other => bail!("expected yes or no, got '{other}'"),
            };
            wizard.set_attendance(member, event, decision)?;
        }
        "meal" => {
            let member = member_at(wizard, parts.next().unwrap_or_default())?;
            let meal = match parts.next().unwrap_or_default() {
                "chicken" => MealChoice::Chicken,
                "veal" => MealChoice::Veal,
                "beef" => MealChoice::Beef,
                other => bail!("unknown meal '{other}'"),
            };
            wizard.set_meal(member, meal)?;
        }
        "note" => {
            let member = member_at(wizard, parts.next().unwrap_or_default())?;
            let rest = parts.next().unwrap_or_default();
            let (event, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let event = match event {
                "ceremony" => EventKind::Ceremony,
                "celebration" => EventKind::Celebration,
                other => bail!("unknown event '{other}'"),
            };
            wizard.set_note(member, event, text)?;
        }
        "diet" => {
            let member = member_at(wizard, parts.next().unwrap_or_default())?;
            let notes = parts.next().unwrap_or_default();
            wizard.set_dietary_notes(member, notes)?;
        }
        _ if wizard.phase() == WizardPhase::Searching => {
            let ticket = engine.ticket();
            match engine.search(line, ticket).await? {
                SearchOutcome::Superseded => {}
                SearchOutcome::Results(results) => {
                    if results.is_empty() {
                        println!(
                            "No invitations found. Please check your spelling or try a different name."
                        );
                    }
                    for (i, result) in results.iter().enumerate() {
                        let names: Vec<String> = result
                            .party
                            .members
                            .iter()
                            .map(|m| format!("{} {}", m.first_name, m.last_name))
                            .collect();
                        println!(
                            "   {}. {} — {}",
                            i + 1,
                            result.party.label.as_deref().unwrap_or("(no label)"),
                            names.join(", ")
                        );
                    }
                    *last_results = results;
                }
            }
        }
        other => bail!("unknown command '{other}'"),
    }

    Ok(())
}

fn member_at(wizard: &WizardController, raw: &str) -> anyhow::Result<MemberId> {
    let index: usize = raw.parse::<usize>().context("expected a guest number")?;
    let party = wizard.party().context("no party selected")?;
    let member = party
        .members
        .get(index.saturating_sub(1))
        .context("no such member")?;
    Ok(member.id)
}

fn print_party(wizard: &WizardController) {
    if let Some(party) = wizard.party() {
        println!(
            "Selected: {} ({} guests)",
            party.label.as_deref().unwrap_or("(no label)"),
            party.members.len()
        );
        for (i, member) in party.members.iter().enumerate() {
            println!("   {}. {} {}", i + 1, member.first_name, member.last_name);
        }
        if let Some(code) = &party.confirmation_code {
            println!("Already submitted — confirmation code {code}");
        }
    }
}
