mod command;
mod helper;
mod logging;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use dialysis_application::{
    ConfirmationGate, DashboardStore, DeleteOutcome, MutationOutcome, SessionLifecycleUseCase,
};
use dialysis_core::clock::{Clock, SystemClock};
use dialysis_core::patient::PatientDraft;
use dialysis_infrastructure::{ConfigService, FixtureSet, load_fixtures};

use crate::command::{HELP, ReplCommand, parse_command};
use crate::helper::CliHelper;

/// Terminal dashboard for today's dialysis sessions.
#[derive(Parser, Debug)]
#[command(name = "dialysis-dashboard", version, about)]
struct Cli {
    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON fixture file seeding the in-memory services
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Start with the anomalies-only filter enabled
    #[arg(long)]
    anomalies_only: bool,
}

/// Asks on the terminal; anything but `y`/`yes` declines.
struct PromptConfirmation;

impl ConfirmationGate for PromptConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} {} ", prompt.bright_yellow(), "[y/N]".bright_black());
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ===== Configuration and logging =====
    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    };
    let config = config_service.get_config()?;
    let (_log_guard, log_dir) = logging::init(&config.logging)?;
    tracing::info!(
        "[Main] Starting dialysis dashboard (config: {:?})",
        config_service.path()
    );

    // ===== Services =====
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let fixtures = match cli.fixtures.as_ref().or(config.data.fixtures_path.as_ref()) {
        Some(path) => load_fixtures(path)?,
        None => FixtureSet::default(),
    };
    let (session_service, patient_service) = fixtures.into_services(clock.clone()).await;

    let store = DashboardStore::with_anomalies_only(cli.anomalies_only || config.display.anomalies_only);
    let usecase = SessionLifecycleUseCase::new(store, session_service, patient_service)
        .with_clock(clock);
    let time_format = config.display.time_format.clone();

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Dialysis Dashboard ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Type 'help' for commands. Logs: {}", log_dir.display()).bright_black()
    );
    println!();

    // A failed load is already reflected in the rendered view
    let _ = usecase.load_dashboard().await;
    print_dashboard(&usecase, &time_format).await;

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match parse_command(trimmed) {
                    Ok(ReplCommand::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(command) => execute(&usecase, command, &time_format).await,
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    tracing::info!("[Main] Dashboard closed");
    Ok(())
}

async fn execute(usecase: &SessionLifecycleUseCase, command: ReplCommand, time_format: &str) {
    match command {
        ReplCommand::List => print_dashboard(usecase, time_format).await,
        ReplCommand::Patients => {
            let pool = usecase.store().patient_pool().await;
            println!("{}", render::render_patients(&pool));
        }
        ReplCommand::Anomalies(on) => {
            usecase.set_anomalies_only(on).await;
            print_dashboard(usecase, time_format).await;
        }
        ReplCommand::Register { name } => {
            match usecase.register_patient(&PatientDraft::new(name)).await {
                Ok(outcome) => {
                    let patient = outcome.value();
                    println!(
                        "{}",
                        format!("Registered {} ({})", patient.name, patient.id).green()
                    );
                }
                Err(e) => eprintln!("{}", e.to_string().red()),
            }
        }
        ReplCommand::Add(draft) => match usecase.create_session(&draft).await {
            Ok(outcome) => {
                let session = outcome.value();
                println!(
                    "{}",
                    format!("Session {} created ({})", session.id, session.status()).green()
                );
                print_dashboard(usecase, time_format).await;
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        },
        ReplCommand::Complete { session_id } => match usecase.mark_completed(&session_id).await {
            Ok(outcome) => {
                report(&outcome, &format!("Session {} completed", session_id));
                print_dashboard(usecase, time_format).await;
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        },
        ReplCommand::Delete { session_id } => {
            match usecase.delete_session(&session_id, &PromptConfirmation).await {
                Ok(DeleteOutcome::Declined) => println!("{}", "Delete cancelled.".bright_black()),
                Ok(DeleteOutcome::Deleted(outcome)) => {
                    report(&outcome, &format!("Session {} deleted", session_id));
                    print_dashboard(usecase, time_format).await;
                }
                Err(e) => eprintln!("{}", e.to_string().red()),
            }
        }
        ReplCommand::Notes { session_id, text } => {
            match usecase.update_notes(&session_id, &text).await {
                Ok(_) => println!("{}", format!("Notes saved for {}", session_id).green()),
                Err(e) => eprintln!("{}", e.to_string().red()),
            }
        }
        ReplCommand::Reload => {
            if let Err(e) = usecase.reload_sessions().await {
                tracing::debug!("[Main] Reload failed: {}", e);
            }
            print_dashboard(usecase, time_format).await;
        }
        ReplCommand::Help => {
            for (usage, description) in HELP {
                println!("  {} {}", format!("{:<72}", usage).bright_cyan(), description);
            }
        }
        // Handled by the loop
        ReplCommand::Quit => {}
    }
}

/// Prints the success line, or a warning when only local state changed.
fn report<T>(outcome: &MutationOutcome<T>, success: &str) {
    match outcome.error() {
        None => println!("{}", success.green()),
        Some(error) => println!(
            "{}",
            format!(
                "{} locally, but the server did not confirm: {}",
                success, error
            )
            .yellow()
        ),
    }
}

async fn print_dashboard(usecase: &SessionLifecycleUseCase, time_format: &str) {
    let view = usecase.store().view().await;
    let filter = if usecase.store().anomalies_only().await {
        " (anomalies only)"
    } else {
        ""
    };
    println!("{}", format!("Today's sessions{}", filter).bold());
    println!("{}", render::render_view(&view, time_format));
}
