//! REPL command parsing.

use dialysis_core::error::{DashboardError, Result};
use dialysis_core::session::SessionDraft;

/// Command words offered for completion and hints.
pub const COMMAND_WORDS: &[&str] = &[
    "list", "patients", "anomalies", "register", "add", "complete", "delete", "notes", "reload",
    "help", "quit",
];

pub const HELP: &[(&str, &str)] = &[
    ("list", "Show today's sessions"),
    ("patients", "Show the patients available for new sessions"),
    ("anomalies on|off", "Only show sessions with anomalies"),
    ("register <name>", "Register a new patient"),
    (
        "add <patient> <machine> <pre_weight> <sys> <dia> <hr> [--now] [notes...]",
        "Add a session; --now starts it immediately",
    ),
    ("complete <session>", "Mark an in-progress session completed"),
    ("delete <session>", "Delete a session (asks for confirmation)"),
    ("notes <session> [text...]", "Replace nurse notes; no text clears them"),
    ("reload", "Reload today's sessions"),
    ("quit", "Exit"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    List,
    Patients,
    Anomalies(bool),
    Register { name: String },
    Add(SessionDraft),
    Complete { session_id: String },
    Delete { session_id: String },
    Notes { session_id: String, text: String },
    Reload,
    Help,
    Quit,
}

/// Parses one input line.
///
/// # Errors
///
/// Returns a validation error carrying the usage text for unknown commands or
/// missing arguments.
pub fn parse_command(line: &str) -> Result<ReplCommand> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Err(DashboardError::validation("Empty command"));
    };
    let args: Vec<&str> = words.collect();

    match command.to_ascii_lowercase().as_str() {
        "list" | "ls" => Ok(ReplCommand::List),
        "patients" => Ok(ReplCommand::Patients),
        "anomalies" => match args.as_slice() {
            ["on"] => Ok(ReplCommand::Anomalies(true)),
            ["off"] => Ok(ReplCommand::Anomalies(false)),
            _ => Err(usage("anomalies on|off")),
        },
        "register" => {
            if args.is_empty() {
                return Err(usage("register <name>"));
            }
            Ok(ReplCommand::Register {
                name: args.join(" "),
            })
        }
        "add" => parse_add(&args),
        "complete" => single_id(&args, "complete <session>")
            .map(|session_id| ReplCommand::Complete { session_id }),
        "delete" | "rm" => {
            single_id(&args, "delete <session>").map(|session_id| ReplCommand::Delete { session_id })
        }
        "notes" => match args.split_first() {
            Some((session_id, text)) => Ok(ReplCommand::Notes {
                session_id: session_id.to_string(),
                text: text.join(" "),
            }),
            None => Err(usage("notes <session> [text...]")),
        },
        "reload" => Ok(ReplCommand::Reload),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" => Ok(ReplCommand::Quit),
        other => Err(DashboardError::validation(format!(
            "Unknown command '{}'. Type 'help' for a list of commands.",
            other
        ))),
    }
}

fn usage(text: &str) -> DashboardError {
    DashboardError::validation(format!("Usage: {}", text))
}

fn single_id(args: &[&str], usage_text: &str) -> Result<String> {
    match args {
        [id] => Ok(id.to_string()),
        _ => Err(usage(usage_text)),
    }
}

fn parse_add(args: &[&str]) -> Result<ReplCommand> {
    const USAGE: &str = "add <patient> <machine> <pre_weight> <sys> <dia> <hr> [--now] [notes...]";

    let [patient, machine, pre_weight, systolic, diastolic, heart_rate, rest @ ..] = args else {
        return Err(usage(USAGE));
    };

    let is_starting_now = rest.contains(&"--now");
    let notes: Vec<&str> = rest.iter().copied().filter(|word| *word != "--now").collect();

    Ok(ReplCommand::Add(SessionDraft {
        patient_id: patient.to_string(),
        machine_id: machine.to_string(),
        pre_weight: pre_weight.to_string(),
        systolic_bp: systolic.to_string(),
        diastolic_bp: diastolic.to_string(),
        heart_rate: heart_rate.to_string(),
        nurse_notes: (!notes.is_empty()).then(|| notes.join(" ")),
        is_starting_now,
    }))
}
