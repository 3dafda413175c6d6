//! Plain-text rendering of the dashboard.
//!
//! Functions here return strings so the REPL decides on color and output
//! stream.

use chrono::{DateTime, Local, Utc};
use dialysis_core::patient::Patient;
use dialysis_core::session::{Session, SessionActions};
use dialysis_core::state::DashboardView;

pub const EMPTY_VIEW_MESSAGE: &str = "No sessions match your current view.";
const UNKNOWN_PATIENT: &str = "Unknown Patient";
const NO_NOTES: &str = "No notes recorded yet.";

/// Renders the whole dashboard view.
pub fn render_view(view: &DashboardView, time_format: &str) -> String {
    match view {
        DashboardView::Loading => "Loading sessions...".to_string(),
        DashboardView::Failed(message) => message.clone(),
        DashboardView::Ready(sessions) if sessions.is_empty() => EMPTY_VIEW_MESSAGE.to_string(),
        DashboardView::Ready(sessions) => sessions
            .iter()
            .map(|session| render_session(session, time_format))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// Renders one session card.
pub fn render_session(session: &Session, time_format: &str) -> String {
    let name = if session.patient.name.trim().is_empty() {
        UNKNOWN_PATIENT
    } else {
        session.patient.name.as_str()
    };

    let mut lines = vec![
        format!("[{}] {}  ({})", session.status(), name, session.id),
        format!(
            "  Machine {}  Start {}  End {}",
            session.machine_id,
            format_time(session.start_time, time_format),
            format_time(session.end_time, time_format)
        ),
        format!(
            "  Pre-weight {} kg  Post-weight {}",
            session.pre_weight,
            session
                .post_weight
                .map(|w| format!("{} kg", w))
                .unwrap_or_else(|| "-".to_string())
        ),
        format!(
            "  BP {}/{}  HR {} bpm",
            session.vitals.systolic_bp, session.vitals.diastolic_bp, session.vitals.heart_rate
        ),
        format!(
            "  Notes: {}",
            session
                .nurse_notes
                .as_deref()
                .filter(|notes| !notes.trim().is_empty())
                .unwrap_or(NO_NOTES)
        ),
    ];

    if session.is_anomalous {
        lines.push("  SYSTEM WARNINGS".to_string());
        lines.extend(session.anomalies.iter().map(|a| format!("    ! {}", a)));
    }

    let actions = render_actions(&SessionActions::for_session(session));
    if !actions.is_empty() {
        lines.push(format!("  Actions: {}", actions));
    }

    lines.join("\n")
}

fn render_actions(actions: &SessionActions) -> String {
    let mut names = Vec::new();
    if actions.mark_completed {
        names.push("complete");
    }
    if actions.edit_notes {
        names.push("notes");
    }
    if actions.delete {
        names.push("delete");
    }
    names.join(", ")
}

/// Renders the patient pool, one `id  name` line per patient.
pub fn render_patients(patients: &[Patient]) -> String {
    if patients.is_empty() {
        return "No patients known. Use 'register <name>' to add one.".to_string();
    }
    patients
        .iter()
        .map(|p| format!("{}  {}", p.id, p.name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_time(time: Option<DateTime<Utc>>, time_format: &str) -> String {
    time.map(|t| t.with_timezone(&Local).format(time_format).to_string())
        .unwrap_or_else(|| "-".to_string())
}
