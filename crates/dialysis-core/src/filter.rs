//! Anomaly view filter.

use crate::session::Session;

/// Selects the sessions to display.
///
/// With `anomalies_only` unset every session is returned in order; otherwise
/// only sessions flagged anomalous, keeping their relative order.
pub fn filter_sessions(sessions: &[Session], anomalies_only: bool) -> Vec<&Session> {
    sessions
        .iter()
        .filter(|session| !anomalies_only || session.is_anomalous)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patient::Patient;
    use crate::session::fixtures::{anomalous, session};

    fn collection() -> Vec<Session> {
        let alice = Patient::new("p1", "Alice");
        let bob = Patient::new("p2", "Bob");
        vec![
            session("s1", &alice),
            anomalous("s2", &bob, "High systolic blood pressure"),
            session("s3", &bob),
            anomalous("s4", &alice, "Excess interdialytic weight gain"),
        ]
    }

    fn ids(sessions: &[&Session]) -> Vec<String> {
        sessions.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_flag_off_is_identity() {
        let all = collection();
        let shown = filter_sessions(&all, false);
        assert_eq!(ids(&shown), vec!["s1", "s2", "s3", "s4"]);
    }

    #[test]
    fn test_flag_on_keeps_exactly_anomalous() {
        let all = collection();
        let shown = filter_sessions(&all, true);

        assert!(shown.iter().all(|s| s.is_anomalous));
        let flagged = all.iter().filter(|s| s.is_anomalous).count();
        assert_eq!(shown.len(), flagged);
        assert_eq!(ids(&shown), vec!["s2", "s4"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let all = collection();
        let once: Vec<Session> = filter_sessions(&all, true).into_iter().cloned().collect();
        let twice = filter_sessions(&once, true);
        assert_eq!(twice.into_iter().cloned().collect::<Vec<_>>(), once);
    }

    #[test]
    fn test_empty_collection() {
        assert!(filter_sessions(&[], true).is_empty());
    }
}
