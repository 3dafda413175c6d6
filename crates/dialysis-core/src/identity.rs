//! Patient identity merging.
//!
//! The patient pool offered when adding a session is built from two sources:
//! the registry (`PatientService::get_patients`) and the snapshots embedded in
//! today's sessions. Either may be incomplete; the registry can be unreachable
//! and sessions only know the patients that have one.

use std::collections::HashMap;

use crate::patient::Patient;
use crate::session::Session;

/// Merges registry patients with the patients embedded in `sessions`.
///
/// Identity is the only key. Session snapshots are applied first and registry
/// entries last, so on a collision the registry entry replaces the snapshot
/// wholesale. Each identity keeps the position where it was first seen.
/// Entries without an identity are skipped.
pub fn merge_patients(registry: &[Patient], sessions: &[Session]) -> Vec<Patient> {
    let embedded = sessions.iter().map(|session| &session.patient);
    merge_identities(embedded.chain(registry.iter()))
}

/// Last-write-wins de-duplication over any sequence of patients.
pub fn merge_identities<'a, I>(patients: I) -> Vec<Patient>
where
    I: IntoIterator<Item = &'a Patient>,
{
    let mut merged: Vec<Patient> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for patient in patients {
        if patient.id.is_empty() {
            tracing::debug!("[IdentityMerger] Skipping patient without identity: {}", patient.name);
            continue;
        }
        match positions.get(patient.id.as_str()) {
            Some(&index) => merged[index] = patient.clone(),
            None => {
                positions.insert(patient.id.as_str(), merged.len());
                merged.push(patient.clone());
            }
        }
    }

    merged
}
