//! Operator confirmation gate.

/// A yes/no question put to the operator before a destructive action.
pub trait ConfirmationGate: Send + Sync {
    /// Returns `true` only if the operator explicitly agreed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmationGate for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
