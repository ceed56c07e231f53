//! Session marker model.

use serde::{Deserialize, Serialize};

/// Minimal record of the logged-in identity.
///
/// No password or token is ever stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
}

impl Session {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// A stored marker is only usable when it names someone.
    pub fn is_valid(&self) -> bool {
        !self.email.trim().is_empty()
    }
}
