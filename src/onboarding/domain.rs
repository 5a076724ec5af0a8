//! Onboarding flows whose completion is remembered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An onboarding flow the user can dismiss once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingFlag {
    /// First-run welcome tour.
    Welcome,
    /// Introduction to profiles.
    Profiles,
    /// Introduction to hosts and bindings.
    Hosts,
    /// Introduction to the installation assistant.
    Chat,
}

impl OnboardingFlag {
    /// Every flag, in display order.
    pub const ALL: [Self; 4] = [Self::Welcome, Self::Profiles, Self::Hosts, Self::Chat];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Profiles => "profiles",
            Self::Hosts => "hosts",
            Self::Chat => "chat",
        }
    }

    /// Returns the storage key under `prefix`.
    #[must_use]
    pub fn storage_key(self, prefix: &str) -> String {
        format!("{prefix}{}_seen", self.as_str())
    }
}

impl fmt::Display for OnboardingFlag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
