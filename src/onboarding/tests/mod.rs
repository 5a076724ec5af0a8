//! Unit tests for onboarding flag persistence.
