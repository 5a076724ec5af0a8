//! Unit tests for the installation flow.
