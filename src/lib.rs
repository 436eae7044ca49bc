//! Collab onboarding — role-dependent profile setup wizard.

pub mod cli;
pub mod config;
pub mod error;
pub mod onboarding;
