//! Modules layer - Infrastructure components for external integrations

pub mod google;
