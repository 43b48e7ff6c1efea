//! Glitch Transition Core - pipeline logic for the glitch-transition tool
//!
//! This crate contains all pipeline logic with zero CLI dependencies.
//! The flow is strictly linear: provision the RIFE model, extract the two
//! boundary frames, interpolate between them, assemble the frame sequence
//! into a raw clip, and apply the glitch bleach effect.

pub mod config;
pub mod interp;
pub mod media;
pub mod orchestrator;
pub mod provision;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
