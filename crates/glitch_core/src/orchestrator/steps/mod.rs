//! The five transition pipeline stages.

mod assemble;
mod effect;
mod extract;
mod interpolate;
mod provision;

pub use assemble::{AssembleClipStep, TRANSITION_FRAME_RATE};
pub use effect::{ApplyEffectStep, GLITCH_BLEACH_FILTERS};
pub use extract::ExtractFramesStep;
pub use interpolate::InterpolateStep;
pub use provision::ProvisionModelStep;
