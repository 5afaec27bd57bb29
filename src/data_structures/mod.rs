//! GPU-side data owned by the engine.
//!
//! - `texture` wraps depth targets used by the main render pass

pub mod texture;
