//! Render pipelines owned by the [`Context`](crate::context::Context).
//!
//! Pipelines are built once when the context is created and reused every
//! frame.

pub mod terrain;

#[derive(Debug)]
pub struct Pipelines {
    pub terrain: wgpu::RenderPipeline,
}
