//! Render composition.
//!
//! Scenes describe what they want drawn with a [`Render`]; the driver sorts
//! the pieces into pipeline batches and issues the draw calls. Scenes never
//! touch the render pass themselves, and the buffers they hand out are only
//! borrowed for the frame.

/// Indexed geometry drawn with one `draw_indexed` call.
///
/// `amount` is the number of `u16` indices to draw (three per triangle).
#[derive(Clone, Copy, Debug)]
pub struct Flat<'a> {
    pub vertex: &'a wgpu::Buffer,
    pub index: &'a wgpu::Buffer,
    pub amount: usize,
}

/// Specifies how a scene should be rendered this frame.
///
/// - `None` renders nothing
/// - `Terrain(Flat)` renders a terrain mesh with the terrain pipeline
/// - `Composed(Vec<Render>)` recursively renders several of the above
pub enum Render<'a> {
    None,
    Terrain(Flat<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Flatten `self` into the per-pipeline batches.
    pub(crate) fn collect(self, terrain: &mut Vec<Flat<'a>>) {
        match self {
            Render::Terrain(flat) => terrain.push(flat),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect(terrain)),
            Render::None => (),
        }
    }
}
