use anyhow::Context as _;
use simple_terrain::{
    config::DemoConfig,
    flow::{self, FlowConstructor, GraphicsFlow},
    scene::TerrainScene,
    terrain::TerrainConfig,
};

fn main() -> anyhow::Result<()> {
    let terrain = TerrainConfig::default();
    terrain
        .validate()
        .context("Terrain configuration rejected")?;

    let scene: FlowConstructor<()> = Box::new(move |init| {
        Box::pin(async move {
            let scene: Box<dyn GraphicsFlow<()>> = Box::new(TerrainScene::new(&init, terrain));
            anyhow::Ok(scene)
        })
    });

    flow::run(DemoConfig::default(), vec![scene])
}
