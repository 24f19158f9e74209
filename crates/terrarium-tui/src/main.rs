//! Terrarium entry point.
//!
//! Builds a 10x10 world, populates it, advances one turn, prints the board,
//! then hands the world to the interactive terminal UI.

mod app;

use anyhow::Result;
use terrarium_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so they do not fight the UI for stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut world = World::new(10, 10);
    world.populate();
    world.simulate();
    world.print_world();

    info!(turn = world.turn(), organisms = world.organism_count(), "entering UI");
    app::run(world)?;

    Ok(())
}
