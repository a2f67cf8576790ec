use clap::Parser;

use swarm_gpu::config::Args;
use swarm_gpu::gpu::framework;
use swarm_gpu::gpu::points::PointsDemo;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let settings = Args::parse().resolve()?;
    framework::run::<PointsDemo>("points", settings)
}
