use clap::Parser;

use swarm_gpu::config::Args;
use swarm_gpu::gpu::balls::BallsDemo;
use swarm_gpu::gpu::framework;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let settings = Args::parse().resolve()?;
    framework::run::<BallsDemo>("balls", settings)
}
