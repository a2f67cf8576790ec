pub mod particle;
pub mod swarm;
