//! The whole population: a flat array of independent particles.

use rayon::prelude::*;
use ultraviolet::Vec2;

use super::particle::{ Particle, Pull };

/// Tuning shared by every particle.
#[derive(Clone, Copy, Debug)]
pub struct SimParams {
    /// Velocity kept per frame (1.0 means no decay).
    pub friction: f32,
    /// Cursor force radius in pixels.
    pub pull_distance: f32,
    /// Velocity kick for particles inside that radius.
    pub pull_strength: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            friction: 0.99,
            pull_distance: 400.0,
            pull_strength: 1.0,
        }
    }
}

/// A fixed-size swarm bounded by the window rectangle. Particles never
/// interact with each other, so the per-frame loops come in a serial and a
/// rayon flavor with identical results.
pub struct Swarm {
    particles: Vec<Particle>,
    bounds: Vec2,
    params: SimParams,
}

impl Swarm {
    pub fn new(count: usize, bounds: Vec2, params: SimParams) -> Self {
        let mut swarm = Self {
            particles: vec![Particle::at_rest(Vec2::zero()); count],
            bounds,
            params,
        };
        swarm.scatter();
        swarm
    }

    /// Drop every particle on a fresh random spot, at rest, one pixel in
    /// from the edges.
    pub fn scatter(&mut self) {
        let span = (self.bounds - Vec2::new(2.0, 2.0)).max_by_component(Vec2::zero());
        for particle in &mut self.particles {
            let pos = Vec2::new(
                1.0 + fastrand::f32() * span.x,
                1.0 + fastrand::f32() * span.y,
            );
            *particle = Particle::at_rest(pos);
        }
    }

    /// Follow the window; the next step clamps everything into the new
    /// rectangle.
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    /// Apply the cursor force to the whole swarm.
    pub fn pull(&mut self, cursor: Vec2, direction: Pull) {
        let SimParams { pull_distance, pull_strength, .. } = self.params;
        for particle in &mut self.particles {
            particle.pull(cursor, pull_distance, pull_strength, direction);
        }
    }

    /// Rayon flavor of [`Self::pull`] for large populations.
    pub fn par_pull(&mut self, cursor: Vec2, direction: Pull) {
        let SimParams { pull_distance, pull_strength, .. } = self.params;
        self.particles.par_iter_mut().for_each(|particle| {
            particle.pull(cursor, pull_distance, pull_strength, direction);
        });
    }

    /// Advance the whole swarm one frame.
    pub fn step(&mut self) {
        let (bounds, friction) = (self.bounds, self.params.friction);
        for particle in &mut self.particles {
            particle.integrate(bounds, friction);
        }
    }

    /// Rayon flavor of [`Self::step`] for large populations.
    pub fn par_step(&mut self) {
        let (bounds, friction) = (self.bounds, self.params.friction);
        self.particles.par_iter_mut().for_each(|particle| {
            particle.integrate(bounds, friction);
        });
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
