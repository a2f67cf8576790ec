//! A single point mass and the per-frame maths applied to it.

use bytemuck::{ AnyBitPattern, NoUninit };
use palette::{ FromColor, Hsv, Srgb };
use ultraviolet::{ Vec2, Vec3 };

/// Fraction of the velocity a particle travels per frame.
const HALF_STEP: f32 = 0.5;

/// Speed at which the hue ramp reaches its ceiling.
const HUE_SPEED_SPAN: f32 = 60.0;

/// Speed at which the brightness ramp reaches its ceiling.
const VALUE_SPEED_SPAN: f32 = 5.0;

/// Both ramps stop just short of wrapping around.
const RAMP_CEILING: f32 = 0.95;

/// Floor for the cursor distance, keeps 0/0 out of the force ratio when a
/// particle sits exactly on the cursor.
const MIN_PULL_DISTANCE: f32 = 1e-4;

/// Which way the cursor force pushes affected particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    /// Drag particles toward the cursor.
    Attract,
    /// Shove particles away from it.
    Repel,
}

impl Pull {
    fn sign(self) -> f32 {
        match self {
            Self::Attract => -1.0,
            Self::Repel => 1.0,
        }
    }
}

/// One point mass. The layout doubles as the vertex format of the points
/// demo: position at byte 0, color at byte 8, velocity rides along unread.
#[derive(Clone, Copy, NoUninit, AnyBitPattern)]
#[repr(C)]
pub struct Particle {
    pub pos: Vec2,
    pub color: Vec3,
    pub vel: Vec2,
}

impl Particle {
    /// A motionless particle waiting for its first step.
    pub fn at_rest(pos: Vec2) -> Self {
        Self {
            pos,
            color: Vec3::new(0.0, 0.0, 0.5),
            vel: Vec2::zero(),
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.mag()
    }

    /// Kick the velocity along the cursor axis. Only particles within
    /// `radius` of the cursor are affected; for those, the kick magnitude is
    /// exactly `strength` regardless of distance.
    pub fn pull(&mut self, cursor: Vec2, radius: f32, strength: f32, direction: Pull) {
        let delta = self.pos - cursor;
        let distance = delta.mag();
        if distance > radius {
            return;
        }
        let distance = distance.max(MIN_PULL_DISTANCE);
        self.vel += delta * (strength / distance) * direction.sign();
    }

    /// One frame: move by half the velocity, reflect off the walls, decay by
    /// `friction`, clamp back into the rectangle and refresh the color.
    pub fn integrate(&mut self, bounds: Vec2, friction: f32) {
        self.pos += self.vel * HALF_STEP;

        if self.pos.x < 0.0 || self.pos.x >= bounds.x {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y < 0.0 || self.pos.y >= bounds.y {
            self.vel.y = -self.vel.y;
        }

        self.vel *= friction;

        self.pos.x = self.pos.x.clamp(0.0, (bounds.x - 1.0).max(0.0));
        self.pos.y = self.pos.y.clamp(0.0, (bounds.y - 1.0).max(0.0));

        self.color = speed_color(self.speed());
    }
}

/// Map a speed to its display color: resting particles are black, slow ones
/// glow dim red, and the hue sweeps the wheel as the speed grows.
pub fn speed_color(speed: f32) -> Vec3 {
    let hue = (speed / HUE_SPEED_SPAN).clamp(0.0, RAMP_CEILING);
    let value = (speed / VALUE_SPEED_SPAN).clamp(0.0, RAMP_CEILING);
    let rgb = Srgb::from_color(Hsv::new(hue * 360.0, 1.0, value));
    Vec3::new(rgb.red, rgb.green, rgb.blue)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Vec2 = Vec2 { x: 100.0, y: 100.0 };

    fn almost(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn moves_by_half_the_velocity() {
        let mut particle = Particle::at_rest(Vec2::new(10.0, 20.0));
        particle.vel = Vec2::new(4.0, -2.0);
        particle.integrate(BOUNDS, 1.0);
        assert!(almost(particle.pos.x, 12.0));
        assert!(almost(particle.pos.y, 19.0));
    }

    #[test]
    fn friction_decays_the_velocity() {
        let mut particle = Particle::at_rest(Vec2::new(50.0, 50.0));
        particle.vel = Vec2::new(4.0, 0.0);
        particle.integrate(BOUNDS, 0.5);
        assert!(almost(particle.vel.x, 2.0));
    }

    #[test]
    fn bounces_off_the_right_wall() {
        let mut particle = Particle::at_rest(Vec2::new(99.5, 50.0));
        particle.vel = Vec2::new(2.0, 0.0);
        particle.integrate(BOUNDS, 1.0);
        assert!(almost(particle.vel.x, -2.0));
        assert!(particle.pos.x <= 99.0);
    }

    #[test]
    fn stays_inside_under_huge_velocity() {
        let mut particle = Particle::at_rest(Vec2::new(50.0, 50.0));
        particle.vel = Vec2::new(1e6, -1e6);
        particle.integrate(BOUNDS, 0.99);
        assert!(particle.pos.x >= 0.0 && particle.pos.x <= 99.0);
        assert!(particle.pos.y >= 0.0 && particle.pos.y <= 99.0);
    }

    #[test]
    fn survives_a_degenerate_window() {
        let mut particle = Particle::at_rest(Vec2::new(0.5, 0.5));
        particle.vel = Vec2::new(3.0, 3.0);
        particle.integrate(Vec2::new(1.0, 1.0), 0.99);
        assert!(particle.pos.x.is_finite() && particle.pos.y.is_finite());
    }

    #[test]
    fn attract_kicks_toward_the_cursor() {
        let mut particle = Particle::at_rest(Vec2::new(10.0, 0.0));
        particle.pull(Vec2::zero(), 400.0, 2.0, Pull::Attract);
        assert!(almost(particle.vel.x, -2.0));
        assert!(almost(particle.vel.y, 0.0));
    }

    #[test]
    fn repel_kicks_away_from_the_cursor() {
        let mut particle = Particle::at_rest(Vec2::new(10.0, 0.0));
        particle.pull(Vec2::zero(), 400.0, 2.0, Pull::Repel);
        assert!(almost(particle.vel.x, 2.0));
    }

    #[test]
    fn kick_magnitude_is_the_strength() {
        let mut particle = Particle::at_rest(Vec2::new(30.0, 40.0));
        particle.pull(Vec2::zero(), 400.0, 1.5, Pull::Attract);
        assert!(almost(particle.vel.mag(), 1.5));
    }

    #[test]
    fn out_of_radius_particles_are_untouched() {
        let mut particle = Particle::at_rest(Vec2::new(500.0, 0.0));
        particle.pull(Vec2::zero(), 400.0, 2.0, Pull::Attract);
        assert_eq!(particle.vel, Vec2::zero());
    }

    #[test]
    fn particle_on_the_cursor_stays_finite() {
        let mut particle = Particle::at_rest(Vec2::new(7.0, 7.0));
        particle.pull(Vec2::new(7.0, 7.0), 400.0, 2.0, Pull::Attract);
        assert_eq!(particle.vel, Vec2::zero());
    }

    #[test]
    fn resting_particles_are_black() {
        let color = speed_color(0.0);
        assert_eq!(color, Vec3::zero());
    }

    #[test]
    fn slow_particles_glow_dim_red() {
        // speed 3: hue 18 degrees, value 0.6
        let color = speed_color(3.0);
        assert!(almost(color.x, 0.6));
        assert!(almost(color.y, 0.18));
        assert!(almost(color.z, 0.0));
    }

    #[test]
    fn the_ramp_saturates() {
        // hue caps at 342 degrees, value at 0.95
        let color = speed_color(1e4);
        assert!(almost(color.x, 0.95));
        assert!(almost(color.y, 0.0));
        assert!(almost(color.z, 0.285));
    }

    #[test]
    fn color_follows_the_post_friction_speed() {
        let mut particle = Particle::at_rest(Vec2::new(50.0, 50.0));
        particle.vel = Vec2::new(6.0, 0.0);
        particle.integrate(BOUNDS, 0.5);
        assert_eq!(particle.color, speed_color(3.0));
    }
}
