use rand::Rng;

use crate::coords::{Rgba, Vec2};

use super::ParticleEmitterDefinition;

/// Linear fade-out over a particle's lifetime: `clamp(1 - age / max_age, 0, 1)`.
///
/// A non-positive lifetime is already expired.
#[inline]
pub fn fade_alpha(age: f32, max_age: f32) -> f32 {
    if max_age <= 0.0 {
        return 0.0;
    }
    (1.0 - age / max_age).clamp(0.0, 1.0)
}

/// One simulated particle. Plain value, owned by its emitter.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub age: f32,
    pub max_age: f32,
    pub rotation_degrees: f32,
    pub scale: Vec2,
    pub tint: Rgba,
}

impl Particle {
    /// Samples a fresh particle from `definition`'s ranges.
    pub fn spawn<R: Rng>(
        definition: &ParticleEmitterDefinition,
        position: Vec2,
        base_rotation_degrees: f32,
        rng: &mut R,
    ) -> Self {
        let max_age = definition.lifetime.sample(rng);
        Self {
            position,
            velocity: definition.velocity.sample(rng),
            acceleration: definition.acceleration.sample(rng),
            age: 0.0,
            max_age,
            rotation_degrees: base_rotation_degrees + definition.rotation_degrees.sample(rng),
            scale: definition.scale.sample(rng),
            tint: definition.tint.with_alpha(fade_alpha(0.0, max_age)),
        }
    }

    /// Explicit Euler step; velocity is advanced after position.
    pub fn integrate(&mut self, dt: f32) {
        self.position += self.velocity * dt;
        self.velocity += self.acceleration * dt;
        self.age += dt;
        self.tint = self.tint.with_alpha(fade_alpha(self.age, self.max_age));
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.age >= self.max_age
    }
}
