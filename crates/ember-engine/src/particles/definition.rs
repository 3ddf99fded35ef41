use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use crate::coords::{Rgba, Vec2};
use crate::scene::SpriteResource;

/// Closed interval sampled uniformly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn constant(v: f32) -> Self {
        Self { min: v, max: v }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        if self.min == self.max {
            return self.min;
        }
        let t: f32 = rng.random();
        self.min + (self.max - self.min) * t
    }
}

/// Per-axis interval; each axis is sampled independently.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec2Range {
    pub min: Vec2,
    pub max: Vec2,
}

impl Vec2Range {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub const fn constant(v: Vec2) -> Self {
        Self { min: v, max: v }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            FloatRange::new(self.min.x, self.max.x).sample(rng),
            FloatRange::new(self.min.y, self.max.y).sample(rng),
        )
    }
}

/// Immutable description of one emitter.
///
/// `particles_per_second == 0` selects one-shot emission: only the initial
/// batch is ever spawned.
#[derive(Debug, Clone)]
pub struct ParticleEmitterDefinition {
    pub sprite: Arc<SpriteResource>,
    pub particles_per_second: f32,
    pub initial_spawn_count: u32,
    pub velocity: Vec2Range,
    pub acceleration: Vec2Range,
    pub scale: Vec2Range,
    pub rotation_degrees: FloatRange,
    pub lifetime: FloatRange,
    pub tint: Rgba,
}

impl ParticleEmitterDefinition {
    /// Stationary, untinted, one-second particles; no emission until configured.
    pub fn new(sprite: Arc<SpriteResource>) -> Self {
        Self {
            sprite,
            particles_per_second: 0.0,
            initial_spawn_count: 0,
            velocity: Vec2Range::constant(Vec2::ZERO),
            acceleration: Vec2Range::constant(Vec2::ZERO),
            scale: Vec2Range::constant(Vec2::ONE),
            rotation_degrees: FloatRange::constant(0.0),
            lifetime: FloatRange::constant(1.0),
            tint: Rgba::WHITE,
        }
    }

    pub fn with_rate(mut self, particles_per_second: f32) -> Self {
        self.particles_per_second = particles_per_second.max(0.0);
        self
    }

    pub fn with_initial_spawn(mut self, count: u32) -> Self {
        self.initial_spawn_count = count;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2Range) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec2Range) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_scale(mut self, scale: Vec2Range) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation_degrees: FloatRange) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }

    pub fn with_lifetime(mut self, lifetime: FloatRange) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_tint(mut self, tint: Rgba) -> Self {
        self.tint = tint;
        self
    }

    /// Spawn interval; zero for one-shot emitters.
    #[inline]
    pub fn seconds_per_particle(&self) -> f32 {
        if self.particles_per_second > 0.0 {
            1.0 / self.particles_per_second
        } else {
            0.0
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ParticleSystemKind {
    /// Plays its initial batch once and is reclaimed when it expires.
    OneShot,
    /// Emits until destroyed.
    Looping,
}

/// Named, ordered set of emitter definitions.
#[derive(Debug, Clone)]
pub struct ParticleSystemDefinition {
    pub name: String,
    pub kind: ParticleSystemKind,
    pub emitters: Vec<Arc<ParticleEmitterDefinition>>,
}

impl ParticleSystemDefinition {
    pub fn new(name: impl Into<String>, kind: ParticleSystemKind) -> Self {
        Self { name: name.into(), kind, emitters: Vec::new() }
    }

    pub fn with_emitter(mut self, emitter: ParticleEmitterDefinition) -> Self {
        self.emitters.push(Arc::new(emitter));
        self
    }
}

/// Lookup of particle system definitions by name.
pub trait DefinitionSource {
    fn resolve(&self, name: &str) -> Option<Arc<ParticleSystemDefinition>>;
}

/// In-memory [`DefinitionSource`].
#[derive(Debug, Default, Clone)]
pub struct DefinitionLibrary {
    definitions: HashMap<String, Arc<ParticleSystemDefinition>>,
}

impl DefinitionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its own name, replacing any previous entry.
    pub fn insert(&mut self, definition: ParticleSystemDefinition) -> Arc<ParticleSystemDefinition> {
        let definition = Arc::new(definition);
        if self
            .definitions
            .insert(definition.name.clone(), Arc::clone(&definition))
            .is_some()
        {
            log::debug!("particle definition `{}` replaced", definition.name);
        }
        definition
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl DefinitionSource for DefinitionLibrary {
    fn resolve(&self, name: &str) -> Option<Arc<ParticleSystemDefinition>> {
        self.definitions.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::device::MaterialId;

    #[test]
    fn range_samples_stay_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = FloatRange::new(2.0, 3.0);
        for _ in 0..200 {
            let v = range.sample(&mut rng);
            assert!((2.0..=3.0).contains(&v), "{v} outside range");
        }
    }

    #[test]
    fn constant_range_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(FloatRange::constant(0.3).sample(&mut rng), 0.3);
        let v = Vec2Range::constant(Vec2::new(1.5, -2.0)).sample(&mut rng);
        assert_eq!(v, Vec2::new(1.5, -2.0));
    }

    #[test]
    fn one_shot_emitter_has_zero_interval() {
        let sprite = Arc::new(SpriteResource::new("spark", MaterialId::DEFAULT, Vec2::ONE));
        let def = ParticleEmitterDefinition::new(Arc::clone(&sprite));
        assert_eq!(def.seconds_per_particle(), 0.0);
        assert_eq!(def.with_rate(4.0).seconds_per_particle(), 0.25);
    }

    #[test]
    fn library_resolves_by_name() {
        let sprite = Arc::new(SpriteResource::new("spark", MaterialId::DEFAULT, Vec2::ONE));
        let mut lib = DefinitionLibrary::new();
        lib.insert(
            ParticleSystemDefinition::new("sparks", ParticleSystemKind::OneShot)
                .with_emitter(ParticleEmitterDefinition::new(sprite)),
        );
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.resolve("sparks").map(|d| d.emitters.len()), Some(1));
        assert!(lib.resolve("smoke").is_none());
    }
}
