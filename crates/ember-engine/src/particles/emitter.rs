use std::sync::Arc;

use rand::rngs::StdRng;

use crate::coords::Vec2;
use crate::device::MaterialId;
use crate::render::MeshBuilder;

use super::{Particle, ParticleEmitterDefinition, PositionFollower};

/// Relative slack on the spawn interval; absorbs the rounding of `f32` steps and rates.
const EMISSION_TOLERANCE: f64 = 1e-6;

/// Where an emitter spawns its particles.
#[derive(Debug, Clone)]
pub enum SpawnAnchor {
    /// Re-reads the followed position at every spawn.
    Follow(PositionFollower),
    /// Spawns at a fixed pose; the rotation offsets every particle's sampled rotation.
    Fixed { position: Vec2, rotation_degrees: f32 },
}

impl SpawnAnchor {
    pub fn fixed(position: Vec2, rotation_degrees: f32) -> Self {
        Self::Fixed { position, rotation_degrees }
    }

    fn pose(&mut self) -> (Vec2, f32) {
        match self {
            Self::Follow(follower) => (follower.position(), 0.0),
            Self::Fixed { position, rotation_degrees } => (*position, *rotation_degrees),
        }
    }
}

/// Simulates the population of one emitter definition.
///
/// The CPU mesh is rebuilt from scratch at the end of every update, so it always
/// mirrors the live population.
#[derive(Debug)]
pub struct ParticleEmitter {
    definition: Arc<ParticleEmitterDefinition>,
    anchor: SpawnAnchor,
    rng: StdRng,
    seconds_per_particle: f32,
    age: f32,
    time_since_last_emission: f64,
    spawned: u64,
    dead: bool,
    particles: Vec<Particle>,
    mesh: MeshBuilder,
}

impl ParticleEmitter {
    /// Spawns the definition's initial batch immediately.
    pub fn new(definition: Arc<ParticleEmitterDefinition>, anchor: SpawnAnchor, rng: StdRng) -> Self {
        let initial = definition.initial_spawn_count as usize;
        let mut emitter = Self {
            seconds_per_particle: definition.seconds_per_particle(),
            definition,
            anchor,
            rng,
            age: 0.0,
            time_since_last_emission: 0.0,
            spawned: 0,
            dead: false,
            particles: Vec::with_capacity(initial),
            mesh: MeshBuilder::with_quad_capacity(initial),
        };
        for _ in 0..initial {
            emitter.spawn_one();
        }
        emitter.rebuild_mesh();
        emitter
    }

    /// integrate -> drop expired -> spawn -> rebuild mesh. No-op once dead.
    pub fn update(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        self.age += dt;

        for particle in &mut self.particles {
            particle.integrate(dt);
        }
        self.remove_dead_particles();
        self.spawn_for(dt);

        if self.seconds_per_particle == 0.0 && self.particles.is_empty() {
            self.dead = true;
        }
        self.rebuild_mesh();
    }

    /// Stops emission; live particles keep aging out.
    pub fn stop_emitting(&mut self) {
        self.seconds_per_particle = 0.0;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[inline]
    pub fn age(&self) -> f32 {
        self.age
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particles spawned over the emitter's whole life.
    #[inline]
    pub fn total_spawned(&self) -> u64 {
        self.spawned
    }

    #[inline]
    pub fn definition(&self) -> &ParticleEmitterDefinition {
        &self.definition
    }

    #[inline]
    pub fn material(&self) -> MaterialId {
        self.definition.sprite.material
    }

    /// Quads for the current population; empty when there is nothing to draw.
    #[inline]
    pub fn mesh(&self) -> &MeshBuilder {
        &self.mesh
    }

    fn remove_dead_particles(&mut self) {
        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].is_dead() {
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Leftover time is carried by subtraction in `f64`, so `T * R` seconds of
    /// emission spawn exactly `floor(T * R)` particles whatever the step size.
    fn spawn_for(&mut self, dt: f32) {
        if self.seconds_per_particle <= 0.0 {
            return;
        }
        let interval = f64::from(self.seconds_per_particle);
        let threshold = interval * (1.0 - EMISSION_TOLERANCE);
        self.time_since_last_emission += f64::from(dt);
        while self.time_since_last_emission >= threshold {
            self.spawn_one();
            self.time_since_last_emission -= interval;
        }
    }

    fn spawn_one(&mut self) {
        let (position, rotation) = self.anchor.pose();
        self.particles
            .push(Particle::spawn(&self.definition, position, rotation, &mut self.rng));
        self.spawned += 1;
    }

    fn rebuild_mesh(&mut self) {
        self.mesh.clear();
        let quad = self.definition.sprite.quad();
        for p in &self.particles {
            self.mesh
                .push_sprite(&quad, p.position, p.rotation_degrees, p.scale, p.tint);
        }
    }
}
