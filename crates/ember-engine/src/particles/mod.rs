//! Particle simulation.
//!
//! Definitions are immutable and shared through `Arc`; a [`ParticleSystem`]
//! owns its emitters and their particles and keeps one CPU mesh per emitter
//! that always mirrors the live population.

mod definition;
mod emitter;
mod error;
mod follow;
mod particle;
mod system;

pub use definition::{
    DefinitionLibrary, DefinitionSource, FloatRange, ParticleEmitterDefinition,
    ParticleSystemDefinition, ParticleSystemKind, Vec2Range,
};
pub use emitter::{ParticleEmitter, SpawnAnchor};
pub use error::ParticleError;
pub use follow::{PositionFollower, TrackedPosition};
pub use particle::{Particle, fade_alpha};
pub use system::ParticleSystem;
