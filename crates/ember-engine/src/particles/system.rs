use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::device::MaterialId;
use crate::render::MeshBuilder;
use crate::scene::LayerId;

use super::{
    DefinitionSource, ParticleEmitter, ParticleError, ParticleSystemDefinition,
    ParticleSystemKind, SpawnAnchor,
};

/// A group of emitters built from one named definition, drawn on one layer.
#[derive(Debug)]
pub struct ParticleSystem {
    definition: Arc<ParticleSystemDefinition>,
    layer: LayerId,
    emitters: Vec<ParticleEmitter>,
    dead: bool,
}

impl ParticleSystem {
    /// Builds one emitter per emitter definition, each with its own RNG stream
    /// seeded from `rng`.
    pub fn new<R: Rng>(
        definition: Arc<ParticleSystemDefinition>,
        layer: LayerId,
        anchor: SpawnAnchor,
        rng: &mut R,
    ) -> Result<Self, ParticleError> {
        if definition.emitters.is_empty() {
            return Err(ParticleError::EmptyEmitterSet(definition.name.clone()));
        }

        let emitters = definition
            .emitters
            .iter()
            .map(|def| {
                ParticleEmitter::new(
                    Arc::clone(def),
                    anchor.clone(),
                    StdRng::seed_from_u64(rng.random()),
                )
            })
            .collect();

        Ok(Self { definition, layer, emitters, dead: false })
    }

    /// Resolves `name` through `source`, then builds as [`new`](Self::new).
    pub fn from_source<R: Rng>(
        source: &dyn DefinitionSource,
        name: &str,
        layer: LayerId,
        anchor: SpawnAnchor,
        rng: &mut R,
    ) -> Result<Self, ParticleError> {
        let definition = source
            .resolve(name)
            .ok_or_else(|| ParticleError::DefinitionNotFound(name.to_owned()))?;
        Self::new(definition, layer, anchor, rng)
    }

    /// Advances every emitter; the system dies once all of them have.
    pub fn update(&mut self, dt: f32) {
        if self.dead {
            return;
        }
        let mut all_dead = true;
        for emitter in &mut self.emitters {
            emitter.update(dt);
            all_dead &= emitter.is_dead();
        }
        self.dead = all_dead;
    }

    /// Stops all emission so the system dies once its particles expire.
    pub fn destroy_gracefully(&mut self) {
        for emitter in &mut self.emitters {
            emitter.stop_emitting();
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    #[inline]
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[inline]
    pub fn kind(&self) -> ParticleSystemKind {
        self.definition.kind
    }

    #[inline]
    pub fn emitters(&self) -> &[ParticleEmitter] {
        &self.emitters
    }

    pub fn particle_count(&self) -> usize {
        self.emitters.iter().map(|e| e.particles().len()).sum()
    }

    /// Non-empty emitter meshes with the material they are drawn with.
    pub fn meshes(&self) -> impl Iterator<Item = (MaterialId, &MeshBuilder)> {
        self.emitters
            .iter()
            .filter(|e| !e.mesh().is_empty())
            .map(|e| (e.material(), e.mesh()))
    }
}
