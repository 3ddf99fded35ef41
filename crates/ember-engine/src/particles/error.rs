use thiserror::Error;

/// Particle system construction failures.
///
/// Both abort construction before the system is registered anywhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParticleError {
    #[error("particle system definition `{0}` not found")]
    DefinitionNotFound(String),

    #[error("particle system definition `{0}` has no emitters")]
    EmptyEmitterSet(String),
}
