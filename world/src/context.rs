//! Explicit engine configuration handed to the world at construction.

/// Seed used when the adapter does not provide one.
pub const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Number of species samples a firing zone may draw before giving up.
pub const DEFAULT_SPECIES_DRAW_LIMIT: u32 = 32;

/// Engine-wide settings that would otherwise live in process globals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineContext {
    seed: u64,
    species_draw_limit: u32,
}

impl EngineContext {
    /// Creates a context from explicit values.
    #[must_use]
    pub const fn new(seed: u64, species_draw_limit: u32) -> Self {
        Self {
            seed,
            species_draw_limit,
        }
    }

    /// Seed for the world's random number generator.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Upper bound on species samples per fired encounter.
    #[must_use]
    pub const fn species_draw_limit(&self) -> u32 {
        self.species_draw_limit
    }

    /// Returns a copy using the provided seed.
    #[must_use]
    pub const fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, DEFAULT_SPECIES_DRAW_LIMIT)
    }
}
