//! Encounter areas and the species pools they draw from.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use overworld_core::{EncounterEvent, Level, Rect, SpeciesId, TypeTag};
use rand::{seq::SliceRandom, Rng, RngCore};

use crate::{
    entity::{EncounterSource, Placed},
    WorldError,
};

/// Number of outcomes of the per-tick encounter roll.
pub const ENCOUNTER_ROLL_RANGE: u32 = 100;

/// The single roll outcome that fires an encounter.
pub const ENCOUNTER_ROLL_HIT: u32 = 50;

/// Species entry of a pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Species {
    id: SpeciesId,
    types: BTreeSet<TypeTag>,
}

impl Species {
    /// Creates a species entry with its type tags.
    #[must_use]
    pub fn new(id: SpeciesId, types: impl IntoIterator<Item = TypeTag>) -> Self {
        Self {
            id,
            types: types.into_iter().collect(),
        }
    }

    /// Identifier of the species.
    #[must_use]
    pub const fn id(&self) -> SpeciesId {
        self.id
    }

    /// Type tags carried by the species.
    #[must_use]
    pub fn types(&self) -> &BTreeSet<TypeTag> {
        &self.types
    }

    /// Reports whether the species carries every tag in `required`.
    #[must_use]
    pub fn satisfies(&self, required: &BTreeSet<TypeTag>) -> bool {
        required.is_subset(&self.types)
    }
}

/// Ordered list of species a zone samples from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpeciesPool {
    species: Vec<Species>,
}

impl SpeciesPool {
    /// Creates a pool from its entries.
    #[must_use]
    pub fn new(species: Vec<Species>) -> Self {
        Self { species }
    }

    /// Entries of the pool.
    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }
}

/// Index of a pool within [`SpeciesPools`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(usize);

impl PoolId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Named species pools shared by every map of a world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpeciesPools {
    pools: Vec<SpeciesPool>,
    names: BTreeMap<String, PoolId>,
}

impl SpeciesPools {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `pool` under `name`, replacing any pool previously registered
    /// under that name.
    pub fn insert(&mut self, name: impl Into<String>, pool: SpeciesPool) -> PoolId {
        let name = name.into();
        if let Some(&id) = self.names.get(&name) {
            self.pools[id.0] = pool;
            return id;
        }
        let id = PoolId(self.pools.len());
        self.pools.push(pool);
        let _ = self.names.insert(name, id);
        id
    }

    /// Looks up the identifier registered for `name`.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<PoolId> {
        self.names.get(name).copied()
    }

    /// Retrieves a pool by identifier.
    #[must_use]
    pub fn get(&self, id: PoolId) -> Option<&SpeciesPool> {
        self.pools.get(id.0)
    }
}

/// Area in which the player may run into wild creatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerZone {
    rect: Rect,
    levels: Range<u32>,
    required: BTreeSet<TypeTag>,
    pool: PoolId,
    draw_limit: u32,
}

impl TriggerZone {
    /// Creates a zone covering `rect`.
    ///
    /// Encounters draw levels from `levels` and species carrying all of
    /// `required` from `pool`, sampling at most `draw_limit` times.
    pub fn new(
        rect: Rect,
        levels: Range<u32>,
        required: BTreeSet<TypeTag>,
        pool: PoolId,
        draw_limit: u32,
    ) -> Result<Self, WorldError> {
        if rect.is_degenerate() {
            return Err(WorldError::DegenerateRect {
                what: "trigger zone",
                rect,
            });
        }
        if levels.is_empty() {
            return Err(WorldError::EmptyLevelRange {
                low: levels.start,
                high: levels.end,
            });
        }
        Ok(Self {
            rect,
            levels,
            required,
            pool,
            draw_limit,
        })
    }

    /// Half-open range of levels encounters are drawn from.
    #[must_use]
    pub fn levels(&self) -> Range<u32> {
        self.levels.clone()
    }

    /// Tags every encountered species must carry.
    #[must_use]
    pub fn required(&self) -> &BTreeSet<TypeTag> {
        &self.required
    }

    /// Pool the zone samples from.
    #[must_use]
    pub const fn pool(&self) -> PoolId {
        self.pool
    }
}

impl Placed for TriggerZone {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

impl EncounterSource for TriggerZone {
    fn maybe_trigger(
        &self,
        body: &Rect,
        pools: &SpeciesPools,
        rng: &mut dyn RngCore,
    ) -> Option<EncounterEvent> {
        if !body.overlaps(&self.rect) {
            return None;
        }
        if rng.gen_range(0..ENCOUNTER_ROLL_RANGE) != ENCOUNTER_ROLL_HIT {
            return None;
        }

        let pool = pools.get(self.pool)?.species();
        let species = (0..self.draw_limit).find_map(|_| {
            pool.choose(&mut *rng)
                .filter(|candidate| candidate.satisfies(&self.required))
        })?;
        let level = rng.gen_range(self.levels.clone());
        Some(EncounterEvent::new(species.id(), Level::new(level)))
    }
}
