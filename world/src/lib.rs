#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Overworld engine.
//!
//! The world owns every map, the player and the random number generator used
//! by trigger zones. Adapters mutate it exclusively through [`apply`] and read
//! it through the [`query`] module.

mod context;
pub mod descriptor;
pub mod entity;
mod error;
mod map;
mod player;
mod structure;
mod trigger;

use overworld_core::{Command, Displacement, Door, Event, MapId, Point, Rect};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

pub use context::{EngineContext, DEFAULT_SEED, DEFAULT_SPECIES_DRAW_LIMIT};
pub use error::WorldError;
pub use map::{Map, Resolution};
pub use player::Player;
pub use structure::Structure;
pub use trigger::{
    PoolId, Species, SpeciesPool, SpeciesPools, TriggerZone, ENCOUNTER_ROLL_HIT,
    ENCOUNTER_ROLL_RANGE,
};

use descriptor::{EntityRegistry, LoadReport, WorldDescriptor};

/// Represents the authoritative Overworld state.
#[derive(Debug)]
pub struct World {
    caption: String,
    maps: Vec<Map>,
    current: MapId,
    player: Player,
    pools: SpeciesPools,
    rng: ChaCha8Rng,
    tick_index: u64,
    report: LoadReport,
}

impl World {
    /// Builds a world from a description using the built-in entity kinds.
    pub fn from_descriptor(
        descriptor: &WorldDescriptor,
        engine: &EngineContext,
    ) -> Result<Self, WorldError> {
        Self::from_descriptor_with(descriptor, &EntityRegistry::with_builtins(), engine)
    }

    /// Builds a world from a description using a caller-supplied registry.
    pub fn from_descriptor_with(
        descriptor: &WorldDescriptor,
        registry: &EntityRegistry,
        engine: &EngineContext,
    ) -> Result<Self, WorldError> {
        let loaded = descriptor::load(descriptor, registry, engine)?;
        info!(
            maps = loaded.maps.len(),
            skipped = loaded.report.skipped.len(),
            seed = engine.seed(),
            "world loaded"
        );
        Ok(Self {
            caption: descriptor.caption.clone(),
            maps: loaded.maps,
            current: loaded.current,
            player: loaded.player,
            pools: loaded.pools,
            rng: ChaCha8Rng::seed_from_u64(engine.seed()),
            tick_index: 0,
            report: loaded.report,
        })
    }

    fn step(&mut self, requested: Displacement, out_events: &mut Vec<Event>) {
        let Some(map) = self.maps.get(self.current.get()) else {
            return;
        };
        let before = self.player.footprint();
        let from = self.player.position();

        let resolution = map.update(requested, &self.player, &self.pools, &mut self.rng);
        self.player.commit(resolution.displacement);

        if !resolution.displacement.is_zero() {
            out_events.push(Event::PlayerMoved {
                from,
                to: self.player.position(),
                requested,
                resolved: resolution.displacement,
            });
        }
        if let Some(encounter) = resolution.encounter {
            info!(
                species = encounter.species().get(),
                level = encounter.level().get(),
                "encounter triggered"
            );
            out_events.push(Event::EncounterTriggered { encounter });
        }

        let crossed = map
            .door_traversed(&before, resolution.displacement)
            .map(Door::destination);
        if let Some(destination) = crossed {
            self.enter_map(destination, out_events);
        }
    }

    fn enter_map(&mut self, destination: MapId, out_events: &mut Vec<Event>) {
        let Some(map) = self.maps.get(destination.get()) else {
            return;
        };
        let position = map.arrival(self.player.radius());
        let from = self.current;
        self.current = destination;
        self.player.place(position);
        info!(
            from = from.get(),
            to = destination.get(),
            caption = map.caption(),
            "entered map"
        );
        out_events.push(Event::MapEntered {
            from,
            to: destination,
            position,
        });
    }

    fn teleport(&mut self, map: MapId, position: Point, out_events: &mut Vec<Event>) {
        let admitted = self
            .maps
            .get(map.get())
            .is_some_and(|target| {
                target.fits(&Rect::new(position, self.player.radius()))
            });
        if !admitted {
            warn!(map = map.get(), ?position, "teleport target rejected");
            out_events.push(Event::TeleportRejected { map, position });
            return;
        }
        let from = self.current;
        self.current = map;
        self.player.place(position);
        out_events.push(Event::MapEntered {
            from,
            to: map,
            position,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Step { requested } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            world.step(requested, out_events);
        }
        Command::Teleport { map, position } => world.teleport(map, position, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use overworld_core::MapId;

    use super::{LoadReport, Map, Player, SpeciesPools, World};

    /// Window caption declared by the world description.
    #[must_use]
    pub fn caption(world: &World) -> &str {
        &world.caption
    }

    /// Every map in index order.
    #[must_use]
    pub fn maps(world: &World) -> &[Map] {
        &world.maps
    }

    /// Identifier of the map the player is in.
    #[must_use]
    pub fn current_map_id(world: &World) -> MapId {
        world.current
    }

    /// The map the player is in.
    #[must_use]
    pub fn current_map(world: &World) -> Option<&Map> {
        world.maps.get(world.current.get())
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Species pools shared by every trigger zone.
    #[must_use]
    pub fn species_pools(world: &World) -> &SpeciesPools {
        &world.pools
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Non-fatal findings from loading the world.
    #[must_use]
    pub fn load_report(world: &World) -> &LoadReport {
        &world.report
    }
}
