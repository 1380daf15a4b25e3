//! Fully resolved world descriptions and the registry that turns them into
//! maps.
//!
//! Descriptors mirror the persisted world format and can be decoded with
//! `serde_json`. Entities are tagged by kind; each kind is built by a factory
//! registered in an [`EntityRegistry`]. Kinds without a factory are skipped
//! and reported, while malformed entities of a known kind abort loading.

use std::collections::BTreeMap;

use overworld_core::{Door, Extent, GeometryError, MapId, Point, Rect, SpeciesId, TypeTag};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use tracing::warn;

use crate::{
    context::EngineContext,
    entity::Entity,
    map::Map,
    player::Player,
    structure::Structure,
    trigger::{Species, SpeciesPool, SpeciesPools, TriggerZone},
    WorldError,
};

/// Movement per tick used when a player description omits its speed.
pub const DEFAULT_PLAYER_SPEED: i32 = 50;

/// Complete description of a world.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WorldDescriptor {
    /// Window caption suggested to presentation adapters.
    #[serde(default)]
    pub caption: String,
    /// Maps in index order; doors refer to maps by position in this list.
    pub maps: Vec<MapDescriptor>,
    /// The player and their starting placement.
    pub player: PlayerDescriptor,
    /// Species pools referenced by trigger zones, keyed by name.
    #[serde(default)]
    pub species_pools: BTreeMap<String, Vec<SpeciesDescriptor>>,
}

/// Description of one map.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MapDescriptor {
    /// Screen placement of the map.
    pub pos: [i32; 2],
    /// Playable width and height.
    pub size: [i32; 2],
    /// Label shown when the map is entered.
    #[serde(default)]
    pub caption: String,
    /// Kind-tagged entities in insertion order.
    #[serde(default, alias = "sprites")]
    pub entities: Vec<EntityDescriptor>,
    /// Doors owned by the map itself.
    #[serde(default)]
    pub doors: Vec<DoorDescriptor>,
}

/// Entity tagged with its kind; the remaining fields are kind specific.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EntityDescriptor {
    /// Kind tag used to select a factory. `None` when the tag is missing or
    /// not a string; such entities are skipped while loading.
    #[serde(rename = "type", default, deserialize_with = "kind_tag")]
    pub kind: Option<String>,
    /// Parameters decoded by the factory.
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

/// Door between two points leading to the map at index `dest`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct DoorDescriptor {
    /// Endpoints of the door segment.
    pub pos: [[i32; 2]; 2],
    /// Index of the destination map.
    pub dest: usize,
}

impl DoorDescriptor {
    /// Builds the door, rejecting diagonal endpoints.
    pub fn to_door(&self) -> Result<Door, GeometryError> {
        let [a, b] = self.pos;
        Door::new(point(a), point(b), MapId::new(self.dest))
    }
}

/// Description of the player.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PlayerDescriptor {
    /// Display name.
    pub name: String,
    /// Starting placement.
    pub current: PlacementDescriptor,
    /// Footprint extent per axis.
    pub size: [i32; 2],
    /// Distance covered per tick while a direction is held.
    #[serde(default = "default_speed")]
    pub speed: i32,
}

/// Map index and anchor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PlacementDescriptor {
    /// Index of the map.
    pub map: usize,
    /// Anchor position inside the map.
    pub pos: [i32; 2],
}

/// Species entry of a named pool.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SpeciesDescriptor {
    /// Identifier in the external species catalogue.
    pub id: u32,
    /// Type tags of the species.
    #[serde(default)]
    pub types: Vec<String>,
}

fn kind_tag<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = serde_json::Value::deserialize(deserializer)?;
    Ok(tag.as_str().map(str::to_owned))
}

const fn default_speed() -> i32 {
    DEFAULT_PLAYER_SPEED
}

fn point([x, y]: [i32; 2]) -> Point {
    Point::new(x, y)
}

fn rect(pos: [i32; 2], [width, height]: [i32; 2]) -> Rect {
    Rect::new(point(pos), Extent::new(width, height))
}

/// Information available to entity factories.
#[derive(Clone, Copy, Debug)]
pub struct EntityContext<'a> {
    /// Index of the map being built.
    pub map: usize,
    /// Position of the entity in the map's entity list.
    pub index: usize,
    /// Species pools declared by the world.
    pub pools: &'a SpeciesPools,
    /// Engine configuration.
    pub engine: &'a EngineContext,
}

impl EntityContext<'_> {
    /// Decodes the parameters of `descriptor` into `T`.
    pub fn params<T: DeserializeOwned>(&self, descriptor: &EntityDescriptor) -> Result<T, WorldError> {
        serde_json::from_value(serde_json::Value::Object(descriptor.params.clone())).map_err(
            |source| WorldError::InvalidEntity {
                map: self.map,
                index: self.index,
                kind: descriptor.kind.clone().unwrap_or_default(),
                source,
            },
        )
    }
}

/// Builds an entity of one kind.
pub type EntityFactory = fn(&EntityDescriptor, &EntityContext<'_>) -> Result<Entity, WorldError>;

/// Kind tag to factory mapping.
#[derive(Clone, Debug)]
pub struct EntityRegistry {
    factories: BTreeMap<String, EntityFactory>,
}

impl EntityRegistry {
    /// Creates a registry without any factories.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Creates a registry holding the built-in structure and trigger zone
    /// kinds.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("Building", build_structure);
        registry.register("Structure", build_structure);
        registry.register("WildArea", build_trigger_zone);
        registry.register("TriggerZone", build_trigger_zone);
        registry
    }

    /// Associates `kind` with `factory`, replacing any previous factory.
    pub fn register(&mut self, kind: impl Into<String>, factory: EntityFactory) {
        let _ = self.factories.insert(kind.into(), factory);
    }

    /// Reports whether a factory exists for `kind`.
    #[must_use]
    pub fn knows(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Builds `descriptor`, or returns `None` when its kind is unknown or
    /// missing.
    pub fn build(
        &self,
        descriptor: &EntityDescriptor,
        context: &EntityContext<'_>,
    ) -> Option<Result<Entity, WorldError>> {
        descriptor
            .kind
            .as_deref()
            .and_then(|kind| self.factories.get(kind))
            .map(|factory| factory(descriptor, context))
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[derive(Deserialize)]
struct StructureParams {
    pos: [i32; 2],
    size: [i32; 2],
    #[serde(default)]
    doors: Vec<DoorDescriptor>,
}

fn build_structure(
    descriptor: &EntityDescriptor,
    context: &EntityContext<'_>,
) -> Result<Entity, WorldError> {
    let params: StructureParams = context.params(descriptor)?;
    let doors = params
        .doors
        .iter()
        .map(DoorDescriptor::to_door)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Structure::new(rect(params.pos, params.size), doors)?.into())
}

#[derive(Deserialize)]
struct TriggerZoneParams {
    pos: [i32; 2],
    size: [i32; 2],
    levels: [u32; 2],
    #[serde(default)]
    types: Vec<String>,
    pool: String,
}

fn build_trigger_zone(
    descriptor: &EntityDescriptor,
    context: &EntityContext<'_>,
) -> Result<Entity, WorldError> {
    let params: TriggerZoneParams = context.params(descriptor)?;
    let pool = context
        .pools
        .id(&params.pool)
        .ok_or(WorldError::UnknownSpeciesPool { name: params.pool })?;
    let [low, high] = params.levels;
    let zone = TriggerZone::new(
        rect(params.pos, params.size),
        low..high,
        params.types.into_iter().map(TypeTag::new).collect(),
        pool,
        context.engine.species_draw_limit(),
    )?;
    Ok(zone.into())
}

/// Entity that was left out because its kind has no factory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEntity {
    /// Map that lists the entity.
    pub map: usize,
    /// Position of the entity within the map's entity list.
    pub index: usize,
    /// Unrecognised kind tag, or `None` when the entity carried no usable tag.
    pub kind: Option<String>,
}

/// Non-fatal findings collected while loading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entities skipped because of unknown or missing kinds.
    pub skipped: Vec<SkippedEntity>,
}

pub(crate) struct Loaded {
    pub(crate) maps: Vec<Map>,
    pub(crate) current: MapId,
    pub(crate) player: Player,
    pub(crate) pools: SpeciesPools,
    pub(crate) report: LoadReport,
}

pub(crate) fn load(
    descriptor: &WorldDescriptor,
    registry: &EntityRegistry,
    engine: &EngineContext,
) -> Result<Loaded, WorldError> {
    if descriptor.maps.is_empty() {
        return Err(WorldError::NoMaps);
    }

    let mut pools = SpeciesPools::new();
    for (name, entries) in &descriptor.species_pools {
        let species = entries
            .iter()
            .map(|entry| {
                Species::new(
                    SpeciesId::new(entry.id),
                    entry.types.iter().cloned().map(TypeTag::new),
                )
            })
            .collect();
        let _ = pools.insert(name.clone(), SpeciesPool::new(species));
    }

    let mut report = LoadReport::default();
    let mut maps = Vec::with_capacity(descriptor.maps.len());
    for (index, map) in descriptor.maps.iter().enumerate() {
        maps.push(load_map(index, map, registry, &pools, engine, &mut report)?);
    }

    for map in &maps {
        if let Some(door) = map
            .doors()
            .iter()
            .find(|door| door.destination().get() >= maps.len())
        {
            return Err(WorldError::InvalidDoorDestination {
                map: map.id().get(),
                destination: door.destination().get(),
            });
        }
    }

    let player = &descriptor.player;
    let start = player.current.map;
    let Some(start_map) = maps.get(start) else {
        return Err(WorldError::InvalidStartingMap { map: start });
    };
    let radius = Extent::new(player.size[0], player.size[1]);
    if radius.is_negative() {
        return Err(WorldError::NegativeFootprint { size: radius });
    }
    let position = point(player.current.pos);
    if !start_map.fits(&Rect::new(position, radius)) {
        return Err(WorldError::StartOutOfBounds {
            map: start,
            position,
        });
    }
    if player.speed < 0 {
        return Err(WorldError::NegativeSpeed {
            speed: player.speed,
        });
    }

    Ok(Loaded {
        maps,
        current: MapId::new(start),
        player: Player::new(player.name.clone(), position, radius, player.speed),
        pools,
        report,
    })
}

fn load_map(
    index: usize,
    descriptor: &MapDescriptor,
    registry: &EntityRegistry,
    pools: &SpeciesPools,
    engine: &EngineContext,
    report: &mut LoadReport,
) -> Result<Map, WorldError> {
    let mut entities = Vec::with_capacity(descriptor.entities.len());
    for (position, entity) in descriptor.entities.iter().enumerate() {
        let context = EntityContext {
            map: index,
            index: position,
            pools,
            engine,
        };
        match registry.build(entity, &context) {
            Some(built) => entities.push(built?),
            None => {
                warn!(map = index, index = position, kind = ?entity.kind, "skipping unknown entity kind");
                report.skipped.push(SkippedEntity {
                    map: index,
                    index: position,
                    kind: entity.kind.clone(),
                });
            }
        }
    }

    let doors = descriptor
        .doors
        .iter()
        .map(DoorDescriptor::to_door)
        .collect::<Result<Vec<_>, _>>()?;

    Map::new(
        MapId::new(index),
        rect(descriptor.pos, descriptor.size),
        descriptor.caption.clone(),
        entities,
        doors,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> WorldDescriptor {
        serde_json::from_value(value).expect("valid descriptor")
    }

    fn two_maps(extra_entity: serde_json::Value) -> serde_json::Value {
        json!({
            "caption": "test",
            "maps": [
                {
                    "pos": [0, 0],
                    "size": [800, 600],
                    "caption": "town",
                    "sprites": [
                        {
                            "type": "Building",
                            "image": "house.png",
                            "pos": [100, 100],
                            "size": [50, 50],
                            "doors": [{ "pos": [[120, 150], [130, 150]], "dest": 1 }]
                        },
                        extra_entity
                    ],
                    "doors": [{ "pos": [[0, 10], [0, 50]], "dest": 1 }]
                },
                {
                    "pos": [0, 0],
                    "size": [200, 200],
                    "doors": [{ "pos": [[100, 200], [120, 200]], "dest": 0 }]
                }
            ],
            "player": {
                "name": "red",
                "current": { "map": 0, "pos": [10, 20] },
                "size": [20, 20]
            },
            "species_pools": {
                "meadow": [
                    { "id": 1, "types": ["grass"] },
                    { "id": 4, "types": ["fire"] }
                ]
            }
        })
    }

    fn load_default(descriptor: &WorldDescriptor) -> Result<Loaded, WorldError> {
        load(
            descriptor,
            &EntityRegistry::default(),
            &EngineContext::default(),
        )
    }

    #[test]
    fn builds_known_kinds_and_aggregates_doors() {
        let descriptor = decode(two_maps(json!({
            "type": "WildArea",
            "pos": [300, 300],
            "size": [100, 100],
            "levels": [2, 5],
            "types": ["grass"],
            "pool": "meadow"
        })));

        let loaded = load_default(&descriptor).expect("loads");

        assert_eq!(loaded.maps.len(), 2);
        assert_eq!(loaded.maps[0].entities().len(), 2);
        assert_eq!(loaded.maps[0].doors().len(), 2);
        assert_eq!(loaded.maps[0].caption(), "town");
        assert_eq!(loaded.player.speed(), DEFAULT_PLAYER_SPEED);
        assert_eq!(loaded.player.position(), Point::new(10, 20));
        assert_eq!(loaded.current, MapId::new(0));
        assert!(loaded.report.skipped.is_empty());
    }

    #[test]
    fn unknown_kinds_are_skipped_and_reported() {
        let descriptor = decode(two_maps(json!({ "type": "Fountain", "pos": [1, 1] })));

        let loaded = load_default(&descriptor).expect("loads");

        assert_eq!(loaded.maps[0].entities().len(), 1);
        assert_eq!(
            loaded.report.skipped,
            vec![SkippedEntity {
                map: 0,
                index: 1,
                kind: Some("Fountain".to_owned()),
            }]
        );
    }

    #[test]
    fn entities_without_a_string_kind_are_skipped() {
        let mut value = two_maps(json!({ "pos": [1, 1] }));
        value["maps"][0]["sprites"]
            .as_array_mut()
            .expect("sprite list")
            .push(json!({ "type": 5, "pos": [2, 2] }));
        let descriptor = decode(value);
        assert_eq!(descriptor.maps[0].entities[1].kind, None);

        let loaded = load_default(&descriptor).expect("loads");

        assert_eq!(loaded.maps[0].entities().len(), 1);
        assert_eq!(
            loaded.report.skipped,
            vec![
                SkippedEntity {
                    map: 0,
                    index: 1,
                    kind: None,
                },
                SkippedEntity {
                    map: 0,
                    index: 2,
                    kind: None,
                },
            ]
        );
    }

    #[test]
    fn custom_factories_extend_the_registry() {
        fn fountain(
            descriptor: &EntityDescriptor,
            context: &EntityContext<'_>,
        ) -> Result<Entity, WorldError> {
            #[derive(Deserialize)]
            struct Params {
                pos: [i32; 2],
            }
            let params: Params = context.params(descriptor)?;
            Ok(Structure::new(rect(params.pos, [4, 4]), Vec::new())?.into())
        }

        let mut registry = EntityRegistry::with_builtins();
        registry.register("Fountain", fountain);
        assert!(registry.knows("Fountain"));

        let descriptor = decode(two_maps(json!({ "type": "Fountain", "pos": [1, 1] })));
        let loaded =
            load(&descriptor, &registry, &EngineContext::default()).expect("loads");

        assert_eq!(loaded.maps[0].entities().len(), 2);
        assert!(loaded.report.skipped.is_empty());
    }

    #[test]
    fn malformed_known_kind_is_fatal() {
        let descriptor = decode(two_maps(json!({ "type": "WildArea", "pos": [1, 1] })));

        let result = load_default(&descriptor);

        assert!(matches!(
            result,
            Err(WorldError::InvalidEntity { map: 0, index: 1, ref kind, .. }) if kind == "WildArea"
        ));
    }

    #[test]
    fn unknown_pool_is_fatal() {
        let descriptor = decode(two_maps(json!({
            "type": "WildArea",
            "pos": [300, 300],
            "size": [100, 100],
            "levels": [2, 5],
            "pool": "cave"
        })));

        let result = load_default(&descriptor);

        assert!(matches!(
            result,
            Err(WorldError::UnknownSpeciesPool { ref name }) if name == "cave"
        ));
    }

    #[test]
    fn zero_area_building_is_fatal() {
        let descriptor = decode(two_maps(json!({
            "type": "Building",
            "pos": [400, 400],
            "size": [0, 30]
        })));

        assert!(matches!(
            load_default(&descriptor),
            Err(WorldError::DegenerateRect { what: "structure", .. })
        ));
    }

    #[test]
    fn diagonal_door_is_fatal() {
        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["maps"][1]["doors"][0]["pos"] = json!([[0, 0], [10, 10]]);

        let result = load_default(&decode(value));

        assert!(matches!(
            result,
            Err(WorldError::Geometry(GeometryError::NotAxisAligned { .. }))
        ));
    }

    #[test]
    fn door_to_missing_map_is_fatal() {
        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["maps"][1]["doors"][0]["dest"] = json!(7);

        let result = load_default(&decode(value));

        assert!(matches!(
            result,
            Err(WorldError::InvalidDoorDestination {
                map: 1,
                destination: 7
            })
        ));
    }

    #[test]
    fn invalid_start_is_fatal() {
        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["player"]["current"]["map"] = json!(2);
        assert!(matches!(
            load_default(&decode(value)),
            Err(WorldError::InvalidStartingMap { map: 2 })
        ));

        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["player"]["current"]["pos"] = json!([900, 20]);
        assert!(matches!(
            load_default(&decode(value)),
            Err(WorldError::StartOutOfBounds { map: 0, .. })
        ));
    }

    #[test]
    fn start_with_the_footprint_past_the_edge_is_fatal() {
        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["player"]["current"]["pos"] = json!([790, 20]);
        assert!(matches!(
            load_default(&decode(value)),
            Err(WorldError::StartOutOfBounds { map: 0, .. })
        ));

        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["player"]["current"]["pos"] = json!([780, 580]);
        let loaded = load_default(&decode(value)).expect("footprint touches the corner");
        assert_eq!(loaded.player.position(), Point::new(780, 580));
    }

    #[test]
    fn negative_player_values_are_fatal() {
        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["player"]["size"] = json!([-1, 20]);
        assert!(matches!(
            load_default(&decode(value)),
            Err(WorldError::NegativeFootprint { .. })
        ));

        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["player"]["speed"] = json!(-3);
        assert!(matches!(
            load_default(&decode(value)),
            Err(WorldError::NegativeSpeed { speed: -3 })
        ));
    }

    #[test]
    fn world_without_maps_is_rejected() {
        let mut value = two_maps(json!({ "type": "Fountain" }));
        value["maps"] = json!([]);
        assert!(matches!(
            load_default(&decode(value)),
            Err(WorldError::NoMaps)
        ));
    }
}
