//! Maps: bounded areas that own entities and act as the per-tick collision
//! authority.

use overworld_core::{Axis, Displacement, Door, EncounterEvent, Extent, MapId, Point, Rect};
use rand::RngCore;

use crate::{
    entity::{Entity, Placed},
    player::Player,
    trigger::SpeciesPools,
    WorldError,
};

/// Outcome of a single [`Map::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Displacement the player may commit this tick.
    pub displacement: Displacement,
    /// Encounter fired by the first zone that triggered, if any.
    pub encounter: Option<EncounterEvent>,
}

/// Bounded area containing structures, trigger zones and doors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Map {
    id: MapId,
    bounds: Rect,
    caption: String,
    entities: Vec<Entity>,
    doors: Vec<Door>,
}

impl Map {
    /// Creates a map placed at `bounds`.
    ///
    /// The map's door list holds `doors` followed by the doors of every
    /// entity in insertion order.
    pub fn new(
        id: MapId,
        bounds: Rect,
        caption: impl Into<String>,
        entities: Vec<Entity>,
        doors: Vec<Door>,
    ) -> Result<Self, WorldError> {
        if bounds.is_degenerate() {
            return Err(WorldError::DegenerateRect { what: "map", rect: bounds });
        }
        let doors = doors
            .into_iter()
            .chain(entities.iter().flat_map(|entity| entity.doors().iter().copied()))
            .collect();
        Ok(Self {
            id,
            bounds,
            caption: caption.into(),
            entities,
            doors,
        })
    }

    /// Identifier of the map.
    #[must_use]
    pub const fn id(&self) -> MapId {
        self.id
    }

    /// Placement of the map on screen. Only the size constrains movement.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Playable width and height.
    #[must_use]
    pub const fn size(&self) -> Extent {
        self.bounds.size()
    }

    /// Label shown when the map is entered.
    #[must_use]
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Entities in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Every door of the map, own doors first.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Point at which players arriving through a door are placed.
    #[must_use]
    pub fn entrance(&self) -> Point {
        self.doors
            .first()
            .map_or(Point::ORIGIN, |door| door.segment().a())
    }

    /// Entrance moved so that a footprint of `radius` fits inside the map.
    #[must_use]
    pub fn arrival(&self, radius: Extent) -> Point {
        let entrance = self.entrance();
        let fit = |axis: Axis| {
            let limit = (self.size().along(axis) - radius.along(axis)).max(0);
            entrance.coord(axis).clamp(0, limit)
        };
        Point::new(fit(Axis::X), fit(Axis::Y))
    }

    /// Reports whether `footprint` lies entirely within the playable area.
    #[must_use]
    pub fn fits(&self, footprint: &Rect) -> bool {
        let area = Rect::new(Point::ORIGIN, self.size());
        !footprint.size().is_negative()
            && footprint
                .corners()
                .into_iter()
                .all(|corner| area.contains(corner))
    }

    /// Shortens `requested` so that `body` stays within `[0, size]` on
    /// both axes.
    #[must_use]
    pub fn clamp(&self, requested: Displacement, body: &Rect) -> Displacement {
        Axis::ALL.into_iter().fold(requested, |clamped, axis| {
            let wanted = requested.along(axis);
            let (low, high) = body.span(axis);
            let size = self.size().along(axis);
            let allowed = if wanted > 0 {
                wanted.min(size.saturating_sub(high).max(0))
            } else if wanted < 0 {
                wanted.max(low.saturating_neg().min(0))
            } else {
                0
            };
            clamped.with_along(axis, allowed)
        })
    }

    /// Resolves one tick of movement for `player`.
    ///
    /// The request is clamped to the map, then handed to every colliding
    /// entity in insertion order, each seeing the previous one's result.
    /// Passes repeat until no collider shortens the displacement any further,
    /// since shortening one axis can bring the body into an entity that an
    /// earlier collider let it pass. Trigger zones then roll against the
    /// predicted footprint; the first zone that fires wins.
    pub fn update(
        &self,
        requested: Displacement,
        player: &Player,
        pools: &SpeciesPools,
        rng: &mut dyn RngCore,
    ) -> Resolution {
        let body = player.footprint();
        let mut displacement = self.clamp(requested, &body);
        loop {
            let shortened = self
                .entities
                .iter()
                .filter_map(Entity::collider)
                .fold(displacement, |current, collider| {
                    collider.resolve(current, &body)
                });
            if shortened == displacement {
                break;
            }
            displacement = shortened;
        }

        let predicted = body.translated(displacement);
        let encounter = self
            .entities
            .iter()
            .filter_map(Entity::encounter_source)
            .find_map(|source| source.maybe_trigger(&predicted, pools, &mut *rng));

        Resolution {
            displacement,
            encounter,
        }
    }

    /// First door traversed by a body leaving `before` with `displacement`.
    #[must_use]
    pub fn door_traversed(&self, before: &Rect, displacement: Displacement) -> Option<&Door> {
        self.doors
            .iter()
            .find(|door| door.traversed_by(before, displacement))
    }

    /// Entity covering `point`, if any, searching in insertion order.
    #[must_use]
    pub fn entity_at(&self, point: Point) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.bounds().contains(point))
    }
}
