//! The player-controlled body.

use overworld_core::{Displacement, Extent, Point, Rect};

/// Player identity, anchor position and footprint.
///
/// The footprint is the box `[position, position + radius]`; `radius` holds
/// one extent per axis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    name: String,
    position: Point,
    radius: Extent,
    speed: i32,
}

impl Player {
    /// Creates a player at `position` with the given footprint and speed.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Point, radius: Extent, speed: i32) -> Self {
        Self {
            name: name.into(),
            position,
            radius,
            speed,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-left anchor of the footprint.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Per-axis footprint extent.
    #[must_use]
    pub const fn radius(&self) -> Extent {
        self.radius
    }

    /// Distance covered per tick while a direction is held.
    #[must_use]
    pub const fn speed(&self) -> i32 {
        self.speed
    }

    /// Area currently occupied by the player.
    #[must_use]
    pub const fn footprint(&self) -> Rect {
        Rect::new(self.position, self.radius)
    }

    pub(crate) fn commit(&mut self, displacement: Displacement) {
        self.position = self.position.offset(displacement);
    }

    pub(crate) fn place(&mut self, position: Point) {
        self.position = position;
    }
}
