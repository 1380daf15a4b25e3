//! Solid rectangular obstacles that block the player.

use overworld_core::{Axis, Displacement, Door, Rect, Segment};
use tracing::debug;

use crate::{
    entity::{Collider, Placed},
    WorldError,
};

/// Solid rectangle with optional doors leading out of the current map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    rect: Rect,
    doors: Vec<Door>,
}

impl Structure {
    /// Creates a structure covering `rect`, exempting traversal through `doors`.
    pub fn new(rect: Rect, doors: Vec<Door>) -> Result<Self, WorldError> {
        if rect.is_degenerate() {
            return Err(WorldError::DegenerateRect {
                what: "structure",
                rect,
            });
        }
        Ok(Self { rect, doors })
    }

    /// Doors embedded in the structure.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Boundary segments in the order top, right, bottom, left.
    #[must_use]
    pub const fn boundary(&self) -> [Segment; 4] {
        self.rect.edges()
    }
}

impl Placed for Structure {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

impl Collider for Structure {
    fn resolve(&self, requested: Displacement, body: &Rect) -> Displacement {
        if requested.is_zero() || !body.translated(requested).overlaps(&self.rect) {
            return requested;
        }

        if self
            .doors
            .iter()
            .any(|door| door.traversed_by(body, requested))
        {
            debug!(?requested, rect = ?self.rect, "door exempts penetration");
            return requested;
        }

        let mut resolved = requested;
        let mut clipped = false;
        for axis in Axis::ALL {
            if body.overlaps_on(axis, &self.rect) {
                continue;
            }
            let wanted = requested.along(axis);
            let (low, high) = body.span(axis);
            let (wall_low, wall_high) = self.rect.span(axis);
            let allowed = if wanted > 0 {
                wall_low.saturating_sub(high).clamp(0, wanted)
            } else if wanted < 0 {
                wall_high.saturating_sub(low).clamp(wanted, 0)
            } else {
                0
            };
            resolved = resolved.with_along(axis, allowed);
            clipped = true;
        }

        if clipped {
            debug!(?requested, ?resolved, rect = ?self.rect, "structure clipped movement");
        } else {
            debug!(body = ?body, rect = ?self.rect, "body already inside structure");
        }
        resolved
    }
}
