use std::hash::{Hash, Hasher};

use crate::geom::Position;

/// Undirected straight connection between two grid positions of one board.
/// Endpoint order carries no meaning: `Wire::new(a, b) == Wire::new(b, a)`.
#[derive(Debug, Clone, Copy)]
pub struct Wire {
    pub pos1: Position,
    pub pos2: Position,
}

impl Wire {
    pub fn new(pos1: impl Into<Position>, pos2: impl Into<Position>) -> Self {
        Self {
            pos1: pos1.into(),
            pos2: pos2.into(),
        }
    }

    pub fn ends(&self) -> [Position; 2] {
        [self.pos1, self.pos2]
    }

    fn ordered(&self) -> (Position, Position) {
        if self.pos1 <= self.pos2 {
            (self.pos1, self.pos2)
        } else {
            (self.pos2, self.pos1)
        }
    }

    pub fn is_zero_length(&self) -> bool {
        self.pos1 == self.pos2
    }

    pub fn has_end(&self, pos: Position) -> bool {
        self.pos1 == pos || self.pos2 == pos
    }

    pub fn other_end(&self, pos: Position) -> Option<Position> {
        if self.pos1 == pos {
            Some(self.pos2)
        } else if self.pos2 == pos {
            Some(self.pos1)
        } else {
            None
        }
    }

    /// Whether `pos` lies on the open interior of an axis-aligned wire.
    /// Endpoints never collide.
    pub fn collision(&self, pos: Position) -> bool {
        let (a, b) = self.ordered();
        if a.y == b.y && pos.y == a.y {
            a.x.min(b.x) < pos.x && pos.x < a.x.max(b.x)
        } else if a.x == b.x && pos.x == a.x {
            a.y.min(b.y) < pos.y && pos.y < a.y.max(b.y)
        } else {
            false
        }
    }

    /// The two halves of this wire when cut at `pos`, if `pos` collides with it.
    pub fn split_at(&self, pos: Position) -> Option<(Wire, Wire)> {
        self.collision(pos)
            .then(|| (Wire::new(self.pos1, pos), Wire::new(pos, self.pos2)))
    }

    /// Joins two wires meeting at `joint` into one when they continue each other in a
    /// straight line.
    pub fn merge(&self, other: &Wire, joint: Position) -> Option<Wire> {
        let a = self.other_end(joint)?;
        let b = other.other_end(joint)?;
        let da = a - joint;
        let db = b - joint;
        (da.cross(db) == 0 && da.dot(db) < 0).then(|| Wire::new(a, b))
    }
}

impl PartialEq for Wire {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Wire {}

impl Hash for Wire {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state)
    }
}
