use std::{
    fmt,
    ops::{Add, Neg, Sub},
    str::FromStr,
};

/// Largest coordinate magnitude a placed component or a board outline may use.
pub const COORD_LIMIT: i32 = 1 << 24;

/// Grid point. Arithmetic saturates at the `i32` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ZERO: Position = Position { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn rotated(self, rotation: Rotation) -> Position {
        let Position { x, y } = self;
        match rotation {
            Rotation::R0 => Position::new(x, y),
            Rotation::R90 => Position::new(y.saturating_neg(), x),
            Rotation::R180 => Position::new(x.saturating_neg(), y.saturating_neg()),
            Rotation::R270 => Position::new(y, x.saturating_neg()),
        }
    }

    /// Both coordinates within [`COORD_LIMIT`].
    pub fn in_range(self) -> bool {
        (-COORD_LIMIT..=COORD_LIMIT).contains(&self.x)
            && (-COORD_LIMIT..=COORD_LIMIT).contains(&self.y)
    }

    /// Z component of the cross product of `self` and `other` seen as vectors.
    pub fn cross(self, other: Position) -> i64 {
        self.x as i64 * other.y as i64 - self.y as i64 * other.x as i64
    }

    pub fn dot(self, other: Position) -> i64 {
        self.x as i64 * other.x as i64 + self.y as i64 * other.y as i64
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Self) -> Self::Output {
        Position::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Self) -> Self::Output {
        Position::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl Neg for Position {
    type Output = Position;

    fn neg(self) -> Self::Output {
        Position::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Quarter turn applied to a component's local geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    pub fn quarter_turns(self) -> u8 {
        self as u8
    }

    pub fn from_quarter_turns(turns: u8) -> Rotation {
        Rotation::ALL[(turns % 4) as usize]
    }

    pub fn then(self, other: Rotation) -> Rotation {
        Rotation::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }

    pub fn name(self) -> &'static str {
        match self {
            Rotation::R0 => "R0",
            Rotation::R90 => "R90",
            Rotation::R180 => "R180",
            Rotation::R270 => "R270",
        }
    }
}

impl FromStr for Rotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rotation::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| format!("unknown rotation {s:?}"))
    }
}

/// Inclusive axis-aligned box in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    pub fn new(a: Position, b: Position) -> Self {
        Self {
            min: Position::new(a.x.min(b.x), a.y.min(b.y)),
            max: Position::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn point(pos: Position) -> Self {
        Self { min: pos, max: pos }
    }

    /// Smallest box containing every position, `None` for an empty iterator.
    pub fn enclosing(positions: impl IntoIterator<Item = Position>) -> Option<Self> {
        positions.into_iter().fold(None, |acc, pos| {
            Some(match acc {
                None => Bounds::point(pos),
                Some(b) => b.including(pos),
            })
        })
    }

    pub fn including(self, pos: Position) -> Self {
        Self {
            min: Position::new(self.min.x.min(pos.x), self.min.y.min(pos.y)),
            max: Position::new(self.max.x.max(pos.x), self.max.y.max(pos.y)),
        }
    }

    pub fn rotated(self, rotation: Rotation) -> Self {
        Bounds::new(self.min.rotated(rotation), self.max.rotated(rotation))
    }

    pub fn offset(self, by: Position) -> Self {
        Self {
            min: self.min + by,
            max: self.max + by,
        }
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Edge of a board's external outline that an interface component sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn name(self) -> &'static str {
        match self {
            Side::Top => "Top",
            Side::Bottom => "Bottom",
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }

    /// Whether distances along this side are measured on the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Side::ALL
            .into_iter()
            .find(|side| side.name() == s)
            .ok_or_else(|| format!("unknown side {s:?}"))
    }
}

/// Where an interface component appears on the outline of its board when the board
/// is used as a component. A distance of 0 means "not assigned yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceLocation {
    pub side: Side,
    pub distance: i32,
}

impl InterfaceLocation {
    pub fn new(side: Side, distance: i32) -> Self {
        Self { side, distance }
    }

    pub fn is_assigned(&self) -> bool {
        self.distance != 0
    }
}

impl fmt::Display for InterfaceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.side.name(), self.distance)
    }
}

/// Outline of a board seen from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExternalSize {
    pub width: i32,
    pub height: i32,
}

impl ExternalSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Length of the given side.
    pub fn along(&self, side: Side) -> i32 {
        if side.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }

    /// Grows the outline just enough for `location` to fall inside it.
    pub fn fit(&mut self, location: InterfaceLocation) -> bool {
        let needed = location.distance.saturating_add(1);
        let len = if location.side.is_horizontal() {
            &mut self.width
        } else {
            &mut self.height
        };
        if *len < needed {
            *len = needed;
            true
        } else {
            false
        }
    }

    /// Local offset of the pin for an interface at `location`.
    pub fn pin_offset(&self, location: InterfaceLocation) -> Position {
        let d = location.distance;
        match location.side {
            Side::Top => Position::new(d, 0),
            Side::Bottom => Position::new(d, self.height),
            Side::Left => Position::new(0, d),
            Side::Right => Position::new(self.width, d),
        }
    }

    /// Both lengths within `0..=COORD_LIMIT`.
    pub fn in_range(&self) -> bool {
        (0..=COORD_LIMIT).contains(&self.width) && (0..=COORD_LIMIT).contains(&self.height)
    }

    pub fn body(&self) -> Bounds {
        Bounds::new(Position::ZERO, Position::new(self.width, self.height))
    }
}
