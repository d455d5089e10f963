use crate::{geom::Position, lattice::Level};

use super::{Element, Part, PinIo};

/// Indicator showing the level on its pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lamp {
    level: Level,
}

impl Lamp {
    pub const ID: &'static str = "lamp";

    pub fn new() -> Self {
        Self::default()
    }

    /// Level read during the most recent tick.
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Part for Lamp {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn details(&self) -> String {
        String::new()
    }

    fn pin_offsets(&self) -> Vec<Position> {
        vec![Position::ZERO]
    }

    fn is_graphical(&self) -> bool {
        true
    }
}

impl Element for Lamp {
    fn tick(&mut self, io: &mut PinIo<'_>) {
        self.level = io.read(0);
    }

    fn reset(&mut self) {
        self.level = Level::Floating;
    }

    fn box_clone(&self) -> Box<dyn Element> {
        Box::new(*self)
    }
}
