use crate::{
    geom::{InterfaceLocation, Side},
    lattice::State,
};

use super::PinIo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

/// Named input or output of a board. When the board is nested in a container
/// component, every interface becomes one pin on the container's outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    name: String,
    direction: Direction,
    location: InterfaceLocation,
    value: State,
}

impl Interface {
    pub const INPUT_ID: &'static str = "board_input";
    pub const OUTPUT_ID: &'static str = "board_output";

    /// An input on the left side, distance assigned on placement.
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, Direction::Input, InterfaceLocation::new(Side::Left, 0))
    }

    /// An output on the right side, distance assigned on placement.
    pub fn output(name: impl Into<String>) -> Self {
        Self::new(name, Direction::Output, InterfaceLocation::new(Side::Right, 0))
    }

    pub fn new(name: impl Into<String>, direction: Direction, location: InterfaceLocation) -> Self {
        Self {
            name: name.into(),
            direction,
            location,
            value: State::Floating,
        }
    }

    pub fn at(mut self, location: InterfaceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn id(&self) -> &'static str {
        match self.direction {
            Direction::Input => Self::INPUT_ID,
            Direction::Output => Self::OUTPUT_ID,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    pub fn location(&self) -> InterfaceLocation {
        self.location
    }

    pub fn set_location(&mut self, location: InterfaceLocation) {
        self.location = location;
    }

    /// State an input drives onto its pin every tick.
    pub fn value(&self) -> State {
        self.value
    }

    pub fn set_value(&mut self, value: State) {
        self.value = value;
    }

    pub(crate) fn tick(&mut self, io: &mut PinIo<'_>) {
        if self.is_input() {
            io.drive(0, self.value);
        }
    }
}
