use crate::{
    error::{Error, Result},
    geom::Position,
    lattice::State,
};

use super::{Element, Part, PinIo};

/// Drives a fixed state onto its single pin. With a pulled state it acts as a
/// pull-up or pull-down resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant {
    state: State,
}

impl Constant {
    pub const ID: &'static str = "constant";

    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn from_details(details: &str) -> Result<Self> {
        details
            .parse()
            .map(Self::new)
            .map_err(|e| Error::format(format!("constant: {e}")))
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }
}

impl Part for Constant {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn details(&self) -> String {
        self.state.name().into()
    }

    fn pin_offsets(&self) -> Vec<Position> {
        vec![Position::ZERO]
    }
}

impl Element for Constant {
    fn tick(&mut self, io: &mut PinIo<'_>) {
        io.drive(0, self.state);
    }

    fn box_clone(&self) -> Box<dyn Element> {
        Box::new(*self)
    }
}
