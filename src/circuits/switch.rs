use crate::{
    error::{Error, Result},
    geom::Position,
};

use super::{Part, Passthrough, PinIo};

/// Manually operated contact. When closed its two pins are shorted like a wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Switch {
    closed: bool,
}

impl Switch {
    pub const ID: &'static str = "switch";

    pub fn new(closed: bool) -> Self {
        Self { closed }
    }

    pub fn from_details(details: &str) -> Result<Self> {
        match details.trim() {
            "closed" => Ok(Self::new(true)),
            "open" | "" => Ok(Self::new(false)),
            other => Err(Error::format(format!("switch: expected open or closed, got {other:?}"))),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    pub fn toggle(&mut self) {
        self.closed = !self.closed;
    }
}

impl Part for Switch {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn details(&self) -> String {
        if self.closed { "closed" } else { "open" }.into()
    }

    fn pin_offsets(&self) -> Vec<Position> {
        vec![Position::new(0, 0), Position::new(2, 0)]
    }
}

impl Passthrough for Switch {
    fn settle(&mut self, io: &mut PinIo<'_>) -> bool {
        if !self.closed {
            return false;
        }
        let (a, b) = (io.current(0), io.current(1));
        if a == b {
            return false;
        }
        let changed_a = io.drive(0, b);
        let changed_b = io.drive(1, a);
        changed_a || changed_b
    }

    fn box_clone(&self) -> Box<dyn Passthrough> {
        Box::new(*self)
    }
}
