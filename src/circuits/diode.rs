use crate::geom::Position;

use super::{Part, Passthrough, PinIo};

/// One-way wire: whatever reaches the anode (pin 0) is copied to the cathode (pin 1)
/// during settling, nothing flows back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diode;

impl Diode {
    pub const ID: &'static str = "diode";
}

impl Part for Diode {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn details(&self) -> String {
        String::new()
    }

    fn pin_offsets(&self) -> Vec<Position> {
        vec![Position::new(0, 0), Position::new(2, 0)]
    }
}

impl Passthrough for Diode {
    fn settle(&mut self, io: &mut PinIo<'_>) -> bool {
        let anode = io.current(0);
        io.drive(1, anode)
    }

    fn box_clone(&self) -> Box<dyn Passthrough> {
        Box::new(*self)
    }
}
