use crate::lattice::Level;

use super::{GateImpl, GateOutput};

#[derive(Clone)]
pub struct Xor;

impl GateImpl for Xor {
    fn id() -> &'static str {
        "gate_xor"
    }

    fn display_name() -> &'static str {
        "XOR gate"
    }

    fn init_state() -> Level {
        Level::Floating
    }

    // TODO: =1 mode
    fn fold(state: &mut Level, input: Level) -> GateOutput {
        *state = state.xor(input);

        GateOutput {
            out: *state,
            fin: *state == Level::Illegal,
        }
    }
}
