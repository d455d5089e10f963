use crate::lattice::Level;

use super::{GateImpl, GateOutput};

#[derive(Clone)]
pub struct Xnor;

impl GateImpl for Xnor {
    fn id() -> &'static str {
        "gate_xnor"
    }

    fn display_name() -> &'static str {
        "XNOR gate"
    }

    fn init_state() -> Level {
        Level::Floating
    }

    fn fold(state: &mut Level, input: Level) -> GateOutput {
        *state = state.xor(input);

        GateOutput {
            out: state.not(),
            fin: *state == Level::Illegal,
        }
    }
}
