use crate::lattice::Level;

use super::{GateImpl, GateOutput};

#[derive(Clone)]
pub struct Or;

impl GateImpl for Or {
    fn id() -> &'static str {
        "gate_or"
    }

    fn display_name() -> &'static str {
        "OR gate"
    }

    fn init_state() -> Level {
        Level::Floating
    }

    fn fold(state: &mut Level, input: Level) -> GateOutput {
        *state = state.or(input);
        GateOutput {
            out: *state,
            fin: *state == Level::Illegal,
        }
    }
}
