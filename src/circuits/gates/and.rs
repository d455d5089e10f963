use crate::lattice::Level;

use super::{GateImpl, GateOutput};

#[derive(Clone)]
pub struct And;

impl GateImpl for And {
    fn id() -> &'static str {
        "gate_and"
    }

    fn display_name() -> &'static str {
        "AND gate"
    }

    fn init_state() -> Level {
        Level::Floating
    }

    fn fold(state: &mut Level, input: Level) -> GateOutput {
        *state = state.and(input);
        GateOutput {
            out: *state,
            fin: *state == Level::Illegal,
        }
    }
}
