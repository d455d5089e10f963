use crate::lattice::Level;

use super::{GateImpl, GateOutput};

#[derive(Clone)]
pub struct Nor;

impl GateImpl for Nor {
    fn id() -> &'static str {
        "gate_nor"
    }

    fn display_name() -> &'static str {
        "NOR gate"
    }

    fn init_state() -> Level {
        Level::Floating
    }

    fn fold(state: &mut Level, input: Level) -> GateOutput {
        *state = state.or(input);
        if *state == Level::Illegal {
            GateOutput {
                out: Level::Illegal,
                fin: true,
            }
        } else {
            GateOutput {
                out: state.not(),
                fin: false,
            }
        }
    }
}
