use crate::lattice::Level;

use super::{GateImpl, GateOutput};

#[derive(Clone)]
pub struct Nand;

impl GateImpl for Nand {
    fn id() -> &'static str {
        "gate_nand"
    }

    fn display_name() -> &'static str {
        "NAND gate"
    }

    fn init_state() -> Level {
        Level::Floating
    }

    fn fold(state: &mut Level, input: Level) -> GateOutput {
        *state = state.and(input);
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
