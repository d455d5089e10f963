//! Multi-input gates built as folds over their input levels.

use std::{fmt, marker::PhantomData};

use crate::{
    error::{Error, Result},
    geom::Position,
    lattice::Level,
};

use super::{Element, Part, PinIo};

mod and;
mod nand;
mod nor;
mod or;
mod xnor;
mod xor;

pub use and::And;
pub use nand::Nand;
pub use nor::Nor;
pub use or::Or;
pub use xnor::Xnor;
pub use xor::Xor;

pub const DEFAULT_INPUTS: usize = 2;
pub const MAX_INPUTS: usize = 256;

pub struct GateOutput {
    /// Output level if no further input is folded in.
    pub out: Level,
    /// No later input can change `out`.
    pub fin: bool,
}

pub trait GateImpl: Clone + Send + Sync + 'static {
    fn id() -> &'static str;
    fn display_name() -> &'static str;
    fn init_state() -> Level;
    fn fold(state: &mut Level, input: Level) -> GateOutput;
}

/// A gate with `inputs` input pins stacked on its left edge and one output on the right.
pub struct Gate<G: GateImpl> {
    inputs: usize,
    _impl: PhantomData<G>,
}

impl<G: GateImpl> Gate<G> {
    pub fn new(inputs: usize) -> Self {
        Self {
            inputs: inputs.clamp(1, MAX_INPUTS),
            _impl: PhantomData,
        }
    }

    /// Parses the input count stored in a gate's details, empty meaning the default.
    pub fn from_details(details: &str) -> Result<Self> {
        let details = details.trim();
        if details.is_empty() {
            return Ok(Self::new(DEFAULT_INPUTS));
        }
        match details.parse::<usize>() {
            Ok(inputs) if (1..=MAX_INPUTS).contains(&inputs) => Ok(Self::new(inputs)),
            _ => Err(Error::format(format!(
                "{} expects 1 to {MAX_INPUTS} inputs, got {details:?}",
                G::id()
            ))),
        }
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn evaluate(inputs: impl IntoIterator<Item = Level>) -> Level {
        let mut state = G::init_state();
        let mut out = state;
        for input in inputs {
            let output = G::fold(&mut state, input);
            out = output.out;
            if output.fin {
                break;
            }
        }
        out
    }
}

impl<G: GateImpl> Clone for Gate<G> {
    fn clone(&self) -> Self {
        Self::new(self.inputs)
    }
}

impl<G: GateImpl> fmt::Debug for Gate<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(G::display_name())
            .field("inputs", &self.inputs)
            .finish()
    }
}

impl<G: GateImpl> Part for Gate<G> {
    fn id(&self) -> &'static str {
        G::id()
    }

    fn details(&self) -> String {
        self.inputs.to_string()
    }

    fn pin_offsets(&self) -> Vec<Position> {
        let n = self.inputs as i32;
        (0..n)
            .map(|i| Position::new(0, i * 2))
            .chain([Position::new(4, n - 1)])
            .collect()
    }
}

impl<G: GateImpl> Element for Gate<G> {
    fn tick(&mut self, io: &mut PinIo<'_>) {
        let out = Self::evaluate((0..self.inputs).map(|i| io.read(i)));
        io.drive(self.inputs, out.state());
    }

    fn box_clone(&self) -> Box<dyn Element> {
        Box::new(self.clone())
    }
}
