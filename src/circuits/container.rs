use tracing::trace;

use crate::{
    board::Board,
    config::SimConfig,
    geom::{Bounds, ExternalSize, Position},
};

use super::{Direction, PinIo};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Port {
    name: String,
    offset: Position,
}

/// Component wrapping a whole board. The nested board's input and output interfaces
/// become this component's pins, laid out on the nested board's external outline.
///
/// A container read from a file only knows the name of its board until one is
/// supplied with [`Container::supply`].
#[derive(Debug, Clone)]
pub struct Container {
    board_name: String,
    board: Option<Box<Board>>,
    size: ExternalSize,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
}

impl Container {
    pub const ID: &'static str = "board";

    pub fn new(board: Board) -> Self {
        let mut container = Self::unsupplied(board.name());
        container.supply(board);
        container
    }

    pub fn unsupplied(board_name: impl Into<String>) -> Self {
        Self {
            board_name: board_name.into(),
            board: None,
            size: ExternalSize::default(),
            inputs: vec![],
            outputs: vec![],
        }
    }

    pub fn board_name(&self) -> &str {
        &self.board_name
    }

    pub fn is_supplied(&self) -> bool {
        self.board.is_some()
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_deref()
    }

    /// Mutable access to the nested board of a detached container.
    ///
    /// Changes to the board's interfaces only reach this container's pins after
    /// [`Container::refresh`].
    pub fn board_mut(&mut self) -> Option<&mut Board> {
        self.board.as_deref_mut()
    }

    /// Installs `board` as the nested board and derives the pins from it.
    pub fn supply(&mut self, board: Board) {
        self.board_name = board.name().to_owned();
        self.board = Some(Box::new(board));
        self.refresh();
    }

    /// Re-derives pins from the nested board's interfaces.
    pub fn refresh(&mut self) {
        let Some(board) = self.board.as_deref() else {
            return;
        };

        self.size = board.external_size();
        self.inputs.clear();
        self.outputs.clear();

        for interface in board.interfaces() {
            let port = Port {
                name: interface.name().to_owned(),
                offset: self.size.pin_offset(interface.location()),
            };
            match interface.direction() {
                Direction::Input => self.inputs.push(port),
                Direction::Output => self.outputs.push(port),
            }
        }
    }

    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|port| port.name.as_str())
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(|port| port.name.as_str())
    }

    /// Inputs first, then outputs, each in the nested board's placement order.
    pub fn pin_offsets(&self) -> Vec<Position> {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .map(|port| port.offset)
            .collect()
    }

    pub fn bounds(&self) -> Bounds {
        self.size.body()
    }

    /// Evaluates the nested board as a black box: inputs in, one full evaluation and
    /// settling of the nested board, outputs out.
    pub(crate) fn tick(&mut self, io: &mut PinIo<'_>, config: &SimConfig) {
        let Some(board) = self.board.as_deref_mut() else {
            return;
        };

        for (index, port) in self.inputs.iter().enumerate() {
            board.drive_input(&port.name, io.read(index).state());
        }

        board.evaluate(config);
        let (passes, _) = board.settle(config);
        trace!(board = %board.name(), passes, "nested board settled");

        let offset = self.inputs.len();
        for (index, port) in self.outputs.iter().enumerate() {
            if let Some(state) = board.output_state(&port.name) {
                io.drive(offset + index, state);
            }
        }
    }
}
