//! Grid-based digital logic simulation.
//!
//! Circuits are drawn on integer grids: a [`Board`] holds wires between grid
//! positions and components whose pins sit on grid positions. Every position that
//! is touched carries a [`State`] from the join lattice in [`lattice`], and
//! [`Board::tick`] advances the whole board tree by one step. Boards can be nested
//! inside other boards as black-box components and stored in the binary format of
//! [`io`].

pub mod board;
pub mod circuits;
pub mod config;
pub mod error;
pub mod geom;
pub mod io;
pub mod lattice;
pub mod pin;
pub mod registry;
pub mod str;
pub mod wire;

pub use board::{Board, ComponentId, TickStats, WireId};
pub use circuits::{Component, ComponentKind};
pub use config::SimConfig;
pub use error::{Error, PlacementError, Result};
pub use geom::{Position, Rotation};
pub use lattice::{Level, State};
pub use registry::BoardId;
