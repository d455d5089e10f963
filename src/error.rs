use thiserror::Error;

use crate::geom::{InterfaceLocation, Position};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// A handle points at a wire or component that has been removed.
    #[error("{what} has been removed from its board")]
    Disposed { what: &'static str },

    #[error("no interface named {0:?} on this board")]
    UnknownInterface(String),

    #[error("invalid board file: {0}")]
    Format(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub(crate) fn disposed_component() -> Self {
        Self::Disposed { what: "component" }
    }

    pub(crate) fn disposed_wire() -> Self {
        Self::Disposed { what: "wire" }
    }
}

/// Rejected placement. The board is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("component at {at} overlaps an already placed component")]
    Overlap { at: Position },

    #[error("position {at} is outside the usable grid")]
    OutOfRange { at: Position },

    #[error("interface name {0:?} is already used on this board")]
    DuplicateInterfaceName(String),

    #[error("interface location {0} is already used on this board")]
    DuplicateInterfaceLocation(InterfaceLocation),

    #[error("board component {0:?} has no nested board")]
    Unsupplied(String),
}
