//! Signal values carried by pins and wires.
//!
//! [`State`] is what sits on an electrical node while a tick is in progress. Several
//! drivers on one node are combined with [`State::join`], which is commutative,
//! associative, idempotent and has [`State::Illegal`] as its absorbing element, so
//! repeated propagation always reaches a fixed point.
//!
//! Components never observe the pulled states. They read a [`Level`], which is the
//! pull-collapsed view of a state, and the boolean operators are only defined on
//! levels.

use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Floating,
    Low,
    PulledLow,
    High,
    PulledHigh,
    Illegal,
}

impl State {
    pub const ALL: [State; 6] = [
        State::Floating,
        State::Low,
        State::PulledLow,
        State::High,
        State::PulledHigh,
        State::Illegal,
    ];

    /// Value of a node driven by both `self` and `other`.
    pub fn join(self, other: State) -> State {
        use State::*;

        match (self, other) {
            (a, b) if a == b => a,
            (Illegal, _) | (_, Illegal) => Illegal,
            (Floating, x) | (x, Floating) => x,
            (Low, High) | (High, Low) => Illegal,
            (PulledLow, PulledHigh) | (PulledHigh, PulledLow) => Illegal,
            (Low, PulledLow | PulledHigh) | (PulledLow | PulledHigh, Low) => Low,
            (High, PulledLow | PulledHigh) | (PulledLow | PulledHigh, High) => High,
            // Every unordered pair is covered above; equal pairs took the first arm.
            (a, _) => a,
        }
    }

    /// Collapses pull resistors into the value they pull towards.
    pub fn pulled(self) -> State {
        match self {
            State::PulledLow => State::Low,
            State::PulledHigh => State::High,
            other => other,
        }
    }

    /// The value a component observes on a node in this state.
    pub fn level(self) -> Level {
        match self {
            State::Floating => Level::Floating,
            State::Low | State::PulledLow => Level::Low,
            State::High | State::PulledHigh => Level::High,
            State::Illegal => Level::Illegal,
        }
    }

    pub fn is_pulled(self) -> bool {
        matches!(self, State::PulledLow | State::PulledHigh)
    }

    pub fn name(self) -> &'static str {
        match self {
            State::Floating => "FLOATING",
            State::Low => "LOW",
            State::PulledLow => "PULLEDLOW",
            State::High => "HIGH",
            State::PulledHigh => "PULLEDHIGH",
            State::Illegal => "ILLEGAL",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signal state {0:?}")]
pub struct ParseStateError(pub String);

impl FromStr for State {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        State::ALL
            .into_iter()
            .find(|state| state.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStateError(s.into()))
    }
}

/// Pull-collapsed signal value, the only thing boolean logic operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Level {
    #[default]
    Floating,
    Low,
    High,
    Illegal,
}

impl Level {
    pub fn from_bool(value: bool) -> Level {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Level::Low => Some(false),
            Level::High => Some(true),
            _ => None,
        }
    }

    pub fn state(self) -> State {
        match self {
            Level::Floating => State::Floating,
            Level::Low => State::Low,
            Level::High => State::High,
            Level::Illegal => State::Illegal,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
            other => other,
        }
    }

    pub fn and(self, other: Level) -> Level {
        self.binary(other, |a, b| a && b)
    }

    pub fn or(self, other: Level) -> Level {
        self.binary(other, |a, b| a || b)
    }

    pub fn xor(self, other: Level) -> Level {
        self.binary(other, |a, b| a != b)
    }

    /// Illegal absorbs, Floating passes the other operand through, two driven
    /// levels go through `op`.
    fn binary(self, other: Level, op: impl FnOnce(bool, bool) -> bool) -> Level {
        match (self, other) {
            (Level::Illegal, _) | (_, Level::Illegal) => Level::Illegal,
            (Level::Floating, x) | (x, Level::Floating) => x,
            (a, b) => match (a.as_bool(), b.as_bool()) {
                (Some(a), Some(b)) => Level::from_bool(op(a, b)),
                _ => Level::Illegal,
            },
        }
    }
}

impl From<Level> for State {
    fn from(value: Level) -> Self {
        value.state()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.state(), f)
    }
}
