use crate::lattice::{Level, State};

/// Signal accumulator for one grid position of a board.
///
/// `current` collects everything driven onto the node during the running tick,
/// `original` is the value settled by the previous tick and is what components read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pin {
    current: State,
    original: State,
}

impl Pin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> State {
        self.current
    }

    pub fn original(&self) -> State {
        self.original
    }

    /// Joins `state` into the value being computed. Returns whether it changed.
    pub fn set_state(&mut self, state: State) -> bool {
        let joined = self.current.join(state);
        let changed = joined != self.current;
        self.current = joined;
        changed
    }

    pub fn setup_for_tick(&mut self) {
        self.original = self.current;
        self.current = State::Floating;
    }

    pub fn for_component_read(&self) -> Level {
        self.original.level()
    }

    pub fn reset_to_floating(&mut self) {
        self.current = State::Floating;
        self.original = State::Floating;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_freezes() {
        let mut pin = Pin::new();
        assert!(pin.set_state(State::PulledHigh));
        assert!(!pin.set_state(State::PulledHigh));
        assert!(pin.set_state(State::Low));
        assert_eq!(pin.current(), State::Low);

        pin.setup_for_tick();
        assert_eq!(pin.current(), State::Floating);
        assert_eq!(pin.original(), State::Low);
        assert_eq!(pin.for_component_read(), Level::Low);

        pin.set_state(State::PulledHigh);
        pin.setup_for_tick();
        assert_eq!(pin.original(), State::PulledHigh);
        assert_eq!(pin.for_component_read(), Level::High);

        pin.reset_to_floating();
        assert_eq!(pin, Pin::new());
    }
}
