//! One simulation step: setup, component evaluation, wire settling.
//!
//! Setup freezes last tick's values into every pin of the board tree and starts the
//! new tick from Floating. Evaluation ticks every non-passthrough component once, in
//! placement order; a container evaluates its nested board completely during its own
//! tick. Settling then shorts every wire and runs every passthrough component of the
//! board and of all nested boards until nothing changes. Since pins only ever move up
//! the join lattice, settling always ends.

use tracing::{debug, warn};

use crate::{
    circuits::{ComponentKind, PinIo},
    config::SimConfig,
    pin::Pin,
};

use super::Board;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Settling passes run on the top-level board, the last one making no change.
    pub settle_passes: usize,
    /// Settling was stopped by [`SimConfig::settle_pass_limit`].
    pub hit_limit: bool,
}

impl Board {
    pub fn tick(&mut self) -> TickStats {
        self.tick_with(&SimConfig::default())
    }

    pub fn tick_with(&mut self, config: &SimConfig) -> TickStats {
        self.setup();
        self.evaluate(config);
        let (settle_passes, hit_limit) = self.settle(config);
        debug!(board = %self.name, settle_passes, "tick complete");

        TickStats {
            settle_passes,
            hit_limit,
        }
    }

    /// Drops unused pins and freezes the rest, nested boards first.
    pub(crate) fn setup(&mut self) {
        for nested in self.nested_boards_mut() {
            nested.setup();
        }

        let connections = &self.connections;
        self.pins.retain(|pos, _| connections.contains_key(pos));
        self.pins.values_mut().for_each(Pin::setup_for_tick);
    }

    pub(crate) fn evaluate(&mut self, config: &SimConfig) {
        for component in self.components.values_mut() {
            let positions = component.pin_positions().to_vec();
            let mut io = PinIo::new(&mut self.pins, &positions);

            match component.kind_mut() {
                ComponentKind::Element(element) => element.tick(&mut io),
                ComponentKind::Interface(interface) => interface.tick(&mut io),
                ComponentKind::Container(container) => container.tick(&mut io, config),
                ComponentKind::Passthrough(_) => {}
            }
        }
    }

    /// Runs settling passes until one makes no change. Returns the number of passes
    /// and whether the pass limit cut settling short.
    pub(crate) fn settle(&mut self, config: &SimConfig) -> (usize, bool) {
        let mut passes = 0;
        loop {
            passes += 1;
            if !self.settle_pass() {
                return (passes, false);
            }
            if config.settle_pass_limit.is_some_and(|limit| passes >= limit) {
                warn!(board = %self.name, passes, "settling stopped at pass limit");
                return (passes, true);
            }
        }
    }

    /// One pass over the wires and passthrough components of this board and every
    /// board nested in it. Returns whether anything changed or asked for another pass.
    fn settle_pass(&mut self) -> bool {
        let mut changed = false;

        for wire in self.wires.values() {
            let a = self.pins.get(&wire.pos1).map_or_else(Default::default, Pin::current);
            let b = self.pins.get(&wire.pos2).map_or_else(Default::default, Pin::current);
            if a == b {
                continue;
            }
            changed |= self.pins.entry(wire.pos1).or_default().set_state(b);
            changed |= self.pins.entry(wire.pos2).or_default().set_state(a);
        }

        for component in self.components.values_mut() {
            if !component.is_passthrough() {
                continue;
            }
            let positions = component.pin_positions().to_vec();
            if let ComponentKind::Passthrough(passthrough) = component.kind_mut() {
                let mut io = PinIo::new(&mut self.pins, &positions);
                changed |= passthrough.settle(&mut io);
            }
        }

        for nested in self.nested_boards_mut() {
            changed |= nested.settle_pass();
        }

        changed
    }

    /// Clears every pin in the board tree, as when leaving simulation.
    pub fn reset_to_floating(&mut self) {
        for nested in self.nested_boards_mut() {
            nested.reset_to_floating();
        }
        self.pins.values_mut().for_each(Pin::reset_to_floating);

        for component in self.components.values_mut() {
            if let ComponentKind::Element(element) = component.kind_mut() {
                element.reset();
            }
        }
    }
}
