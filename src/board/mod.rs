//! Boards: the pins, wires and components of one circuit level.
//!
//! A board owns a sparse map of [`Pin`]s keyed by position, its wires and its
//! components. Components that wrap another board own that board, so boards form a
//! tree; the identity of every live board is tracked by the
//! [registry](crate::registry).
//!
//! Wires and components are addressed through [`WireId`] and [`ComponentId`]
//! handles. Sequence numbers are never reused within a board, so a handle to
//! something that has been removed stays invalid and yields
//! [`Error::Disposed`].

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    hash::{Hash, Hasher},
};

use tracing::debug;

use crate::{
    circuits::{Component, ComponentKind, Container, Direction, Interface},
    error::{Error, PlacementError, Result},
    geom::{ExternalSize, InterfaceLocation, Position, Rotation},
    lattice::{Level, State},
    pin::Pin,
    registry::{registry, BoardId},
    wire::Wire,
};

mod simplify;
mod tick;

pub use tick::TickStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    board: BoardId,
    seq: u64,
}

impl ComponentId {
    pub fn board(&self) -> BoardId {
        self.board
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId {
    board: BoardId,
    seq: u64,
}

impl WireId {
    pub fn board(&self) -> BoardId {
        self.board
    }
}

#[derive(Debug)]
pub struct Board {
    id: BoardId,
    name: String,
    external_size: ExternalSize,
    pins: HashMap<Position, Pin>,
    /// Wire ends plus distinct component pin positions touching each position.
    connections: HashMap<Position, u32>,
    wires: BTreeMap<u64, Wire>,
    wire_index: HashMap<Wire, u64>,
    components: BTreeMap<u64, Component>,
    interfaces: HashMap<String, u64>,
    next_seq: u64,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        let id = registry().add();
        debug!(%id, "board created");

        Self {
            id,
            name: name.into(),
            external_size: ExternalSize::default(),
            pins: HashMap::new(),
            connections: HashMap::new(),
            wires: BTreeMap::new(),
            wire_index: HashMap::new(),
            components: BTreeMap::new(),
            interfaces: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn id(&self) -> BoardId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn external_size(&self) -> ExternalSize {
        self.external_size
    }

    /// Changing the outline of a board that is already nested only reaches the
    /// container's pins through [`Board::edit_nested`].
    pub fn set_external_size(&mut self, size: ExternalSize) {
        self.external_size = size;
    }

    /// Root of the board tree this board belongs to.
    pub fn top_level(&self) -> BoardId {
        registry().top_level(self.id).unwrap_or(self.id)
    }

    /// Finds `id` in this board's subtree.
    pub fn find_board(&self, id: BoardId) -> Option<&Board> {
        if self.id == id {
            return Some(self);
        }
        self.nested_boards().find_map(|board| board.find_board(id))
    }

    pub fn nested_boards(&self) -> impl Iterator<Item = &Board> {
        self.components
            .values()
            .filter_map(|c| c.container().and_then(Container::board))
    }

    pub(crate) fn nested_boards_mut(&mut self) -> impl Iterator<Item = &mut Board> {
        self.components.values_mut().filter_map(|c| match c.kind_mut() {
            ComponentKind::Container(container) => container.board_mut(),
            _ => None,
        })
    }

    // Pins

    pub fn pin(&self, pos: Position) -> Option<&Pin> {
        self.pins.get(&pos)
    }

    pub fn pin_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.pins.keys().copied()
    }

    /// Number of wire ends and components touching `pos`.
    pub fn connections(&self, pos: Position) -> u32 {
        self.connections.get(&pos).copied().unwrap_or(0)
    }

    /// Settled state of the node at `pos` after the last tick.
    pub fn state_at(&self, pos: Position) -> State {
        self.pins.get(&pos).map_or(State::Floating, Pin::current)
    }

    pub fn level_at(&self, pos: Position) -> Level {
        self.state_at(pos).level()
    }

    fn connect(&mut self, pos: Position) {
        *self.connections.entry(pos).or_default() += 1;
        self.pins.entry(pos).or_default();
    }

    fn disconnect(&mut self, pos: Position) {
        if let Some(count) = self.connections.get_mut(&pos) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.connections.remove(&pos);
            }
        }
    }

    // Wires

    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> + '_ {
        self.wires.iter().map(|(seq, wire)| (self.wire_id(*seq), wire))
    }

    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    pub fn wire(&self, id: WireId) -> Result<&Wire> {
        self.wire_seq(id)
            .and_then(|seq| self.wires.get(&seq))
            .ok_or_else(Error::disposed_wire)
    }

    pub fn find_wire(&self, wire: Wire) -> Option<WireId> {
        self.wire_index.get(&wire).map(|seq| self.wire_id(*seq))
    }

    /// Connects two positions. Adding a wire equal to an existing one returns the
    /// existing handle.
    pub fn add_wire(&mut self, pos1: impl Into<Position>, pos2: impl Into<Position>) -> WireId {
        let wire = Wire::new(pos1, pos2);
        if let Some(existing) = self.find_wire(wire) {
            return existing;
        }

        let seq = self.take_seq();
        for end in wire.ends() {
            self.connect(end);
        }
        self.wires.insert(seq, wire);
        self.wire_index.insert(wire, seq);
        self.wire_id(seq)
    }

    /// Returns `false` if the wire was already removed.
    pub fn remove_wire(&mut self, id: WireId) -> bool {
        let Some(wire) = self.wire_seq(id).and_then(|seq| self.wires.remove(&seq)) else {
            return false;
        };
        self.wire_index.remove(&wire);
        for end in wire.ends() {
            self.disconnect(end);
        }
        true
    }

    /// Replaces the wire with two wires meeting at `pos` if `pos` lies on its
    /// interior. Returns whether a split happened.
    pub fn try_split_wire(&mut self, id: WireId, pos: Position) -> Result<bool> {
        let wire = *self.wire(id)?;
        let Some((first, second)) = wire.split_at(pos) else {
            return Ok(false);
        };

        self.remove_wire(id);
        self.add_wire(first.pos1, first.pos2);
        self.add_wire(second.pos1, second.pos2);
        Ok(true)
    }

    fn wire_id(&self, seq: u64) -> WireId {
        WireId {
            board: self.id,
            seq,
        }
    }

    fn wire_seq(&self, id: WireId) -> Option<u64> {
        (id.board == self.id).then_some(id.seq)
    }

    // Components

    /// Components in placement order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> + '_ {
        self.components
            .iter()
            .map(|(seq, component)| (self.component_id(*seq), component))
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn component(&self, id: ComponentId) -> Result<&Component> {
        self.component_seq(id)
            .and_then(|seq| self.components.get(&seq))
            .ok_or_else(Error::disposed_component)
    }

    /// Mutable access for changing component state. Placement and pin layout are
    /// not reachable through it.
    pub fn component_mut(&mut self, id: ComponentId) -> Result<&mut Component> {
        self.component_seq(id)
            .and_then(|seq| self.components.get_mut(&seq))
            .ok_or_else(Error::disposed_component)
    }

    /// Places a detached component. Fails without touching the board when the
    /// component would overlap another one or clash with an existing interface.
    pub fn place(
        &mut self,
        component: impl Into<Component>,
        position: impl Into<Position>,
        rotation: Rotation,
    ) -> Result<ComponentId> {
        let position = position.into();
        if !position.in_range() {
            return Err(PlacementError::OutOfRange { at: position }.into());
        }

        let mut component = component.into();
        component.set_placement(position, rotation);
        self.check_placement(&component, None)?;

        let seq = self.take_seq();
        self.insert(seq, component);
        Ok(self.component_id(seq))
    }

    /// Checks whether `component`, at its current position and rotation, could be
    /// placed on this board.
    pub fn can_place(&self, component: &Component) -> Result<(), PlacementError> {
        self.check_placement(component, None)
    }

    fn check_placement(
        &self,
        component: &Component,
        ignore: Option<u64>,
    ) -> Result<(), PlacementError> {
        if let Some(container) = component.container() {
            if !container.is_supplied() {
                return Err(PlacementError::Unsupplied(container.board_name().into()));
            }
        }

        if let Some(interface) = component.interface() {
            if self
                .interfaces
                .get(interface.name())
                .is_some_and(|seq| Some(*seq) != ignore)
            {
                return Err(PlacementError::DuplicateInterfaceName(interface.name().into()));
            }

            let location = interface.location();
            if location.is_assigned()
                && self
                    .interface_components()
                    .any(|(seq, other)| Some(seq) != ignore && other.location() == location)
            {
                return Err(PlacementError::DuplicateInterfaceLocation(location));
            }
        }

        let bounds = component.bounds();
        let overlapping = self
            .components
            .iter()
            .any(|(seq, other)| Some(*seq) != ignore && other.bounds().overlaps(&bounds));
        if overlapping {
            return Err(PlacementError::Overlap {
                at: component.position(),
            });
        }

        Ok(())
    }

    fn insert(&mut self, seq: u64, mut component: Component) {
        if let Some(interface) = component.interface_mut() {
            if !interface.location().is_assigned() {
                let side = interface.location().side;
                let distance = next_free_distance(
                    self.interface_components()
                        .filter(|(_, i)| i.location().side == side)
                        .map(|(_, i)| i.location().distance),
                );
                interface.set_location(InterfaceLocation::new(side, distance));
            }
            if self.external_size.fit(interface.location()) {
                debug!(board = %self.name, size = ?self.external_size, "external size grown");
            }
            self.interfaces.insert(interface.name().to_owned(), seq);
        }

        if let Some(nested) = component.container().and_then(Container::board) {
            registry().set_owner(nested.id(), Some(self.id));
        }

        let positions: BTreeSet<Position> = component.pin_positions().iter().copied().collect();
        for pos in positions {
            self.connect(pos);
        }

        self.components.insert(seq, component);
    }

    fn take(&mut self, seq: u64) -> Option<Component> {
        let component = self.components.remove(&seq)?;

        let positions: BTreeSet<Position> = component.pin_positions().iter().copied().collect();
        for pos in positions {
            self.disconnect(pos);
        }

        if let Some(interface) = component.interface() {
            self.interfaces.remove(interface.name());
        }

        if let Some(nested) = component.container().and_then(Container::board) {
            registry().set_owner(nested.id(), None);
        }

        Some(component)
    }

    /// Detaches a component and hands it back. Returns `None` when the handle was
    /// already removed. The signal left on its pins stays until the next tick.
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Component> {
        let seq = self.component_seq(id)?;
        self.take(seq)
    }

    /// Edits the board nested in a container component and re-derives the
    /// container's pins. If the container no longer fits where it is, the edit is
    /// rolled back and the placement error returned.
    pub fn edit_nested<R>(
        &mut self,
        id: ComponentId,
        edit: impl FnOnce(&mut Board) -> R,
    ) -> Result<R> {
        let seq = self
            .component_seq(id)
            .filter(|seq| self.components.contains_key(seq))
            .ok_or_else(Error::disposed_component)?;
        if self.components[&seq].container().is_none() {
            return Err(Error::format("component does not wrap a board"));
        }

        let Some(mut component) = self.take(seq) else {
            return Err(Error::disposed_component());
        };
        let backup = component.clone();

        let result = match component.container_mut().and_then(Container::board_mut) {
            Some(board) => edit(board),
            None => {
                self.insert(seq, component);
                return Err(Error::disposed_component());
            }
        };
        if let Some(container) = component.container_mut() {
            container.refresh();
        }
        component.update_pin_positions();

        match self.check_placement(&component, Some(seq)) {
            Ok(()) => {
                self.insert(seq, component);
                Ok(result)
            }
            Err(error) => {
                drop(component);
                self.insert(seq, backup);
                Err(error.into())
            }
        }
    }

    pub fn nested(&self, id: ComponentId) -> Result<&Board> {
        self.component(id)?
            .container()
            .and_then(Container::board)
            .ok_or_else(|| Error::format("component does not wrap a board"))
    }

    fn component_id(&self, seq: u64) -> ComponentId {
        ComponentId {
            board: self.id,
            seq,
        }
    }

    fn component_seq(&self, id: ComponentId) -> Option<u64> {
        (id.board == self.id).then_some(id.seq)
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    // Interfaces

    fn interface_components(&self) -> impl Iterator<Item = (u64, &Interface)> + '_ {
        self.components
            .iter()
            .filter_map(|(seq, c)| c.interface().map(|i| (*seq, i)))
    }

    /// Interface components in placement order.
    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> + '_ {
        self.interface_components().map(|(_, i)| i)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Interface> + '_ {
        self.interfaces().filter(|i| i.direction() == Direction::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Interface> + '_ {
        self.interfaces().filter(|i| i.direction() == Direction::Output)
    }

    pub fn interface(&self, name: &str) -> Option<(ComponentId, &Interface)> {
        let seq = *self.interfaces.get(name)?;
        let interface = self.components.get(&seq)?.interface()?;
        Some((self.component_id(seq), interface))
    }

    /// Sets the state a named input drives from the next tick on.
    pub fn set_input(&mut self, name: &str, state: State) -> Result<()> {
        if self.drive_input(name, state) {
            Ok(())
        } else {
            Err(Error::UnknownInterface(name.into()))
        }
    }

    /// Settled state on a named output.
    pub fn output(&self, name: &str) -> Result<State> {
        self.output_state(name)
            .ok_or_else(|| Error::UnknownInterface(name.into()))
    }

    pub(crate) fn drive_input(&mut self, name: &str, state: State) -> bool {
        let Some(seq) = self.interfaces.get(name) else {
            return false;
        };
        match self.components.get_mut(seq).and_then(Component::interface_mut) {
            Some(interface) if interface.is_input() => {
                interface.set_value(state);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn output_state(&self, name: &str) -> Option<State> {
        let seq = self.interfaces.get(name)?;
        let component = self.components.get(seq)?;
        match component.interface() {
            Some(interface) if !interface.is_input() => {
                Some(self.state_at(*component.pin_positions().first()?))
            }
            _ => None,
        }
    }
}

/// Smallest odd distance not in `used`.
fn next_free_distance(used: impl IntoIterator<Item = i32>) -> i32 {
    let used: BTreeSet<i32> = used.into_iter().collect();
    (1..).step_by(2).find(|d| !used.contains(d)).unwrap_or(1)
}

impl Clone for Board {
    /// Deep copy under a fresh identity.
    fn clone(&self) -> Self {
        let mut board = Board::new(self.name.clone());
        board.external_size = self.external_size;
        board.pins = self.pins.clone();
        board.connections = self.connections.clone();
        board.wires = self.wires.clone();
        board.wire_index = self.wire_index.clone();
        board.components = self.components.clone();
        board.interfaces = self.interfaces.clone();
        board.next_seq = self.next_seq;

        let id = board.id;
        for nested in board.nested_boards() {
            registry().set_owner(nested.id(), Some(id));
        }
        board
    }
}

/// Boards compare by live identity, not by content.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        registry().release(self.id);
    }
}
