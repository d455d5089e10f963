//! Components that can be placed on a board.
//!
//! A [`Component`] is a placed entity: position, rotation and a [`ComponentKind`]
//! that says which capabilities it has. The kinds form a closed set, since the tick
//! engine only ever branches on them:
//!
//! * [`ComponentKind::Element`] is ticked once per tick and drives its outputs.
//! * [`ComponentKind::Passthrough`] takes part in wire settling instead and may ask
//!   for another settling pass.
//! * [`ComponentKind::Interface`] is a named input or output of its board.
//! * [`ComponentKind::Container`] wraps a nested board as a black box.
//!
//! The behaviour behind the first two kinds is open: anything implementing
//! [`Element`] or [`Passthrough`] can be registered with the
//! [`ComponentRegistry`](factory::ComponentRegistry).

use std::{any::Any, collections::HashMap, fmt::Debug};

use crate::{
    geom::{Bounds, Position, Rotation},
    lattice::{Level, State},
    pin::Pin,
};

pub mod constant;
pub mod container;
pub mod diode;
pub mod factory;
pub mod gates;
pub mod interface;
pub mod lamp;
pub mod switch;

pub use container::Container;
pub use interface::{Direction, Interface};

/// Downcasting support for part trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Static description shared by every pluggable component behaviour.
pub trait Part: AsAny + Debug {
    /// Type tag used by the factory and in board files.
    fn id(&self) -> &'static str;

    /// Constructor argument that recreates this part through the factory.
    fn details(&self) -> String;

    /// Pin offsets before rotation.
    fn pin_offsets(&self) -> Vec<Position>;

    /// Local bounding box before rotation.
    fn bounds(&self) -> Bounds {
        Bounds::enclosing(self.pin_offsets()).unwrap_or(Bounds::point(Position::ZERO))
    }

    /// Graphical parts carry a [`Graphic`] block in board files.
    fn is_graphical(&self) -> bool {
        false
    }
}

pub trait Element: Part {
    fn tick(&mut self, io: &mut PinIo<'_>);

    /// Forgets anything remembered from earlier ticks.
    fn reset(&mut self) {}

    fn box_clone(&self) -> Box<dyn Element>;
}

pub trait Passthrough: Part {
    /// Runs once per settling pass. Returns `true` to request another pass.
    fn settle(&mut self, io: &mut PinIo<'_>) -> bool;

    fn box_clone(&self) -> Box<dyn Passthrough>;
}

/// Pins of one component during a tick, indexed like [`Part::pin_offsets`].
pub struct PinIo<'a> {
    pins: &'a mut HashMap<Position, Pin>,
    positions: &'a [Position],
}

impl<'a> PinIo<'a> {
    pub(crate) fn new(pins: &'a mut HashMap<Position, Pin>, positions: &'a [Position]) -> Self {
        Self { pins, positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Settled value from the previous tick.
    pub fn read(&self, index: usize) -> Level {
        self.pin(index).map_or(Level::Floating, Pin::for_component_read)
    }

    /// Value accumulated so far in the running tick.
    pub fn current(&self, index: usize) -> State {
        self.pin(index).map_or(State::Floating, Pin::current)
    }

    /// Joins `state` into the pin. Returns whether the pin changed.
    pub fn drive(&mut self, index: usize, state: State) -> bool {
        match self.positions.get(index) {
            Some(pos) => self.pins.entry(*pos).or_default().set_state(state),
            None => false,
        }
    }

    fn pin(&self, index: usize) -> Option<&Pin> {
        self.positions.get(index).and_then(|pos| self.pins.get(pos))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Graphic {
    pub scale: f32,
    pub location: Option<Position>,
}

impl Default for Graphic {
    fn default() -> Self {
        Self {
            scale: 1.0,
            location: None,
        }
    }
}

#[derive(Debug)]
pub enum ComponentKind {
    Element(Box<dyn Element>),
    Passthrough(Box<dyn Passthrough>),
    Interface(Interface),
    Container(Container),
}

impl Clone for ComponentKind {
    fn clone(&self) -> Self {
        match self {
            Self::Element(e) => Self::Element(e.box_clone()),
            Self::Passthrough(p) => Self::Passthrough(p.box_clone()),
            Self::Interface(i) => Self::Interface(i.clone()),
            Self::Container(c) => Self::Container(c.clone()),
        }
    }
}

impl ComponentKind {
    pub fn element(element: impl Element) -> Self {
        Self::Element(Box::new(element))
    }

    pub fn passthrough(passthrough: impl Passthrough) -> Self {
        Self::Passthrough(Box::new(passthrough))
    }

    fn is_graphical(&self) -> bool {
        match self {
            Self::Element(e) => e.is_graphical(),
            Self::Passthrough(p) => p.is_graphical(),
            _ => false,
        }
    }
}

/// A component, either detached or owned by a board.
#[derive(Debug, Clone)]
pub struct Component {
    kind: ComponentKind,
    position: Position,
    rotation: Rotation,
    graphic: Option<Graphic>,
    pin_positions: Vec<Position>,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        let graphic = kind.is_graphical().then(Graphic::default);

        let mut component = Self {
            kind,
            position: Position::ZERO,
            rotation: Rotation::R0,
            graphic,
            pin_positions: vec![],
        };
        component.update_pin_positions();
        component
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn id(&self) -> &'static str {
        match &self.kind {
            ComponentKind::Element(e) => e.id(),
            ComponentKind::Passthrough(p) => p.id(),
            ComponentKind::Interface(i) => i.id(),
            ComponentKind::Container(_) => Container::ID,
        }
    }

    pub fn details(&self) -> String {
        match &self.kind {
            ComponentKind::Element(e) => e.details(),
            ComponentKind::Passthrough(p) => p.details(),
            ComponentKind::Interface(i) => i.name().to_owned(),
            ComponentKind::Container(c) => c.board_name().to_owned(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn graphic(&self) -> Option<&Graphic> {
        self.graphic.as_ref()
    }

    /// Only graphical components keep graphic data, the call is ignored otherwise.
    pub fn set_graphic(&mut self, graphic: Graphic) {
        if self.graphic.is_some() {
            self.graphic = Some(graphic);
        }
    }

    pub fn pin_offsets(&self) -> Vec<Position> {
        match &self.kind {
            ComponentKind::Element(e) => e.pin_offsets(),
            ComponentKind::Passthrough(p) => p.pin_offsets(),
            ComponentKind::Interface(_) => vec![Position::ZERO],
            ComponentKind::Container(c) => c.pin_offsets(),
        }
    }

    /// Pin offsets rotated and moved to the component's position.
    pub fn pin_positions(&self) -> &[Position] {
        &self.pin_positions
    }

    pub fn local_bounds(&self) -> Bounds {
        match &self.kind {
            ComponentKind::Element(e) => e.bounds(),
            ComponentKind::Passthrough(p) => p.bounds(),
            ComponentKind::Interface(_) => Bounds::point(Position::ZERO),
            ComponentKind::Container(c) => c.bounds(),
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.local_bounds().rotated(self.rotation).offset(self.position)
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self.kind, ComponentKind::Passthrough(_))
    }

    pub fn is_graphical(&self) -> bool {
        self.graphic.is_some()
    }

    pub fn interface(&self) -> Option<&Interface> {
        match &self.kind {
            ComponentKind::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn interface_mut(&mut self) -> Option<&mut Interface> {
        match &mut self.kind {
            ComponentKind::Interface(i) => Some(i),
            _ => None,
        }
    }

    pub fn container(&self) -> Option<&Container> {
        match &self.kind {
            ComponentKind::Container(c) => Some(c),
            _ => None,
        }
    }

    /// Mutable access to a detached container. Placed containers are edited through
    /// [`Board::edit_nested`](crate::board::Board::edit_nested) so the owning board
    /// can keep its pins in step.
    pub fn container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            ComponentKind::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.kind {
            ComponentKind::Element(e) => e.as_ref().as_any().downcast_ref(),
            ComponentKind::Passthrough(p) => p.as_ref().as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Pin layout is fixed for a part's lifetime, so in-place changes through this
    /// reference cannot desynchronize the board.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        match &mut self.kind {
            ComponentKind::Element(e) => e.as_mut().as_any_mut().downcast_mut(),
            ComponentKind::Passthrough(p) => p.as_mut().as_any_mut().downcast_mut(),
            _ => None,
        }
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ComponentKind {
        &mut self.kind
    }

    pub(crate) fn set_placement(&mut self, position: Position, rotation: Rotation) {
        self.position = position;
        self.rotation = rotation;
        self.update_pin_positions();
    }

    pub(crate) fn update_pin_positions(&mut self) {
        let (position, rotation) = (self.position, self.rotation);
        self.pin_positions = self
            .pin_offsets()
            .into_iter()
            .map(|offset| offset.rotated(rotation) + position)
            .collect();
    }
}

impl<T: Element> From<T> for Component {
    fn from(value: T) -> Self {
        Component::new(ComponentKind::element(value))
    }
}

impl From<Interface> for Component {
    fn from(value: Interface) -> Self {
        Component::new(ComponentKind::Interface(value))
    }
}

impl From<Container> for Component {
    fn from(value: Container) -> Self {
        Component::new(ComponentKind::Container(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{constant::Constant, gates::And, gates::Gate, *};

    #[test]
    fn pin_positions_follow_rotation() {
        let mut gate = Component::from(Gate::<And>::new(2));
        assert_eq!(
            gate.pin_offsets(),
            vec![Position::new(0, 0), Position::new(0, 2), Position::new(4, 1)]
        );

        gate.set_placement(Position::new(10, 10), Rotation::R90);
        assert_eq!(
            gate.pin_positions(),
            &[Position::new(10, 10), Position::new(8, 10), Position::new(9, 14)]
        );
        assert_eq!(
            gate.bounds(),
            Bounds::new(Position::new(8, 10), Position::new(10, 14))
        );
    }

    #[test]
    fn downcasts_to_concrete_part() {
        let mut component = Component::from(Constant::new(State::PulledHigh));
        assert_eq!(component.id(), "constant");
        assert_eq!(component.details(), "PULLEDHIGH");
        assert!(component.downcast_ref::<Constant>().is_some());
        assert!(component.downcast_mut::<Gate<And>>().is_none());
        assert!(!component.is_graphical());
    }
}
