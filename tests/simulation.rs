//! Whole-board behaviour of the tick engine.

use wiregrid::{
    circuits::{
        constant::Constant,
        container::Container,
        diode::Diode,
        gates::{And, Gate, Xor},
        lamp::Lamp,
        switch::Switch,
        ComponentKind, Interface,
    },
    geom::ExternalSize,
    Board, Component, Error, PlacementError, Position, Rotation, SimConfig, State,
};

fn at(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn constant(board: &mut Board, state: State, pos: Position) -> wiregrid::ComponentId {
    board.place(Constant::new(state), pos, Rotation::R0).unwrap()
}

#[test]
fn undriven_cycle_stays_floating() {
    let mut board = Board::new("loop");
    board.add_wire((0, 0), (4, 0));
    board.add_wire((4, 0), (4, 4));
    board.add_wire((4, 4), (0, 4));
    board.add_wire((0, 4), (0, 0));

    let stats = board.tick();
    assert_eq!(stats.settle_passes, 1);
    assert!(!stats.hit_limit);
    for pos in [at(0, 0), at(4, 0), at(4, 4), at(0, 4)] {
        assert_eq!(board.state_at(pos), State::Floating);
    }
}

#[test]
fn conflict_stays_illegal_until_next_tick() {
    let mut board = Board::new("short");
    constant(&mut board, State::Low, at(0, 0));
    let high = constant(&mut board, State::High, at(6, 0));
    board.add_wire((0, 0), (6, 0));

    board.tick();
    assert_eq!(board.state_at(at(0, 0)), State::Illegal);
    assert_eq!(board.state_at(at(6, 0)), State::Illegal);

    board.remove_component(high).unwrap();
    assert_eq!(board.state_at(at(6, 0)), State::Illegal);

    board.tick();
    assert_eq!(board.state_at(at(0, 0)), State::Low);
    assert_eq!(board.state_at(at(6, 0)), State::Low);
}

#[test]
fn pulled_driver_yields_to_a_strong_one() {
    let mut board = Board::new("pull");
    constant(&mut board, State::PulledHigh, at(0, 0));
    board.add_wire((0, 0), (4, 0));

    board.tick();
    assert_eq!(board.state_at(at(4, 0)), State::PulledHigh);

    constant(&mut board, State::Low, at(4, 0));
    board.tick();
    assert_eq!(board.state_at(at(0, 0)), State::Low);
}

#[test]
fn gates_read_the_previous_tick() {
    let mut board = Board::new("and");
    let a = constant(&mut board, State::High, at(0, 0));
    constant(&mut board, State::High, at(0, 2));
    board.add_wire((0, 0), (10, 0));
    board.add_wire((0, 2), (10, 2));
    board.place(Gate::<And>::new(2), (10, 0), Rotation::R0).unwrap();
    let lamp = board.place(Lamp::new(), (20, 1), Rotation::R0).unwrap();
    board.add_wire((14, 1), (20, 1));

    board.tick();
    assert_eq!(board.state_at(at(14, 1)), State::Floating);
    board.tick();
    assert_eq!(board.state_at(at(20, 1)), State::High);

    board
        .component_mut(a)
        .unwrap()
        .downcast_mut::<Constant>()
        .unwrap()
        .set_state(State::Low);
    board.tick();
    assert_eq!(board.state_at(at(20, 1)), State::High);
    board.tick();
    assert_eq!(board.state_at(at(20, 1)), State::Low);

    board.tick();
    let lamp = board.component(lamp).unwrap().downcast_ref::<Lamp>().unwrap();
    assert_eq!(lamp.level(), wiregrid::Level::Low);
}

#[test]
fn floating_gate_inputs_pass_through() {
    let mut board = Board::new("xor");
    constant(&mut board, State::High, at(0, 0));
    board.add_wire((0, 0), (4, 0));
    board.place(Gate::<Xor>::new(2), (4, 0), Rotation::R0).unwrap();

    board.tick();
    board.tick();
    assert_eq!(board.state_at(at(8, 1)), State::High);
}

#[test]
fn diode_conducts_one_way() {
    let mut board = Board::new("diode");
    board.place(Component::new(ComponentKind::passthrough(Diode)), (0, 0), Rotation::R0).unwrap();
    constant(&mut board, State::High, at(-4, 0));
    board.add_wire((-4, 0), (0, 0));
    board.add_wire((2, 0), (6, 0));

    board.tick();
    assert_eq!(board.state_at(at(6, 0)), State::High);

    let mut reverse = Board::new("reverse");
    reverse.place(Component::new(ComponentKind::passthrough(Diode)), (0, 0), Rotation::R0).unwrap();
    constant(&mut reverse, State::High, at(6, 0));
    reverse.add_wire((2, 0), (6, 0));
    reverse.add_wire((-4, 0), (0, 0));

    reverse.tick();
    assert_eq!(reverse.state_at(at(2, 0)), State::High);
    assert_eq!(reverse.state_at(at(-4, 0)), State::Floating);
}

#[test]
fn switch_shorts_only_when_closed() {
    let mut board = Board::new("switch");
    let switch = board
        .place(
            Component::new(ComponentKind::passthrough(Switch::new(false))),
            (0, 0),
            Rotation::R0,
        )
        .unwrap();
    constant(&mut board, State::Low, at(-2, 0));
    board.add_wire((-2, 0), (0, 0));
    board.add_wire((2, 0), (5, 0));

    board.tick();
    assert_eq!(board.state_at(at(5, 0)), State::Floating);

    board
        .component_mut(switch)
        .unwrap()
        .downcast_mut::<Switch>()
        .unwrap()
        .toggle();
    board.tick();
    assert_eq!(board.state_at(at(5, 0)), State::Low);
}

#[test]
fn pass_limit_cuts_settling_short() {
    let mut board = Board::new("chain");
    constant(&mut board, State::High, at(0, 0));
    board.add_wire((0, 0), (0, 2));
    board.add_wire((0, 2), (2, 2));
    board.add_wire((2, 2), (2, 4));

    let config = SimConfig {
        settle_pass_limit: Some(1),
        ..SimConfig::default()
    };
    let stats = board.tick_with(&config);
    assert!(stats.hit_limit);
    assert_eq!(stats.settle_passes, 1);

    let stats = board.tick();
    assert!(!stats.hit_limit);
    assert_eq!(board.state_at(at(2, 4)), State::High);
}

/// Board with input "A" wired straight to output "B", pins at (0, 1) and (4, 1).
fn straight_through() -> Board {
    let mut inner = Board::new("through");
    inner.set_external_size(ExternalSize::new(4, 4));
    inner.place(Interface::input("A"), (0, 0), Rotation::R0).unwrap();
    inner.place(Interface::output("B"), (4, 0), Rotation::R0).unwrap();
    inner.add_wire((0, 0), (4, 0));
    inner
}

#[test]
fn container_passes_its_input_through_in_one_tick() {
    let mut board = Board::new("outer");
    board.place(Interface::input("X"), (0, 1), Rotation::R0).unwrap();
    board
        .place(Container::new(straight_through()), (10, 0), Rotation::R0)
        .unwrap();
    board.place(Interface::output("Y"), (20, 1), Rotation::R0).unwrap();
    board.add_wire((0, 1), (10, 1));
    board.add_wire((14, 1), (20, 1));

    board.set_input("X", State::High).unwrap();

    board.tick();
    assert_eq!(board.state_at(at(10, 1)), State::High);
    assert_eq!(board.output("Y").unwrap(), State::Floating);

    board.tick();
    assert_eq!(board.output("Y").unwrap(), State::High);

    board.set_input("X", State::Low).unwrap();
    board.tick();
    board.tick();
    assert_eq!(board.output("Y").unwrap(), State::Low);
}

#[test]
fn unknown_interfaces_are_reported() {
    let mut board = straight_through();
    assert!(matches!(
        board.set_input("B", State::High),
        Err(Error::UnknownInterface(_))
    ));
    assert!(matches!(board.output("A"), Err(Error::UnknownInterface(_))));
    assert!(matches!(board.output("Q"), Err(Error::UnknownInterface(_))));
}

#[test]
fn overlapping_placement_leaves_board_unchanged() {
    let mut board = Board::new("crowded");
    board.place(Gate::<And>::new(3), (0, 0), Rotation::R0).unwrap();
    board.add_wire((0, 0), (0, -3));
    let wires_before = board.wire_count();

    let err = board.place(Lamp::new(), (2, 2), Rotation::R0).unwrap_err();
    assert!(matches!(
        err,
        Error::Placement(PlacementError::Overlap { .. })
    ));
    assert_eq!(board.component_count(), 1);
    assert_eq!(board.wire_count(), wires_before);
    assert_eq!(board.connections(at(2, 2)), 0);
}

#[test]
fn reset_clears_the_whole_tree() {
    let mut board = Board::new("outer");
    board.place(Interface::input("X"), (0, 1), Rotation::R0).unwrap();
    let container = board
        .place(Container::new(straight_through()), (10, 0), Rotation::R0)
        .unwrap();
    board.add_wire((0, 1), (10, 1));
    board.set_input("X", State::High).unwrap();
    board.tick();
    board.tick();

    let nested = board.nested(container).unwrap();
    assert_eq!(nested.output("B").unwrap(), State::High);

    board.reset_to_floating();
    assert_eq!(board.state_at(at(10, 1)), State::Floating);
    let nested = board.nested(container).unwrap();
    assert_eq!(nested.output("B").unwrap(), State::Floating);
}
