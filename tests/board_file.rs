//! Saving and loading whole board trees.

use std::io::Cursor;

use wiregrid::{
    circuits::{
        constant::Constant,
        container::Container,
        gates::{Gate, Nand},
        lamp::Lamp,
        Graphic, Interface,
    },
    geom::ExternalSize,
    io::{self, WriteExt},
    wire::Wire,
    Board, Error, Position, Rotation, State,
};

/// (type id, details, position, rotation) of every component, in placement order.
fn component_summary(board: &Board) -> Vec<(String, String, Position, Rotation)> {
    board
        .components()
        .map(|(_, c)| (c.id().to_owned(), c.details(), c.position(), c.rotation()))
        .collect()
}

fn wire_set(board: &Board) -> Vec<Wire> {
    let mut wires: Vec<Wire> = board.wires().map(|(_, w)| *w).collect();
    wires.sort_by_key(|w| (w.pos1.min(w.pos2), w.pos1.max(w.pos2)));
    wires
}

fn nand_cell() -> Board {
    let mut board = Board::new("nand_cell");
    board.set_external_size(ExternalSize::new(6, 4));
    board.place(Interface::input("A"), (0, 0), Rotation::R0).unwrap();
    board.place(Interface::input("B"), (0, 4), Rotation::R0).unwrap();
    board.place(Gate::<Nand>::new(2), (4, 0), Rotation::R0).unwrap();
    board.place(Interface::output("S"), (12, 1), Rotation::R0).unwrap();
    board.add_wire((0, 0), (4, 0));
    board.add_wire((0, 4), (2, 4));
    board.add_wire((2, 4), (2, 2));
    board.add_wire((2, 2), (4, 2));
    board.add_wire((8, 1), (12, 1));
    board
}

fn sample() -> Board {
    let mut board = Board::new("main");
    board.place(Constant::new(State::High), (-4, 0), Rotation::R0).unwrap();
    board
        .place(Container::new(nand_cell()), (0, 0), Rotation::R0)
        .unwrap();
    board
        .place(Container::new(nand_cell()), (0, 10), Rotation::R180)
        .unwrap();
    let lamp = board.place(Lamp::new(), (20, 20), Rotation::R270).unwrap();
    board.component_mut(lamp).unwrap().set_graphic(Graphic {
        scale: 0.5,
        location: None,
    });
    board.add_wire((-4, 0), (-4, 1));
    board.add_wire((-4, 1), (0, 1));
    board.add_wire((6, 1), (10, 1));
    board.add_wire((10, 1), (20, 1));
    board
}

#[test]
fn round_trip_keeps_the_simplified_board() {
    let mut board = sample();

    let mut bytes = vec![];
    io::save(&mut board, &mut bytes).unwrap();
    assert_eq!(wire_set(&board).len(), 3);

    let loaded = io::load(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(loaded.name(), board.name());
    assert_eq!(loaded.external_size(), board.external_size());
    assert_eq!(component_summary(&loaded), component_summary(&board));
    assert_eq!(wire_set(&loaded), wire_set(&board));

    let lamp = loaded.components().map(|(_, c)| c).find(|c| c.id() == "lamp");
    assert_eq!(lamp.and_then(|c| c.graphic()).map(|g| g.scale), Some(0.5));

    for (original, copy) in board.nested_boards().zip(loaded.nested_boards()) {
        assert_eq!(copy.name(), original.name());
        assert_eq!(copy.external_size(), original.external_size());
        assert_eq!(component_summary(copy), component_summary(original));
        assert_eq!(wire_set(copy), wire_set(original));
    }
}

#[test]
fn shared_sub_boards_are_written_once_and_copied_on_load() {
    let mut board = sample();

    let mut bytes = vec![];
    io::save(&mut board, &mut bytes).unwrap();
    let loaded = io::load(&mut Cursor::new(bytes.clone())).unwrap();

    let nested: Vec<&Board> = loaded.nested_boards().collect();
    assert_eq!(nested.len(), 2);
    assert_ne!(nested[0].id(), nested[1].id());
    assert_eq!(nested[0].top_level(), loaded.id());

    // Saving the loaded board again gives the same bytes.
    let mut loaded = loaded;
    let mut again = vec![];
    io::save(&mut loaded, &mut again).unwrap();
    assert_eq!(again, bytes);
}

#[test]
fn loaded_board_simulates() {
    let mut board = Board::new("main");
    board.place(Interface::input("X"), (0, 1), Rotation::R0).unwrap();
    board
        .place(Container::new(nand_cell()), (10, 0), Rotation::R0)
        .unwrap();
    board.place(Interface::output("Y"), (30, 1), Rotation::R0).unwrap();
    board.add_wire((0, 1), (10, 1));
    board.add_wire((16, 1), (30, 1));

    let mut bytes = vec![];
    io::save(&mut board, &mut bytes).unwrap();
    let mut loaded = io::load(&mut Cursor::new(bytes)).unwrap();

    // B is left floating, so the NAND only sees A.
    loaded.set_input("X", State::High).unwrap();
    loaded.tick();
    loaded.tick();
    loaded.tick();
    assert_eq!(loaded.output("Y").unwrap(), State::Low);
}

#[test]
fn self_containing_board_is_rejected() {
    let mut bytes = vec![];
    bytes.write_string("loop").unwrap();
    bytes.write_int(0).unwrap();
    bytes.write_int(0).unwrap();
    bytes.write_int(1).unwrap();
    bytes.write_string("board").unwrap();
    bytes.write_string("loop").unwrap();
    bytes.write_position(Position::new(0, 0)).unwrap();
    bytes.write_string("R0").unwrap();
    bytes.write_int(0).unwrap();
    bytes.write_int(0).unwrap();

    assert!(matches!(
        io::load(&mut Cursor::new(bytes)),
        Err(Error::Format(_))
    ));
}

#[test]
fn truncated_file_is_an_io_error() {
    let mut board = sample();
    let mut bytes = vec![];
    io::save(&mut board, &mut bytes).unwrap();
    bytes.truncate(bytes.len() / 2);

    assert!(matches!(
        io::load(&mut Cursor::new(bytes)),
        Err(Error::Io(_))
    ));
}

#[test]
fn files_on_disk() {
    let dir = std::env::temp_dir().join(format!("wiregrid-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sample.board");

    let mut board = sample();
    io::save_to_path(&mut board, &path).unwrap();
    let loaded = io::load_from_path(&path).unwrap();
    assert_eq!(component_summary(&loaded), component_summary(&board));

    std::fs::remove_dir_all(&dir).unwrap();
}
