//! Binary board files.
//!
//! ```text
//! File       := BoardBasic, SubBoardCount:i32, SubBoardCount × BoardBasic
//! BoardBasic := Name, Width:i32, Height:i32, CompCount:i32, CompCount × Component,
//!               WireCount:i32, WireCount × Wire
//! Component  := TypeId, Details, Pos, Rotation
//!               [graphical: Scale:f32, HasLocation:bool, [Location:Pos]]
//!               [interface: Side, Distance:i32]
//! Wire       := Pos, Pos
//! ```
//!
//! The sub-boards are every board reachable through container components, each
//! written once under its name. Loading rebuilds containers from them by name, giving
//! each container its own copy.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use tracing::info;

use crate::{
    board::Board,
    circuits::{
        factory::{self, ComponentRegistry},
        Component, Graphic,
    },
    error::{Error, Result},
    geom::{ExternalSize, InterfaceLocation, Rotation, Side, COORD_LIMIT},
    wire::Wire,
};

mod binary;

pub use binary::{ReadExt, WriteExt};

/// A board as stored in a file, before containers are supplied.
#[derive(Debug, Clone)]
pub struct BoardRecord {
    pub name: String,
    pub size: ExternalSize,
    pub components: Vec<Component>,
    pub wires: Vec<Wire>,
}

/// Canonicalizes `board` with [`Board::simplify_wires`] and writes it with all its
/// sub-boards.
///
/// Sub-boards are stored by name, so a board nested under a board of the same name
/// is rejected before anything is written.
pub fn save(board: &mut Board, writer: &mut impl Write) -> Result<()> {
    check_names(board, &mut vec![board.name()])?;
    board.simplify_wires();
    write_basic(writer, board)?;

    let subs = sub_boards(board);
    writer.write_count(subs.len())?;
    for sub in &subs {
        write_basic(writer, sub)?;
    }

    info!(board = %board.name(), sub_boards = subs.len(), "board saved");
    Ok(())
}

pub fn save_to_path(board: &mut Board, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    save(board, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a board file using the process-wide component registry.
pub fn load(reader: &mut impl Read) -> Result<Board> {
    load_with(reader, &factory::registry())
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<Board> {
    load(&mut BufReader::new(File::open(path)?))
}

/// Reads a board file. Nothing is returned unless the whole tree could be built.
pub fn load_with(reader: &mut impl Read, registry: &ComponentRegistry) -> Result<Board> {
    let top = read_basic(reader, registry)?;
    let count = reader.read_count("sub-board")?;

    let mut subs = HashMap::with_capacity(count);
    for _ in 0..count {
        let record = read_basic(reader, registry)?;
        subs.insert(record.name.clone(), record);
    }

    let board = build(&top, &subs, &mut vec![top.name.clone()])?;
    info!(board = %board.name(), sub_boards = subs.len(), "board loaded");
    Ok(board)
}

/// Fails if any board below `board` reuses a name from `path`.
fn check_names<'a>(board: &'a Board, path: &mut Vec<&'a str>) -> Result<()> {
    for nested in board.nested_boards() {
        let name = nested.name();
        if path.contains(&name) {
            return Err(Error::format(format!("board {name:?} contains itself")));
        }
        path.push(name);
        check_names(nested, path)?;
        path.pop();
    }
    Ok(())
}

/// Boards reachable through containers, breadth-first, one per name, excluding the
/// top board's own name.
fn sub_boards(top: &Board) -> Vec<&Board> {
    let mut seen: HashSet<&str> = HashSet::from([top.name()]);
    let mut queue: VecDeque<&Board> = VecDeque::from([top]);
    let mut found = vec![];

    while let Some(board) = queue.pop_front() {
        for nested in board.nested_boards() {
            if seen.insert(nested.name()) {
                found.push(nested);
            }
            queue.push_back(nested);
        }
    }
    found
}

fn write_basic(writer: &mut impl Write, board: &Board) -> Result<()> {
    writer.write_string(board.name())?;
    let size = board.external_size();
    writer.write_int(size.width)?;
    writer.write_int(size.height)?;

    writer.write_count(board.component_count())?;
    for (_, component) in board.components() {
        write_component(writer, component)?;
    }

    writer.write_count(board.wire_count())?;
    for (_, wire) in board.wires() {
        writer.write_position(wire.pos1)?;
        writer.write_position(wire.pos2)?;
    }
    Ok(())
}

fn write_component(writer: &mut impl Write, component: &Component) -> Result<()> {
    writer.write_string(component.id())?;
    writer.write_string(&component.details())?;
    writer.write_position(component.position())?;
    writer.write_string(component.rotation().name())?;

    if let Some(graphic) = component.graphic() {
        writer.write_float(graphic.scale)?;
        writer.write_flag(graphic.location.is_some())?;
        if let Some(location) = graphic.location {
            writer.write_position(location)?;
        }
    }

    if let Some(interface) = component.interface() {
        let location = interface.location();
        writer.write_string(location.side.name())?;
        writer.write_int(location.distance)?;
    }
    Ok(())
}

fn read_basic(reader: &mut impl Read, registry: &ComponentRegistry) -> Result<BoardRecord> {
    let name = reader.read_string()?;
    let size = ExternalSize::new(reader.read_int()?, reader.read_int()?);
    if !size.in_range() {
        return Err(Error::format(format!("board {name:?} has size {size:?}")));
    }

    let count = reader.read_count("component")?;
    let mut components = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        components.push(read_component(reader, registry)?);
    }

    let count = reader.read_count("wire")?;
    let mut wires = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let (pos1, pos2) = (reader.read_position()?, reader.read_position()?);
        if !pos1.in_range() || !pos2.in_range() {
            return Err(Error::format(format!("wire {pos1} - {pos2} is off the grid")));
        }
        wires.push(Wire::new(pos1, pos2));
    }

    Ok(BoardRecord {
        name,
        size,
        components,
        wires,
    })
}

fn read_component(reader: &mut impl Read, registry: &ComponentRegistry) -> Result<Component> {
    let id = reader.read_string()?;
    let details = reader.read_string()?;
    let mut component = registry.create(&id, &details)?;

    let position = reader.read_position()?;
    if !position.in_range() {
        return Err(Error::format(format!("{id} at {position} is off the grid")));
    }
    let rotation: Rotation = reader.read_string()?.parse().map_err(Error::Format)?;
    component.set_placement(position, rotation);

    if component.is_graphical() {
        let scale = reader.read_float()?;
        let location = if reader.read_flag()? {
            Some(reader.read_position()?)
        } else {
            None
        };
        component.set_graphic(Graphic { scale, location });
    }

    if let Some(interface) = component.interface_mut() {
        let side: Side = reader.read_string()?.parse().map_err(Error::Format)?;
        let distance = reader.read_int()?;
        if !(0..=COORD_LIMIT).contains(&distance) {
            return Err(Error::format(format!("interface distance {distance}")));
        }
        interface.set_location(InterfaceLocation::new(side, distance));
    }

    Ok(component)
}

/// Materializes a record, supplying every container with a fresh copy of the
/// sub-board it names. `path` holds the names being built, to reject cycles.
fn build(
    record: &BoardRecord,
    subs: &HashMap<String, BoardRecord>,
    path: &mut Vec<String>,
) -> Result<Board> {
    let mut board = Board::new(record.name.clone());
    board.set_external_size(record.size);

    for component in &record.components {
        let mut component = component.clone();

        if let Some(container) = component.container_mut() {
            let name = container.board_name().to_owned();
            if path.contains(&name) {
                return Err(Error::format(format!("board {name:?} contains itself")));
            }
            let sub = subs
                .get(&name)
                .ok_or_else(|| Error::format(format!("missing sub-board {name:?}")))?;

            path.push(name);
            let nested = build(sub, subs, path)?;
            path.pop();
            container.supply(nested);
        }

        let (position, rotation) = (component.position(), component.rotation());
        board
            .place(component, position, rotation)
            .map_err(|e| Error::format(format!("board {:?}: {e}", record.name)))?;
    }

    for wire in &record.wires {
        board.add_wire(wire.pos1, wire.pos2);
    }

    Ok(board)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{
        circuits::{gates::Gate, gates::Or, lamp::Lamp, Container, Interface},
        geom::Position,
    };

    #[test]
    fn writes_exact_bytes() {
        let mut board = Board::new("b");
        board.add_wire((0, 0), (1, 0));

        let mut bytes = vec![];
        save(&mut board, &mut bytes).unwrap();

        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            1, b'b',
            0, 0, 0, 0,  0, 0, 0, 0,
            0, 0, 0, 0,
            1, 0, 0, 0,
            0, 0, 0, 0,  0, 0, 0, 0,  1, 0, 0, 0,  0, 0, 0, 0,
            0, 0, 0, 0,
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn graphical_and_interface_fields() {
        let mut board = Board::new("main");
        let lamp = board.place(Lamp::new(), (4, 4), Rotation::R90).unwrap();
        board.component_mut(lamp).unwrap().set_graphic(Graphic {
            scale: 2.5,
            location: Some(Position::new(-1, 3)),
        });
        board
            .place(Interface::input("A"), (0, 0), Rotation::R0)
            .unwrap();

        let mut bytes = vec![];
        save(&mut board, &mut bytes).unwrap();
        let loaded = load(&mut Cursor::new(bytes)).unwrap();

        let components: Vec<&Component> = loaded.components().map(|(_, c)| c).collect();
        assert_eq!(
            components[0].graphic(),
            Some(&Graphic {
                scale: 2.5,
                location: Some(Position::new(-1, 3))
            })
        );
        assert_eq!(components[0].rotation(), Rotation::R90);
        assert_eq!(
            components[1].interface().map(|i| i.location()),
            Some(InterfaceLocation::new(Side::Left, 1))
        );
    }

    #[test]
    fn unknown_type_fails_the_load() {
        let mut bytes = vec![];
        bytes.write_string("main").unwrap();
        bytes.write_int(0).unwrap();
        bytes.write_int(0).unwrap();
        bytes.write_int(1).unwrap();
        bytes.write_string("gate_maybe").unwrap();

        assert!(matches!(load(&mut Cursor::new(bytes)), Err(Error::Format(_))));
    }

    #[test]
    fn missing_sub_board_fails_the_load() {
        let mut sub = Board::new("inner");
        sub.place(Gate::<Or>::new(2), (0, 0), Rotation::R0).unwrap();
        let mut board = Board::new("main");
        board.place(Container::new(sub), (0, 0), Rotation::R0).unwrap();

        let mut bytes = vec![];
        save(&mut board, &mut bytes).unwrap();

        // Same file with the sub-board section cut off and a count of zero.
        let mut top_only = vec![];
        write_basic(&mut top_only, &board).unwrap();
        top_only.write_int(0).unwrap();

        assert!(load(&mut Cursor::new(bytes)).is_ok());
        let err = load(&mut Cursor::new(top_only)).unwrap_err();
        assert!(err.to_string().contains("inner"), "{err}");
    }

    #[test]
    fn nested_board_reusing_an_outer_name_is_not_saved() {
        let mut inner = Board::new("main");
        inner.place(Interface::input("A"), (0, 0), Rotation::R0).unwrap();
        let mut middle = Board::new("middle");
        middle.place(Container::new(inner), (0, 0), Rotation::R0).unwrap();
        let mut board = Board::new("main");
        board.place(Container::new(middle), (0, 0), Rotation::R0).unwrap();

        let mut bytes = vec![];
        let err = save(&mut board, &mut bytes).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
        assert!(bytes.is_empty());
    }

    #[test]
    fn off_grid_values_fail_the_load() {
        let component = |x: i32| {
            let mut bytes = vec![];
            bytes.write_string("main").unwrap();
            bytes.write_int(0).unwrap();
            bytes.write_int(0).unwrap();
            bytes.write_int(1).unwrap();
            bytes.write_string("gate_and").unwrap();
            bytes.write_string("2").unwrap();
            bytes.write_position(Position::new(x, 0)).unwrap();
            bytes.write_string("R0").unwrap();
            bytes.write_int(0).unwrap();
            bytes.write_int(0).unwrap();
            bytes
        };
        assert!(load(&mut Cursor::new(component(8))).is_ok());
        assert!(matches!(
            load(&mut Cursor::new(component(i32::MAX))),
            Err(Error::Format(_))
        ));

        let mut size = vec![];
        size.write_string("main").unwrap();
        size.write_int(i32::MAX).unwrap();
        size.write_int(-1).unwrap();
        assert!(matches!(load(&mut Cursor::new(size)), Err(Error::Format(_))));

        let mut wire = vec![];
        wire.write_string("main").unwrap();
        wire.write_int(0).unwrap();
        wire.write_int(0).unwrap();
        wire.write_int(0).unwrap();
        wire.write_int(1).unwrap();
        wire.write_position(Position::new(0, 0)).unwrap();
        wire.write_position(Position::new(0, i32::MIN)).unwrap();
        assert!(matches!(load(&mut Cursor::new(wire)), Err(Error::Format(_))));
    }
}
