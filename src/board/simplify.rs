use std::collections::BTreeSet;

use tracing::trace;

use crate::{geom::Position, wire::Wire};

use super::Board;

impl Board {
    /// Brings the wires of this board and every nested board into canonical form:
    /// no zero-length wires, every T-junction split at the junction (including
    /// component pins landing on a wire), and straight runs through a position with
    /// no other connection merged into one wire.
    ///
    /// Idempotent. Returns the number of changes made.
    pub fn simplify_wires(&mut self) -> usize {
        let mut changes = 0;
        while self.drop_zero_length() || self.split_once() || self.merge_once() {
            changes += 1;
        }

        for nested in self.nested_boards_mut() {
            changes += nested.simplify_wires();
        }
        changes
    }

    fn drop_zero_length(&mut self) -> bool {
        let zero: Vec<u64> = self
            .wires
            .iter()
            .filter(|(_, wire)| wire.is_zero_length())
            .map(|(seq, _)| *seq)
            .collect();

        for seq in &zero {
            self.remove_wire(self.wire_id(*seq));
        }
        !zero.is_empty()
    }

    /// Splits the first wire found with another wire's end or a component pin on
    /// its interior.
    fn split_once(&mut self) -> bool {
        let wires: Vec<(u64, Wire)> = self.wires.iter().map(|(seq, w)| (*seq, *w)).collect();

        let mut junctions: BTreeSet<Position> = wires.iter().flat_map(|(_, w)| w.ends()).collect();
        junctions.extend(
            self.components
                .values()
                .flat_map(|c| c.pin_positions().iter().copied()),
        );

        for (seq, wire) in &wires {
            let Some(pos) = junctions.iter().copied().find(|pos| wire.collision(*pos)) else {
                continue;
            };
            trace!(board = %self.name, ?wire, %pos, "splitting wire");
            return matches!(self.try_split_wire(self.wire_id(*seq), pos), Ok(true));
        }
        false
    }

    /// Merges the first pair of straight-continuing wires that meet at a position
    /// nothing else connects to.
    fn merge_once(&mut self) -> bool {
        let wires: Vec<(u64, Wire)> = self.wires.iter().map(|(seq, w)| (*seq, *w)).collect();

        for (i, (seq_a, a)) in wires.iter().enumerate() {
            for (seq_b, b) in &wires[i + 1..] {
                let Some(joint) = a.ends().into_iter().find(|pos| b.has_end(*pos)) else {
                    continue;
                };
                if self.connections(joint) != 2 {
                    continue;
                }
                let Some(merged) = a.merge(b, joint) else {
                    continue;
                };

                trace!(board = %self.name, ?a, ?b, ?merged, "merging wires");
                self.remove_wire(self.wire_id(*seq_a));
                self.remove_wire(self.wire_id(*seq_b));
                self.add_wire(merged.pos1, merged.pos2);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::{circuits::lamp::Lamp, geom::Rotation};

    use super::*;

    fn wire_set(board: &Board) -> Vec<Wire> {
        let mut wires: Vec<Wire> = board.wires().map(|(_, w)| *w).collect();
        wires.sort_by_key(|w| {
            let (a, b) = (w.pos1.min(w.pos2), w.pos1.max(w.pos2));
            (a, b)
        });
        wires
    }

    #[test]
    fn merges_straight_runs() {
        let mut board = Board::new("main");
        board.add_wire((0, 0), (2, 0));
        board.add_wire((2, 0), (5, 0));
        board.add_wire((5, 0), (5, 3));
        board.add_wire((7, 7), (7, 7));

        assert!(board.simplify_wires() > 0);
        assert_eq!(
            wire_set(&board),
            vec![Wire::new((0, 0), (5, 0)), Wire::new((5, 0), (5, 3))]
        );
        assert_eq!(board.connections(Position::new(2, 0)), 0);
        assert_eq!(board.connections(Position::new(7, 7)), 0);
    }

    #[test]
    fn splits_t_junctions() {
        let mut board = Board::new("main");
        board.add_wire((0, 0), (4, 0));
        board.add_wire((2, 0), (2, 3));

        board.simplify_wires();
        assert_eq!(
            wire_set(&board),
            vec![
                Wire::new((0, 0), (2, 0)),
                Wire::new((2, 0), (2, 3)),
                Wire::new((2, 0), (4, 0)),
            ]
        );
        assert_eq!(board.connections(Position::new(2, 0)), 3);
    }

    #[test]
    fn splits_under_component_pins_and_keeps_them() {
        let mut board = Board::new("main");
        board.add_wire((0, 0), (6, 0));
        board.place(Lamp::new(), (3, 0), Rotation::R0).unwrap();

        board.simplify_wires();
        assert_eq!(
            wire_set(&board),
            vec![Wire::new((0, 0), (3, 0)), Wire::new((3, 0), (6, 0))]
        );
    }

    #[test]
    fn is_idempotent() {
        let mut board = Board::new("main");
        board.add_wire((0, 0), (0, 4));
        board.add_wire((0, 4), (0, 8));
        board.add_wire((-3, 2), (3, 2));
        board.add_wire((3, 2), (3, 2));
        board.add_wire((3, 2), (9, 2));

        board.simplify_wires();
        let once = wire_set(&board);
        assert_eq!(board.simplify_wires(), 0);
        assert_eq!(wire_set(&board), once);
    }
}
