//! Identity of live boards.
//!
//! Every [`Board`](crate::board::Board) holds a [`BoardId`] for as long as it exists.
//! Ids are handed out from a slot table: a new board takes the smallest free slot, and
//! dropping a board frees its slot again. Each slot carries a generation counter that
//! is bumped on release, so a handle to a dropped board never compares equal to a
//! later board that reuses the slot.
//!
//! The table also remembers which board owns which (a board nested in a container
//! component is owned by the board the container is placed on), which is what
//! [`BoardRegistry::top_level`] walks.

use std::fmt;

use parking_lot::{const_mutex, Mutex, MutexGuard};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardId {
    index: u32,
    generation: u32,
}

impl BoardId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "board#{}v{}", self.index, self.generation)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    live: bool,
    owner: Option<BoardId>,
}

#[derive(Debug, Default)]
pub struct BoardRegistry {
    slots: Vec<Slot>,
}

impl BoardRegistry {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Takes the smallest free slot.
    pub fn add(&mut self) -> BoardId {
        let index = match self.slots.iter().position(|slot| !slot.live) {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };

        let slot = &mut self.slots[index];
        slot.live = true;
        slot.owner = None;

        BoardId {
            index: index as u32,
            generation: slot.generation,
        }
    }

    /// Frees the slot of `id`. Returns `false` if `id` was not live.
    pub fn release(&mut self, id: BoardId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        slot.live = false;
        slot.owner = None;
        slot.generation = slot.generation.wrapping_add(1);
        true
    }

    pub fn is_live(&self, id: BoardId) -> bool {
        self.slot(id).is_some()
    }

    /// Looks up the live board currently holding slot `index`.
    pub fn lookup(&self, index: u32) -> Option<BoardId> {
        let slot = self.slots.get(index as usize)?;
        slot.live.then_some(BoardId {
            index,
            generation: slot.generation,
        })
    }

    pub fn owner(&self, id: BoardId) -> Option<BoardId> {
        self.slot(id)?.owner
    }

    pub fn set_owner(&mut self, id: BoardId, owner: Option<BoardId>) -> bool {
        match self.slot_mut(id) {
            Some(slot) => {
                slot.owner = owner;
                true
            }
            None => false,
        }
    }

    /// Root of the ownership tree `id` belongs to, `None` if `id` is not live.
    pub fn top_level(&self, id: BoardId) -> Option<BoardId> {
        let mut current = id;
        self.slot(current)?;

        // Ownership is a tree, the bound only protects against a corrupted table.
        for _ in 0..=self.slots.len() {
            match self.owner(current) {
                Some(owner) if self.is_live(owner) => current = owner,
                _ => return Some(current),
            }
        }
        Some(current)
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.live).count()
    }

    fn slot(&self, id: BoardId) -> Option<&Slot> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.live && slot.generation == id.generation)
    }

    fn slot_mut(&mut self, id: BoardId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.live && slot.generation == id.generation)
    }
}

static REGISTRY: Mutex<BoardRegistry> = const_mutex(BoardRegistry::new());

/// The process-wide registry used by [`Board`](crate::board::Board).
pub fn registry() -> MutexGuard<'static, BoardRegistry> {
    REGISTRY.lock()
}
