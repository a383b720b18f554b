//! Move history for single-level undo.

use blockweld_core::PieceTypeId;
use blockweld_types::UPCOMING_PIECES;

use crate::sequence::PieceSequence;

/// State of one move at the moment its piece spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveData {
    pub move_id: u32,
    pub piece: PieceTypeId,
    pub upcoming: [PieceTypeId; UPCOMING_PIECES],
    /// Next sequence cursor to draw from.
    pub cursor: u32,
}

impl MoveData {
    pub fn first(sequence: &PieceSequence) -> Self {
        Self {
            move_id: 1,
            piece: sequence.piece_at(0),
            upcoming: [sequence.piece_at(1), sequence.piece_at(2)],
            cursor: 3,
        }
    }

    /// The following move: the first upcoming piece moves up.
    pub fn next(&self, sequence: &PieceSequence) -> Self {
        Self {
            move_id: self.move_id + 1,
            piece: self.upcoming[0],
            upcoming: [self.upcoming[1], sequence.piece_at(self.cursor)],
            cursor: self.cursor + 1,
        }
    }

    /// Swap the active piece with an upcoming one.
    pub fn switched(&self, slot: usize) -> Self {
        let mut out = *self;
        if let Some(up) = out.upcoming.get_mut(slot) {
            std::mem::swap(&mut out.piece, up);
        }
        out
    }
}

/// `current`, `current_at_spawn` and `previous_at_spawn` snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveHistory {
    current: MoveData,
    current_at_spawn: MoveData,
    previous_at_spawn: MoveData,
}

impl MoveHistory {
    pub fn new(first: MoveData) -> Self {
        Self {
            current: first,
            current_at_spawn: first,
            previous_at_spawn: first,
        }
    }

    pub fn current(&self) -> &MoveData {
        &self.current
    }

    pub fn current_at_spawn(&self) -> &MoveData {
        &self.current_at_spawn
    }

    pub fn previous_at_spawn(&self) -> &MoveData {
        &self.previous_at_spawn
    }

    /// A new move starts: the spawn snapshot shifts into the undo slot.
    pub fn begin_move(&mut self, sequence: &PieceSequence) {
        self.previous_at_spawn = self.current_at_spawn;
        self.current = self.current.next(sequence);
        self.current_at_spawn = self.current;
    }

    pub fn record_switch(&mut self, slot: usize) {
        self.current = self.current.switched(slot);
    }

    pub fn can_rewind(&self) -> bool {
        self.current_at_spawn.move_id != self.previous_at_spawn.move_id
    }

    /// Go back to the previous move's spawn state. Only possible once.
    pub fn rewind(&mut self) -> bool {
        if !self.can_rewind() {
            return false;
        }
        self.current = self.previous_at_spawn;
        self.current_at_spawn = self.previous_at_spawn;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence() -> PieceSequence {
        PieceSequence::new(vec![0, 1, 2, 3, 4, 5], vec![6], 1)
    }

    #[test]
    fn test_next_shifts_upcoming() {
        let seq = sequence();
        let first = MoveData::first(&seq);
        assert_eq!((first.piece, first.upcoming), (0, [1, 2]));
        let second = first.next(&seq);
        assert_eq!((second.move_id, second.piece, second.upcoming), (2, 1, [2, 3]));
    }

    #[test]
    fn test_switch_keeps_move_id() {
        let seq = sequence();
        let mut history = MoveHistory::new(MoveData::first(&seq));
        history.record_switch(1);
        assert_eq!(history.current().piece, 2);
        assert_eq!(history.current().upcoming, [1, 0]);
        assert_eq!(history.current().move_id, 1);
        assert!(!history.can_rewind());
    }

    #[test]
    fn test_rewind_once() {
        let seq = sequence();
        let mut history = MoveHistory::new(MoveData::first(&seq));
        history.record_switch(0);
        history.begin_move(&seq);
        assert_eq!(history.current().move_id, 2);
        assert!(history.can_rewind());

        assert!(history.rewind());
        assert_eq!(history.current().move_id, 1);
        // The spawn snapshot predates the switch.
        assert_eq!(history.current().piece, 0);
        assert!(!history.rewind());

        history.begin_move(&seq);
        assert_eq!(history.current().move_id, 2);
        assert!(history.can_rewind());
    }
}
