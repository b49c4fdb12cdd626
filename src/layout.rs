//! Deterministic canvas layout for node pairs.
//!
//! Positions must be reproducible and collision-free without running a real
//! layout algorithm: functional nodes stack vertically in a fixed column,
//! wrappers march to the right while staying vertically locked to their
//! functional node.

use serde::{Deserialize, Serialize};

/// A 2D canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

const FUNCTIONAL_X: i64 = 125;
const FUNCTIONAL_START_Y: i64 = 325;
const FUNCTIONAL_Y_STEP: i64 = 200;

const WRAPPER_START_X: i64 = 475;
const WRAPPER_X_STEP: i64 = 350;
const WRAPPER_Y_OFFSET: i64 = -50;

const ENTRY_X: i64 = 125;
const ENTRY_Y: i64 = 325;

/// Assigns positions to node pairs as they are added.
///
/// The functional and wrapper counters advance independently; `next_pair`
/// keeps a wrapper's y locked to its paired functional node no matter how
/// many wrappers were created before it.
#[derive(Debug, Default, Clone)]
pub struct PositionCalculator {
    functional_count: i64,
    wrapper_count: i64,
}

impl PositionCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed position of the entry node.
    pub fn entry_position(&self) -> Position {
        Position::new(ENTRY_X, ENTRY_Y)
    }

    /// Position for the next functional node; advances the functional counter.
    pub fn next_functional_position(&mut self) -> Position {
        let y = FUNCTIONAL_START_Y + self.functional_count * FUNCTIONAL_Y_STEP;
        self.functional_count += 1;
        Position::new(FUNCTIONAL_X, y)
    }

    /// Position for the next wrapper, offset from its functional node's y;
    /// advances the wrapper counter.
    pub fn wrapper_position(&mut self, functional_y: i64) -> Position {
        let x = WRAPPER_START_X + self.wrapper_count * WRAPPER_X_STEP;
        self.wrapper_count += 1;
        Position::new(x, functional_y + WRAPPER_Y_OFFSET)
    }

    /// Positions for one functional node + wrapper pair.
    pub fn next_pair(&mut self) -> (Position, Position) {
        let functional = self.next_functional_position();
        let wrapper = self.wrapper_position(functional.y);
        (functional, wrapper)
    }

    pub fn reset(&mut self) {
        self.functional_count = 0;
        self.wrapper_count = 0;
    }
}
