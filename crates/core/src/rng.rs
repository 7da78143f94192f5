//! RNG module - 7-bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled.
//! Draws from the bag until empty, then generates a new bag.
//!
//! Shuffles use a seeded ChaCha8 generator so a seed replays the same sequence.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::types::{PieceKind, PREVIEW_LEN};

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Current bag of pieces
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: ChaCha8Rng,
    seed: u64,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u64) -> Self {
        let mut queue = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        };
        queue.refill_bag();
        queue
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.bag.shuffle(&mut self.rng);
        self.bag_index = 0;
    }

    /// The bag that follows the current one, computed on a clone of the RNG
    fn preview_next_bag(&self) -> [PieceKind; 7] {
        let mut preview_rng = self.rng.clone();
        let mut next_bag = PieceKind::ALL;
        next_bag.shuffle(&mut preview_rng);
        next_bag
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        match self.bag.get(self.bag_index) {
            Some(&kind) => kind,
            None => self.preview_next_bag()[0],
        }
    }

    /// Peek at the next pieces (for the preview queue).
    pub fn peek_n(&self) -> [PieceKind; PREVIEW_LEN] {
        let mut out = [PieceKind::I; PREVIEW_LEN];
        let remaining = &self.bag[self.bag_index.min(7)..];
        let next_bag = self.preview_next_bag();

        for (slot, kind) in out
            .iter_mut()
            .zip(remaining.iter().chain(next_bag.iter()))
        {
            *slot = *kind;
        }
        out
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= 7 {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Pieces left in the current bag
    pub fn remaining_in_bag(&self) -> &[PieceKind] {
        &self.bag[self.bag_index.min(7)..]
    }

    /// Seed this queue was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
