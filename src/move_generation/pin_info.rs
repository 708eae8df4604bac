//! Lazily computed pin state for the eight rays around the mover's king.
//!
//! Each ray is walked at most once per generator call; every later move whose
//! origin lies on that ray reuses the cached answer.

use crate::game_state::chess_types::{Color, Square};
use crate::game_state::position::{attacks_along, Position};
use crate::geometry::rays::{direction_between, on_mask, ray, ray_mask, Direction};

/// What walking a ray outward from the king found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayState {
    /// The first friendly piece on the ray is pinned by the slider beyond it.
    Pinned(Square),
    /// Two friendly pieces, or an enemy piece before any friendly one.
    PathBlocked,
    /// One friendly piece, then an enemy that cannot attack along this ray.
    EnemyFoundCannotCheck,
    /// The ray ends without an enemy piece behind the first friendly one.
    EnemyNotFound,
    /// Not walked yet.
    Unknown,
}

pub struct PinCache<'a> {
    position: &'a Position,
    king: Square,
    color: Color,
    states: [RayState; 8],
}

impl<'a> PinCache<'a> {
    pub fn new(position: &'a Position, king: Square, color: Color) -> Self {
        Self {
            position,
            king,
            color,
            states: [RayState::Unknown; 8],
        }
    }

    /// State of the ray from the king in `direction`, walking it on first use.
    pub fn state(&mut self, direction: Direction) -> RayState {
        let slot = direction.index();
        if self.states[slot] == RayState::Unknown {
            self.states[slot] = self.walk(direction);
        }
        self.states[slot]
    }

    /// `true` if moving the piece on `from` to `to` keeps its own king safe
    /// from pins. Only pieces on a ray from the king can be pinned.
    pub fn allows(&mut self, from: Square, to: Square) -> bool {
        let Some(direction) = direction_between(self.king, from) else {
            return true;
        };
        match self.state(direction) {
            RayState::Pinned(pinned) if pinned == from => on_mask(ray_mask(self.king, direction), to),
            _ => true,
        }
    }

    fn walk(&self, direction: Direction) -> RayState {
        let mut friendly: Option<Square> = None;
        for &square in ray(self.king, direction) {
            let Some(piece) = self.position.piece_at(square) else {
                continue;
            };
            if piece.color == self.color {
                if friendly.is_some() {
                    return RayState::PathBlocked;
                }
                friendly = Some(square);
                continue;
            }
            return match friendly {
                None => RayState::PathBlocked,
                Some(pinned) if attacks_along(piece.kind, direction) => RayState::Pinned(pinned),
                Some(_) => RayState::EnemyFoundCannotCheck,
            };
        }
        RayState::EnemyNotFound
    }
}
