use tracing::trace;

use crate::model::TileId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Moving {
        tile: TileId,
        origin_screen: usize,
    },
}

/// Tracks the single move and the single resize the host can have in
/// flight.
#[derive(Debug, Default)]
pub struct DragManager {
    pub drag_state: DragState,
    pub resizing: Option<TileId>,
}

impl DragManager {
    /// Returns false, leaving the current drag untouched, if a move is
    /// already in progress.
    pub fn start_move(&mut self, tile: TileId, origin_screen: usize) -> bool {
        if self.drag_state != DragState::Idle {
            return false;
        }
        self.drag_state = DragState::Moving { tile, origin_screen };
        true
    }

    /// Ends the move of `tile` and returns the screen it started on.
    pub fn finish_move(&mut self, tile: TileId) -> Option<usize> {
        match self.drag_state {
            DragState::Moving { tile: moving, origin_screen } if moving == tile => {
                self.drag_state = DragState::Idle;
                Some(origin_screen)
            }
            _ => None,
        }
    }

    pub fn is_moving(&self, tile: TileId) -> bool {
        matches!(self.drag_state, DragState::Moving { tile: moving, .. } if moving == tile)
    }

    pub fn is_busy(&self, tile: TileId) -> bool {
        self.is_moving(tile) || self.resizing == Some(tile)
    }

    /// Drops any drag state referring to a tile that left the layouts.
    /// Returns whether a move of that tile was cancelled.
    pub fn forget(&mut self, tile: TileId) -> bool {
        if self.resizing == Some(tile) {
            self.resizing = None;
        }
        if !self.is_moving(tile) {
            return false;
        }
        trace!(?tile, "drag cancelled");
        self.drag_state = DragState::Idle;
        true
    }
}
