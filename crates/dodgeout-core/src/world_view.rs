//! `WorldView`: a read-only render snapshot of a run.
//!
//! The core never draws. A host asks for a [`WorldView`] once per frame and
//! paints it however it likes. The view owns its data, so it can be handed
//! to another thread or serialized without borrowing the [`GameSpace`].
//!
//! - [`Sprite`]: one per live entity, with the cells its pattern covers
//! - [`PlayerHud`]: health, plus velocity and immunity in diagnostic mode
//! - [`Overlay`]: run metadata, plus grid occupancy in diagnostic mode
//!
//! # Example
//!
//! ```
//! use dodgeout_core::difficulty::Difficulty;
//! use dodgeout_core::simulation::GameSpace;
//!
//! let game = GameSpace::new(Difficulty::Easy, false, 0);
//! let view = game.view();
//!
//! assert_eq!(view.sprites.len(), 1);
//! assert_eq!(view.player.unwrap().health, 4);
//! assert_eq!(view.overlay.time_label(), "Time remaining: 30s");
//! ```

use std::collections::BTreeSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use tessera::OccupancyStats;

use crate::consts::{MAX_X, MAX_Y};
use crate::entity::{Entity, EntityId, EntityTag, Pattern};
use crate::geometry::VectorExt;
use crate::simulation::GameSpace;

// =============================================================================
// Sprite
// =============================================================================

/// How to draw one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    /// Entity drawn.
    pub id: EntityId,
    /// Entity variant.
    pub tag: EntityTag,
    /// Centre cell.
    pub position: (i32, i32),
    /// Glyph to draw in every cell.
    pub glyph: char,
    /// Layout around the centre.
    pub pattern: Pattern,
    /// Arm lengths (cross) or edge lengths (square).
    pub size: (i32, i32),
}

impl Sprite {
    /// Builds the sprite for an entity.
    #[must_use]
    pub fn of(entity: &Entity) -> Self {
        let body = entity.body();
        Self {
            id: entity.id(),
            tag: entity.tag(),
            position: body.position.rounded(),
            glyph: body.glyph,
            pattern: body.pattern(),
            size: (body.size_x(), body.size_y()),
        }
    }

    /// Cells covered by the sprite, clipped to the arena, in row-major order.
    ///
    /// A cross has a horizontal arm of `size.0` cells either side of the
    /// centre (centre included) and a vertical arm of `size.1`. A square
    /// is centred on the position.
    #[must_use]
    pub fn cells(&self) -> Vec<(i32, i32)> {
        let (x, y) = self.position;
        let (size_x, size_y) = self.size;
        let mut cells = BTreeSet::new();

        match self.pattern {
            Pattern::Cross => {
                for i in 0..size_x {
                    cells.insert((y, x - i));
                    cells.insert((y, x + i));
                }
                for i in 0..size_y {
                    cells.insert((y - i, x));
                    cells.insert((y + i, x));
                }
            }
            Pattern::Square => {
                let left = x - size_x / 2;
                let top = y - size_y / 2;
                for row in top..top + size_y {
                    for col in left..left + size_x {
                        cells.insert((row, col));
                    }
                }
            }
        }

        cells
            .into_iter()
            .filter(|&(row, col)| in_arena(col, row))
            .map(|(row, col)| (col, row))
            .collect()
    }
}

fn in_arena(col: i32, row: i32) -> bool {
    (0.0..=MAX_X).contains(&f64::from(col)) && (0.0..=MAX_Y).contains(&f64::from(row))
}

// =============================================================================
// HUD & overlay
// =============================================================================

/// Status text drawn next to the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerHud {
    /// Remaining health.
    pub health: i32,
    /// Where the label goes: one cell past the sprite's lower right.
    pub anchor: (i32, i32),
    /// Effective velocity; diagnostic mode only.
    pub velocity: Option<DVec2>,
    /// Whether the player is immune; diagnostic mode only.
    pub immune: Option<bool>,
}

impl PlayerHud {
    /// `"4"`, or `"4, (x, y), immune"` in diagnostic mode.
    #[must_use]
    pub fn label(&self) -> String {
        let mut label = self.health.to_string();
        if let Some(v) = self.velocity {
            label.push_str(&format!(", ({:.2}, {:.2})", v.x, v.y));
        }
        if let Some(immune) = self.immune {
            label.push_str(if immune { ", immune" } else { ", not immune" });
        }
        label
    }
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    /// Live entities, player included.
    pub entities_alive: usize,
    /// Whole seconds left on the countdown.
    pub seconds_remaining: i64,
    /// Entities purged this run; diagnostic mode only.
    pub deleted_count: Option<u64>,
    /// Members per broad-phase cell, row-major; diagnostic mode only.
    pub occupancy: Option<Vec<Vec<usize>>>,
    /// Summary of `occupancy`; diagnostic mode only.
    pub stats: Option<OccupancyStats>,
}

impl Overlay {
    /// Countdown line, with the entity count in diagnostic mode.
    #[must_use]
    pub fn time_label(&self) -> String {
        if self.deleted_count.is_some() {
            format!(
                "Entities: {}. Time remaining: {}s",
                self.entities_alive, self.seconds_remaining
            )
        } else {
            format!("Time remaining: {}s", self.seconds_remaining)
        }
    }

    /// Purge counter line; diagnostic mode only.
    #[must_use]
    pub fn deleted_label(&self) -> Option<String> {
        self.deleted_count
            .map(|count| format!("Deleted entities: {count}"))
    }
}

// =============================================================================
// WorldView
// =============================================================================

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldView {
    /// One sprite per live entity, in id order.
    pub sprites: Vec<Sprite>,
    /// Player status, absent once the player is gone.
    pub player: Option<PlayerHud>,
    /// Run metadata.
    pub overlay: Overlay,
}

impl WorldView {
    /// Captures the current state of `game`.
    #[must_use]
    pub fn capture(game: &GameSpace) -> Self {
        let diagnostic = game.is_diagnostic();
        let sprites = game.arena().entities_sorted().map(Sprite::of).collect();

        let player = game.player().and_then(|entity| {
            let components = entity.as_player()?;
            let (x, y) = entity.body().position.rounded();
            Some(PlayerHud {
                health: components.health,
                anchor: (x + entity.body().size_x() + 1, y + entity.body().size_y() + 1),
                velocity: diagnostic.then(|| entity.effective_velocity()),
                immune: diagnostic.then(|| components.is_immune()),
            })
        });

        let grid = game.collision().grid();
        let overlay = Overlay {
            entities_alive: game.arena().entity_count(),
            seconds_remaining: game.seconds_remaining(),
            deleted_count: diagnostic.then(|| game.deleted_count()),
            occupancy: diagnostic.then(|| grid.occupancy()),
            stats: diagnostic.then(|| OccupancyStats::from_grid(grid)),
        };

        Self {
            sprites,
            player,
            overlay,
        }
    }
}

impl GameSpace {
    /// Render snapshot of the current frame.
    #[must_use]
    pub fn view(&self) -> WorldView {
        WorldView::capture(self)
    }
}
