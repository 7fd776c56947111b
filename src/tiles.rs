//! Tile world - obstacle tiles, decorations and spawn markers.
//!
//! A level is a rectangular grid of integer tile codes. Loading classifies
//! every code once and keeps the derived obstacle list, which is immutable
//! for the lifetime of the level and answers all terrain collision queries.

use crate::components::{Hitbox, Position, Rect};
use crate::error::LoadError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Code used for an empty cell.
pub const EMPTY_TILE: i32 = -1;

/// Category of a tile code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    /// 0-8: solid terrain that participates in collision.
    Obstacle,
    /// 9-10: water and similar, drawn only.
    Liquid,
    /// 11-14: scenery, drawn only.
    Scenery,
    /// 15
    PlayerSpawn,
    /// 16
    EnemySpawn,
    /// 17-19: ammo, grenade and health boxes. Accepted, spawn nothing.
    Pickup,
    /// 20
    Exit,
}

impl TileKind {
    pub fn from_code(code: i32) -> Option<Self> {
        let kind = match code {
            EMPTY_TILE => TileKind::Empty,
            0..=8 => TileKind::Obstacle,
            9..=10 => TileKind::Liquid,
            11..=14 => TileKind::Scenery,
            15 => TileKind::PlayerSpawn,
            16 => TileKind::EnemySpawn,
            17..=19 => TileKind::Pickup,
            20 => TileKind::Exit,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether a renderer should draw this cell's sprite.
    pub fn is_drawn(&self) -> bool {
        matches!(
            self,
            TileKind::Obstacle | TileKind::Liquid | TileKind::Scenery | TileKind::Exit
        )
    }
}

/// A placed tile: sprite index plus its world-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub sprite: i32,
    pub kind: TileKind,
    pub rect: Rect,
}

/// Grid cell holding a spawn marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
}

/// Raw level data: rows of tile codes, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelGrid {
    pub rows: Vec<Vec<i32>>,
}

impl LevelGrid {
    pub fn new(rows: Vec<Vec<i32>>) -> Self {
        Self { rows }
    }

    /// A grid of the given size with every cell empty.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![EMPTY_TILE; cols]; rows],
        }
    }

    /// Set one cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, col: usize, code: i32) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = code;
        }
    }

    /// Fill a whole row with one code.
    pub fn fill_row(&mut self, row: usize, code: i32) {
        if let Some(r) = self.rows.get_mut(row) {
            r.iter_mut().for_each(|c| *c = code);
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }
}

/// The loaded level. Inserted as a resource, read-only after load.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct TileWorld {
    pub rows: usize,
    pub cols: usize,
    /// Edge length of a square tile in world units.
    pub tile_size: f32,
    obstacles: Vec<Tile>,
    decorations: Vec<Tile>,
    player_spawn: Spawn,
    enemy_spawns: Vec<Spawn>,
    pickups: Vec<Spawn>,
}

impl TileWorld {
    /// Build the tile world from a grid. Tile size is `screen_height / rows`.
    pub fn from_grid(grid: &LevelGrid, screen_height: f32) -> Result<Self, LoadError> {
        let rows = grid.row_count();
        let cols = grid.col_count();
        if rows == 0 || cols == 0 {
            return Err(LoadError::EmptyGrid);
        }
        let tile_size = screen_height / rows as f32;

        let mut obstacles = Vec::new();
        let mut decorations = Vec::new();
        let mut player_spawn: Option<Spawn> = None;
        let mut enemy_spawns = Vec::new();
        let mut pickups = Vec::new();

        for (row, cells) in grid.rows.iter().enumerate() {
            if cells.len() != cols {
                return Err(LoadError::RaggedRow {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
            for (col, &code) in cells.iter().enumerate() {
                let kind =
                    TileKind::from_code(code).ok_or(LoadError::UnknownTileCode { row, col, code })?;
                let tile = Tile {
                    sprite: code,
                    kind,
                    rect: Rect::new(
                        col as f32 * tile_size,
                        row as f32 * tile_size,
                        tile_size,
                        tile_size,
                    ),
                };
                let here = Spawn { row, col };
                match kind {
                    TileKind::Empty => {}
                    TileKind::Obstacle => obstacles.push(tile),
                    TileKind::Liquid | TileKind::Scenery | TileKind::Exit => decorations.push(tile),
                    TileKind::PlayerSpawn => {
                        if let Some(first) = player_spawn {
                            return Err(LoadError::DuplicatePlayerSpawn {
                                first: (first.row, first.col),
                                second: (row, col),
                            });
                        }
                        player_spawn = Some(here);
                    }
                    TileKind::EnemySpawn => enemy_spawns.push(here),
                    TileKind::Pickup => pickups.push(here),
                }
            }
        }

        let player_spawn = player_spawn.ok_or(LoadError::MissingPlayerSpawn)?;

        Ok(Self {
            rows,
            cols,
            tile_size,
            obstacles,
            decorations,
            player_spawn,
            enemy_spawns,
            pickups,
        })
    }

    /// Total scrollable width of the level in world units.
    pub fn level_width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn obstacles(&self) -> &[Tile] {
        &self.obstacles
    }

    pub fn decorations(&self) -> &[Tile] {
        &self.decorations
    }

    pub fn player_spawn(&self) -> Spawn {
        self.player_spawn
    }

    pub fn enemy_spawns(&self) -> &[Spawn] {
        &self.enemy_spawns
    }

    /// Pickup markers found at load. No entity is created for them.
    pub fn pickups(&self) -> &[Spawn] {
        &self.pickups
    }

    /// Obstacles overlapping `rect`, in load order. Empty for off-grid queries.
    pub fn obstacles_hit<'a>(&'a self, rect: &'a Rect) -> impl Iterator<Item = &'a Tile> + 'a {
        self.obstacles.iter().filter(move |t| t.rect.intersects(rect))
    }

    pub fn hits_obstacle(&self, rect: &Rect) -> bool {
        self.obstacles_hit(rect).next().is_some()
    }

    /// Top-left position for a hitbox standing on the marker cell:
    /// centred horizontally, bottom edge on the cell's bottom edge.
    pub fn spawn_position(&self, spawn: Spawn, hitbox: &Hitbox) -> Position {
        let cell_x = spawn.col as f32 * self.tile_size;
        let cell_bottom = (spawn.row + 1) as f32 * self.tile_size;
        Position::new(
            cell_x + (self.tile_size - hitbox.width) / 2.0,
            cell_bottom - hitbox.height,
        )
    }

    /// Obstacles and decorations whose rectangles fall inside the horizontal
    /// world span `[left, left + width)`.
    pub fn tiles_in_span(&self, left: f32, width: f32) -> impl Iterator<Item = &Tile> {
        let right = left + width;
        self.obstacles
            .iter()
            .chain(self.decorations.iter())
            .filter(|t| t.kind.is_drawn())
            .filter(move |t| t.rect.right() > left && t.rect.left() < right)
    }
}
