use bitflags::bitflags;

use super::Position;

bitflags! {
    /// Physical properties of a tile.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TileFlags: u8 {
        const WALKABLE = 0b0000_0001;
        const TRANSPARENT = 0b0000_0010;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub glyph: char,
    pub flags: TileFlags,
}

impl Tile {
    pub const WALL_GLYPH: char = '#';
    pub const FLOOR_GLYPH: char = '.';
    pub const OPEN_DOOR_GLYPH: char = '\'';
    pub const CLOSED_DOOR_GLYPH: char = '+';

    pub const fn new(glyph: char, flags: TileFlags) -> Self {
        Self { glyph, flags }
    }

    pub const fn floor(glyph: char) -> Self {
        Self::new(glyph, TileFlags::WALKABLE.union(TileFlags::TRANSPARENT))
    }

    pub const fn wall(glyph: char) -> Self {
        Self::new(glyph, TileFlags::empty())
    }

    pub const fn door(open: bool) -> Self {
        if open {
            Self::new(
                Self::OPEN_DOOR_GLYPH,
                TileFlags::WALKABLE.union(TileFlags::TRANSPARENT),
            )
        } else {
            Self::new(Self::CLOSED_DOOR_GLYPH, TileFlags::empty())
        }
    }

    pub fn is_walkable(&self) -> bool {
        self.flags.contains(TileFlags::WALKABLE)
    }

    pub fn is_transparent(&self) -> bool {
        self.flags.contains(TileFlags::TRANSPARENT)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::wall(Self::WALL_GLYPH)
    }
}

/// Fixed-size rectangular tile grid stored row-major.
///
/// Every accessor is bounds-checked; out-of-range positions read as `None`
/// and writes to them are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Creates a `width` x `height` grid filled with `fill`.
    pub fn filled(width: u32, height: u32, fill: Tile) -> Self {
        let width = width as i32;
        let height = height as i32;
        Self {
            width,
            height,
            tiles: vec![fill; (width * height).max(0) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.y >= 0 && position.x < self.width && position.y < self.height
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| (position.y * self.width + position.x) as usize)
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index(position).and_then(|index| self.tiles.get(index))
    }

    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.index(position)
            .and_then(|index| self.tiles.get_mut(index))
    }

    /// Replaces the tile at `position`. Returns false when out of bounds.
    pub fn set(&mut self, position: Position, tile: Tile) -> bool {
        match self.tile_mut(position) {
            Some(slot) => {
                *slot = tile;
                true
            }
            None => false,
        }
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_walkable)
    }

    pub fn is_transparent(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_transparent)
    }

    /// Every coordinate of the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}
