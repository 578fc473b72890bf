//! Room-and-corridor dungeon generation.
//!
//! Each attempt samples fresh parameters, places non-overlapping rooms until
//! the dug target is met, and links consecutive rooms with meandering
//! corridors. An attempt that places no room is retried; after
//! `max_attempts` failures the generator falls back to a single room
//! spanning the interior.

use crate::config::GameConfig;
use crate::env::GameRng;
use crate::state::{Position, Tile, TileMap};

/// Axis-aligned room interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= self.x
            && position.y >= self.y
            && position.x < self.x + self.width
            && position.y < self.y + self.height
    }

    /// Overlap test that also rejects rooms sharing a wall.
    pub fn touches(&self, other: &Room) -> bool {
        self.x - 1 <= other.x + other.width
            && other.x - 1 <= self.x + self.width
            && self.y - 1 <= other.y + other.height
            && other.y - 1 <= self.y + self.height
    }

    fn corners(&self) -> (Position, Position) {
        (
            Position::new(self.x, self.y),
            Position::new(self.x + self.width - 1, self.y + self.height - 1),
        )
    }

    fn area(&self) -> i32 {
        self.width * self.height
    }
}

/// Per-attempt generation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenParams {
    pub room_min: i32,
    pub room_max: i32,
    pub corridor_min: i32,
    pub corridor_max: i32,
    /// Share of the interior to dig out, in percent.
    pub dug_percent: u32,
}

impl GenParams {
    /// Random parameters scaled to a `width` x `height` map.
    pub fn sample(rng: &mut GameRng, width: i32, height: i32) -> Self {
        let side = width.min(height);
        let room_min = rng.range_i32(3, 4).min((side - 2).max(2));
        let room_max = (room_min + rng.range_i32(2, 6)).min((side - 2).max(room_min));
        let corridor_min = rng.range_i32(2, 4);
        let corridor_max = corridor_min + rng.range_i32(2, 8);
        Self {
            room_min,
            room_max,
            corridor_min,
            corridor_max,
            dug_percent: rng.range(25, 45),
        }
    }
}

/// Result of a generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMap {
    pub map: TileMap,
    /// Rooms in shuffled order. Never empty.
    pub rooms: Vec<Room>,
    pub start: Position,
    pub exit: Position,
    /// Tiles where a corridor leaves a room.
    pub doorways: Vec<Position>,
    /// Attempts used, including the successful one.
    pub attempts: u32,
}

/// Glyphs used when carving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub floor: char,
    pub wall: char,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            floor: Tile::FLOOR_GLYPH,
            wall: Tile::WALL_GLYPH,
        }
    }
}

pub fn generate(
    width: u32,
    height: u32,
    palette: Palette,
    rng: &mut GameRng,
    max_attempts: u32,
) -> GeneratedMap {
    generate_with(width, height, palette, rng, max_attempts, GenParams::sample)
}

/// Generation with a custom parameter sampler.
pub fn generate_with<F>(
    width: u32,
    height: u32,
    palette: Palette,
    rng: &mut GameRng,
    max_attempts: u32,
    mut sampler: F,
) -> GeneratedMap
where
    F: FnMut(&mut GameRng, i32, i32) -> GenParams,
{
    let width = width.max(GameConfig::MIN_MAP_SIDE);
    let height = height.max(GameConfig::MIN_MAP_SIDE);

    for attempt in 1..=max_attempts {
        let params = sampler(rng, width as i32, height as i32);
        match carve(width, height, palette, &params, rng) {
            Some(layout) => return finish(layout, palette, rng, attempt),
            None => tracing::debug!(attempt, ?params, "generation produced no rooms, retrying"),
        }
    }

    tracing::warn!(max_attempts, "generation exhausted retries, using single-room layout");
    let mut map = TileMap::filled(width, height, Tile::wall(palette.wall));
    let room = Room::new(1, 1, width as i32 - 2, height as i32 - 2);
    dig_room(&mut map, &room, palette);
    let layout = Layout {
        map,
        rooms: vec![room],
        doorways: Vec::new(),
    };
    finish(layout, palette, rng, max_attempts.saturating_add(1))
}

struct Layout {
    map: TileMap,
    rooms: Vec<Room>,
    doorways: Vec<Position>,
}

fn carve(
    width: u32,
    height: u32,
    palette: Palette,
    params: &GenParams,
    rng: &mut GameRng,
) -> Option<Layout> {
    let (w, h) = (width as i32, height as i32);
    let mut map = TileMap::filled(width, height, Tile::wall(palette.wall));
    let mut rooms: Vec<Room> = Vec::new();
    let mut doorways = Vec::new();

    let interior = (w - 2) * (h - 2);
    let target = interior * params.dug_percent as i32 / 100;
    let room_min = params.room_min.max(2);
    let room_max = params.room_max.max(room_min);
    let mut dug = 0;

    for _ in 0..GameConfig::MAX_ROOM_PLACEMENTS {
        if dug >= target {
            break;
        }
        let room_w = rng.range_i32(room_min, room_max);
        let room_h = rng.range_i32(room_min, room_max);
        if room_w > w - 2 || room_h > h - 2 {
            continue;
        }
        let room = Room::new(
            rng.range_i32(1, w - room_w - 1),
            rng.range_i32(1, h - room_h - 1),
            room_w,
            room_h,
        );
        if rooms.iter().any(|other| other.touches(&room)) {
            continue;
        }

        dig_room(&mut map, &room, palette);
        dug += room.area();
        if let Some(previous) = rooms.last() {
            dug += dig_corridor(&mut map, previous, &room, params, palette, rng, &mut doorways);
        }
        rooms.push(room);
    }

    (!rooms.is_empty()).then_some(Layout {
        map,
        rooms,
        doorways,
    })
}

fn dig_room(map: &mut TileMap, room: &Room, palette: Palette) {
    for y in room.y..room.y + room.height {
        for x in room.x..room.x + room.width {
            map.set(Position::new(x, y), Tile::floor(palette.floor));
        }
    }
}

/// Digs from the center of `from` to the center of `to` in straight
/// segments whose length is drawn from the corridor range. Returns the
/// number of wall tiles turned into floor.
fn dig_corridor(
    map: &mut TileMap,
    from: &Room,
    to: &Room,
    params: &GenParams,
    palette: Palette,
    rng: &mut GameRng,
    doorways: &mut Vec<Position>,
) -> i32 {
    let corridor_min = params.corridor_min.max(1);
    let corridor_max = params.corridor_max.max(corridor_min);
    let target = to.center();
    let mut cursor = from.center();
    let mut dug = 0;

    while cursor != target {
        let dx = target.x - cursor.x;
        let dy = target.y - cursor.y;
        let horizontal = match (dx != 0, dy != 0) {
            (true, true) => rng.range(0, 1) == 0,
            (horizontal, _) => horizontal,
        };
        let remaining = if horizontal { dx.abs() } else { dy.abs() };
        let length = rng.range_i32(corridor_min, corridor_max).min(remaining);

        for _ in 0..length {
            let next = if horizontal {
                Position::new(cursor.x + dx.signum(), cursor.y)
            } else {
                Position::new(cursor.x, cursor.y + dy.signum())
            };
            if from.contains(cursor) && !from.contains(next) {
                doorways.push(next);
            }
            if !to.contains(cursor) && to.contains(next) {
                doorways.push(cursor);
            }
            if !map.is_walkable(next) {
                map.set(next, Tile::floor(palette.floor));
                dug += 1;
            }
            cursor = next;
        }
    }
    dug
}

fn finish(mut layout: Layout, palette: Palette, rng: &mut GameRng, attempts: u32) -> GeneratedMap {
    rng.shuffle(&mut layout.rooms);

    let (start, exit) = match layout.rooms.as_slice() {
        [only] => only.corners(),
        [first, .., last] => (first.center(), last.center()),
        [] => (Position::new(1, 1), Position::new(2, 1)),
    };
    layout.map.set(start, Tile::floor(palette.floor));
    layout.map.set(exit, Tile::floor(palette.floor));

    layout.doorways.sort();
    layout.doorways.dedup();
    layout
        .doorways
        .retain(|door| *door != start && *door != exit && is_chokepoint(&layout.map, *door));

    GeneratedMap {
        map: layout.map,
        rooms: layout.rooms,
        start,
        exit,
        doorways: layout.doorways,
        attempts,
    }
}

/// Floor tile walled on two opposite sides and open on the other two.
fn is_chokepoint(map: &TileMap, position: Position) -> bool {
    let open = |dx: i32, dy: i32| map.is_walkable(Position::new(position.x + dx, position.y + dy));
    map.is_walkable(position)
        && ((!open(0, -1) && !open(0, 1) && open(-1, 0) && open(1, 0))
            || (!open(-1, 0) && !open(1, 0) && open(0, -1) && open(0, 1)))
}
