//! Field of view.
//!
//! Line-of-sight is traced with Bresenham lines from the viewer to every tile
//! inside a Euclidean radius. Opaque tiles are visible themselves but hide
//! whatever lies behind them.

use std::collections::BTreeSet;

use crate::state::{GameState, Position, TileMap};

/// Tiles visible from `origin` within `radius`.
///
/// The origin is always visible when it lies on the map. A negative radius
/// sees nothing.
pub fn compute_visible(map: &TileMap, origin: Position, radius: i32) -> BTreeSet<Position> {
    let mut visible = BTreeSet::new();
    if radius < 0 || !map.contains(origin) {
        return visible;
    }

    let radius_squared = radius * radius;
    for y in (origin.y - radius)..=(origin.y + radius) {
        for x in (origin.x - radius)..=(origin.x + radius) {
            let target = Position::new(x, y);
            if !map.contains(target) || origin.distance_squared(target) > radius_squared {
                continue;
            }
            if line_of_sight(map, origin, target) {
                visible.insert(target);
            }
        }
    }
    visible
}

/// Recomputes the player's view and folds it into `explored`.
///
/// `explored` only ever grows.
pub fn refresh_visibility(state: &mut GameState, radius: i32) {
    let Some(origin) = state.player_position() else {
        state.visible.clear();
        return;
    };
    state.visible = compute_visible(&state.map, origin, radius);
    state.explored.extend(state.visible.iter().copied());
}

/// Whether every tile strictly between `from` and `to` is transparent.
fn line_of_sight(map: &TileMap, from: Position, to: Position) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut error = dx + dy;
    let (mut x, mut y) = (from.x, from.y);

    loop {
        if x == to.x && y == to.y {
            return true;
        }
        let current = Position::new(x, y);
        if current != from && !map.is_transparent(current) {
            return false;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            x += sx;
        }
        if doubled <= dx {
            error += dx;
            y += sy;
        }
    }
}
