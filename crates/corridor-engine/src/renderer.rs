//! Text renderer for frames.
//!
//! Prints the culling window with the northern row first. Glyphs:
//! `@` player, `+` highlighted border path, `.` path, `#` region,
//! `O` region center, `~` fully fogged tile, space for empty.

use corridor_common::{Tile, WorldCoord};
use corridor_view::{Frame, TileDraw};

/// Fog values at or above this are drawn as fog.
const FOG_GLYPH_THRESHOLD: u8 = 255;

fn glyph(draw: &TileDraw) -> char {
    if draw.fog >= FOG_GLYPH_THRESHOLD {
        return '~';
    }
    match draw.tile {
        Tile::Path if draw.highlighted => '+',
        tile => tile.glyph(),
    }
}

/// Renders `frame` as text, marking `player` (grid coordinates) if visible.
#[must_use]
pub fn render_text(frame: &Frame, player: Option<WorldCoord>) -> String {
    let window = frame.window;
    let width = (window.end_x - window.start_x + 1) as usize;
    let mut out = String::with_capacity((width + 1) * (window.end_y - window.start_y + 1) as usize);

    for y in (window.start_y..=window.end_y).rev() {
        for x in window.start_x..=window.end_x {
            let c = if player.is_some_and(|p| p.x == x && p.y == y) {
                '@'
            } else {
                frame.draw_at(x, y).map_or(' ', glyph)
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

/// One-line summary printed under each frame.
#[must_use]
pub fn status_line(frame: &Frame, chunk: impl std::fmt::Display, loaded: usize) -> String {
    format!("chunk {chunk} | {loaded} loaded | {}", frame.stats)
}
