//! Raster rendering of the results timeline.
//!
//! Layout: two background bands (one per context), one tile per response,
//! a side marker under each tile and a vertical switch marker between the
//! bands.

use anyhow::{Context as _, Result};
use sortex_core::{Context, Side, TOTAL_TRIALS};
use sortex_experiment::{SessionSummary, TimelineEntry};
use std::path::Path;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct TimelinePalette {
    pub background: [u8; 4],
    pub first_band: [u8; 4],
    pub second_band: [u8; 4],
    pub first_border: [u8; 4],
    pub second_border: [u8; 4],
    pub correct_tile: [u8; 4],
    pub incorrect_tile: [u8; 4],
    pub correct_mark: [u8; 4],
    pub incorrect_mark: [u8; 4],
    pub switch_marker: [u8; 4],
}

impl Default for TimelinePalette {
    fn default() -> Self {
        Self {
            background: [249, 250, 251, 255],
            first_band: [219, 234, 254, 255],
            second_band: [220, 252, 231, 255],
            first_border: [147, 197, 253, 255],
            second_border: [134, 239, 172, 255],
            correct_tile: [255, 255, 255, 255],
            incorrect_tile: [254, 242, 242, 255],
            correct_mark: [22, 163, 74, 255],
            incorrect_mark: [220, 38, 38, 255],
            switch_marker: [107, 114, 128, 255],
        }
    }
}

fn paint(color: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.anti_alias = false;
    paint.set_color(Color::from_rgba8(color[0], color[1], color[2], color[3]));
    paint
}

struct Layout {
    margin: f32,
    band_top: f32,
    band_height: f32,
    slot_width: f32,
    tile: f32,
    width: f32,
}

impl Layout {
    fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let margin = (w * 0.02).max(4.0);
        let band_top = h * 0.2;
        let band_height = h * 0.6;
        let slot_width = (w - 2.0 * margin) / TOTAL_TRIALS as f32;
        let tile = (slot_width * 0.7).min(band_height * 0.6).max(4.0);
        Self {
            margin,
            band_top,
            band_height,
            slot_width,
            tile,
            width: w,
        }
    }

    fn tile_origin(&self, trial: usize) -> (f32, f32) {
        let x = self.margin + self.slot_width * (trial as f32 + 0.5) - self.tile / 2.0;
        let y = self.band_top + (self.band_height - self.tile) / 2.0;
        (x, y)
    }

    fn switch_x(&self, switch_point: usize) -> f32 {
        self.margin + self.slot_width * switch_point as f32
    }
}

/// Draws the timeline of `summary` into a new pixmap
pub fn render_timeline(
    summary: &SessionSummary,
    width: u32,
    height: u32,
    palette: &TimelinePalette,
) -> Result<Pixmap> {
    let mut pixmap =
        Pixmap::new(width, height).with_context(|| format!("invalid size {width}x{height}"))?;
    let [r, g, b, a] = palette.background;
    pixmap.fill(Color::from_rgba8(r, g, b, a));

    let layout = Layout::new(width, height);
    let split = layout.switch_x(summary.switch_point);

    let bands = [
        (layout.margin, split, palette.first_band),
        (split, layout.width - layout.margin, palette.second_band),
    ];
    for (x0, x1, color) in bands {
        if let Some(rect) = Rect::from_xywh(x0, layout.band_top, x1 - x0, layout.band_height) {
            pixmap.fill_rect(rect, &paint(color), Transform::identity(), None);
        }
    }

    for entry in &summary.timeline {
        draw_entry(&mut pixmap, &layout, entry, palette);
    }

    let marker = Rect::from_xywh(
        split - 1.0,
        layout.band_top * 0.5,
        2.0,
        layout.band_height + layout.band_top,
    )
    .context("switch marker out of bounds")?;
    pixmap.fill_rect(
        marker,
        &paint(palette.switch_marker),
        Transform::identity(),
        None,
    );

    debug!(
        width,
        height,
        entries = summary.timeline.len(),
        "timeline rendered"
    );
    Ok(pixmap)
}

fn draw_entry(pixmap: &mut Pixmap, layout: &Layout, entry: &TimelineEntry, palette: &TimelinePalette) {
    let (x, y) = layout.tile_origin(entry.trial);
    let Some(tile) = Rect::from_xywh(x, y, layout.tile, layout.tile) else {
        return;
    };

    let fill = if entry.correct {
        palette.correct_tile
    } else {
        palette.incorrect_tile
    };
    pixmap.fill_rect(tile, &paint(fill), Transform::identity(), None);

    let border = match entry.context {
        Context::First => palette.first_border,
        Context::Second => palette.second_border,
    };
    let outline = PathBuilder::from_rect(tile);
    let stroke = Stroke {
        width: 2.0,
        ..Stroke::default()
    };
    pixmap.stroke_path(&outline, &paint(border), &stroke, Transform::identity(), None);

    // half-width bar under the tile, on the side that was picked
    let half = layout.tile / 2.0;
    let bar_x = match entry.side {
        Side::Left => x,
        Side::Right => x + half,
    };
    let mark = if entry.correct {
        palette.correct_mark
    } else {
        palette.incorrect_mark
    };
    if let Some(bar) = Rect::from_xywh(bar_x, y + layout.tile + 4.0, half, 4.0) {
        pixmap.fill_rect(bar, &paint(mark), Transform::identity(), None);
    }
}

/// Renders the timeline and writes it as a PNG file
pub fn save_timeline_png(
    summary: &SessionSummary,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
) -> Result<()> {
    let path = path.as_ref();
    let pixmap = render_timeline(summary, width, height, &TimelinePalette::default())?;
    pixmap
        .save_png(path)
        .with_context(|| format!("writing timeline to {}", path.display()))?;
    Ok(())
}
