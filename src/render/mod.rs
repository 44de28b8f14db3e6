// src/render/mod.rs
//! Chart renderer: one [`ChartSpec`] in, one PNG on disk out.
//!
//! [`layout`] decides geometry; [`rasterize`] paints it onto a black canvas with
//! the `image` crate. Files land in the renderer's output directory, named after
//! the chart title and numbered on repeats within the run.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDate};
use image::{Rgb, RgbImage};
use thiserror::Error;

use crate::config::consts::{BG, CHART_EXT, DPI, FG, GRID};
use crate::core::sanitize::slug;
use crate::deliver::RenderedArtifact;
use crate::file::{ensure_directory, resolve_chart_filename};
use crate::series::ChartSpec;

pub mod layout;
pub mod text;

pub use layout::{layout, Bar, ChartLayout, Rect};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("image encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("nothing to draw")]
    Empty,
}

fn fill(img: &mut RgbImage, r: Rect, color: [u8; 3]) {
    let (w, h) = img.dimensions();
    for y in r.y..(r.y + r.h).min(h) {
        for x in r.x..(r.x + r.w).min(w) {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}

/// Paint a layout. Order: gridlines, bars, zero axis, text.
pub fn rasterize(l: &ChartLayout) -> RgbImage {
    let mut img = RgbImage::from_pixel(l.width, l.height, Rgb(BG));

    for &gx in &l.gridlines {
        fill(&mut img, Rect { x: gx, y: l.plot.y, w: 1, h: l.plot.h }, GRID);
    }
    for bar in &l.bars {
        fill(&mut img, bar.rect, bar.color);
    }
    if let Some(zx) = l.zero_x {
        fill(&mut img, Rect { x: zx, y: l.plot.y, w: 1, h: l.plot.h }, FG);
    }

    text::draw(&mut img, &l.title);
    for run in &l.texts {
        text::draw(&mut img, run);
    }
    text::draw(&mut img, &l.caption);
    img
}

/// Pixels per metre for a dots-per-inch figure, as stored in `pHYs`.
pub fn pixels_per_metre(dpi: u32) -> u32 {
    (dpi as f64 / 0.0254).round() as u32
}

/// Write `img` as 8-bit RGB PNG with its physical resolution set to [`DPI`].
fn save_png(path: &Path, img: &RgbImage) -> Result<(), RenderError> {
    let out = BufWriter::new(File::create(path)?);
    let mut enc = png::Encoder::new(out, img.width(), img.height());
    enc.set_color(png::ColorType::Rgb);
    enc.set_depth(png::BitDepth::Eight);
    let ppm = pixels_per_metre(DPI);
    enc.set_pixel_dims(Some(png::PixelDimensions { xppu: ppm, yppu: ppm, unit: png::Unit::Meter }));

    let mut writer = enc.write_header()?;
    writer.write_image_data(img.as_raw())?;
    writer.finish()?;
    Ok(())
}

pub struct Renderer {
    out_dir: PathBuf,
    date: NaiveDate,
    seen: HashMap<String, usize>,
    rendered: usize,
}

impl Renderer {
    /// Caption date is today (local time).
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            date: Local::now().date_naive(),
            seen: HashMap::new(),
            rendered: 0,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Draw `spec` and write it out. The file is complete when this returns.
    pub fn render(&mut self, spec: ChartSpec) -> Result<RenderedArtifact, RenderError> {
        if spec.series().is_empty() {
            return Err(RenderError::Empty);
        }
        let l = layout(&spec, self.date);
        let img = rasterize(&l);

        ensure_directory(&self.out_dir)?;
        let stem = slug(spec.title(), self.rendered);
        let path = resolve_chart_filename(&self.out_dir, &stem, &mut self.seen, CHART_EXT);
        save_png(&path, &img)?;
        self.rendered += 1;

        logd!("Render: {} ({}x{}, {} bars) → {}", spec.title(), l.width, l.height, l.bars.len(), path.display());
        Ok(RenderedArtifact::new(path, spec.title()))
    }
}
