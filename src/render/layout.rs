// src/render/layout.rs
//! Pure chart geometry: where every bar, gridline and text run goes.
//!
//! Canvas width is fixed (`FIG_WIDTH_IN * DPI`); height follows the row count, so
//! the picture is tight around its content. Rows run top to bottom in series order.

use chrono::NaiveDate;

use super::text::{self, TextRun, GLYPH};
use crate::config::consts::{CAPTION, DPI, FG, FIG_WIDTH_IN, NEGATIVE, POSITIVE};
use crate::series::{ChartSpec, ColorRule};

const PAD: u32 = 24;
const TITLE_SCALE: u32 = 3;
const TEXT_SCALE: u32 = 2;
const ROW_PITCH: u32 = 40;
const BAR_H: u32 = 26;
const GUTTER: u32 = 12;
const MAX_LABEL_CHARS: usize = 24;
const TARGET_TICKS: f64 = 5.0;
const MIN_BAR_W: u32 = 2;
const MAX_TICKS: usize = 64;

/// Viridis stops, dark to light.
const GRADIENT: [[u8; 3]; 5] = [
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub color: [u8; 3],
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub plot: Rect,
    pub bars: Vec<Bar>,
    /// x of each vertical gridline (one per tick)
    pub gridlines: Vec<u32>,
    /// x of the zero axis when the value range crosses zero
    pub zero_x: Option<u32>,
    pub title: TextRun,
    pub caption: TextRun,
    /// bar labels, value labels, tick labels
    pub texts: Vec<TextRun>,
}

pub fn canvas_width() -> u32 {
    (FIG_WIDTH_IN * DPI as f32).round() as u32
}

/// Color of bar `i` of `n` under `rule`.
pub fn bar_color(rule: ColorRule, value: f64, i: usize, n: usize) -> [u8; 3] {
    match rule {
        ColorRule::Signed => if value >= 0.0 { POSITIVE } else { NEGATIVE },
        ColorRule::Gradient => {
            let t = if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
            let span = (GRADIENT.len() - 1) as f64;
            let pos = t * span;
            let lo = (pos.floor() as usize).min(GRADIENT.len() - 1);
            let hi = (lo + 1).min(GRADIENT.len() - 1);
            let f = pos - lo as f64;
            let mut out = [0u8; 3];
            for (c, o) in out.iter_mut().enumerate() {
                let a = GRADIENT[lo][c] as f64;
                let b = GRADIENT[hi][c] as f64;
                *o = (a + (b - a) * f).round() as u8;
            }
            out
        }
    }
}

/// 1, 2, 2.5 or 5 times a power of ten, at least `raw`.
pub fn nice_step(raw: f64) -> f64 {
    if !(raw > 0.0) || !raw.is_finite() {
        return 1.0;
    }
    let base = 10f64.powf(raw.log10().floor());
    let f = raw / base;
    let nice = if f <= 1.0 { 1.0 } else if f <= 2.0 { 2.0 } else if f <= 2.5 { 2.5 } else if f <= 5.0 { 5.0 } else { 10.0 };
    nice * base
}

/// Axis bounds snapped to the tick step, always including zero. Bounds stay
/// finite for any finite input; a snap that would overflow keeps the raw bound.
pub fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64, f64) {
    let (mut lo, mut hi) = (0.0f64, 0.0f64);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo == hi {
        hi = lo + 1.0;
    }
    // divide first: `hi - lo` overflows for ranges near f64::MAX
    let step = nice_step(hi / TARGET_TICKS - lo / TARGET_TICKS);
    let lo_t = Some((lo / step).floor() * step).filter(|v| v.is_finite()).unwrap_or(lo);
    let mut hi_t = Some((hi / step).ceil() * step).filter(|v| v.is_finite()).unwrap_or(hi);
    if hi_t <= lo_t {
        hi_t = lo_t + step;
    }
    (lo_t, hi_t, step)
}

fn group_thousands(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Number with `decimals` places and `,` thousands grouping.
pub fn format_number(v: f64, decimals: usize) -> String {
    let raw = format!("{:.*}", decimals, v.abs());
    let (int_part, frac) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };
    let mut out = s!();
    if v < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Value label: fewer decimals as magnitude grows.
pub fn format_value(v: f64) -> String {
    let a = v.abs();
    let decimals = if a >= 100.0 { 0 } else if a >= 10.0 { 1 } else { 2 };
    format_number(v, decimals)
}

fn format_tick(v: f64, step: f64) -> String {
    // fewest decimals that represent the step exactly (0.25 → 2, 0.5 → 1, 5 → 0)
    let mut decimals = 0usize;
    while decimals < 4 {
        let scaled = step * 10f64.powi(decimals as i32);
        if (scaled - scaled.round()).abs() < 1e-9 {
            break;
        }
        decimals += 1;
    }
    format_number(v, decimals)
}

pub fn layout(spec: &ChartSpec, date: NaiveDate) -> ChartLayout {
    let width = canvas_width();
    let entries = spec.series().entries();
    let n = entries.len();
    let glyph_w = GLYPH * TEXT_SCALE;
    let text_h = GLYPH * TEXT_SCALE;

    // Title, centered.
    let max_title_chars = ((width - 2 * PAD) / (GLYPH * TITLE_SCALE)) as usize;
    let title_text = text::truncate(spec.title(), max_title_chars);
    let title_w = text::text_width(&title_text, TITLE_SCALE, true);
    let title = TextRun {
        text: title_text,
        x: width.saturating_sub(title_w) / 2,
        y: PAD,
        scale: TITLE_SCALE,
        color: FG,
        bold: true,
    };

    // Horizontal split: labels | gutter | plot | value labels.
    let labels: Vec<String> = entries.iter().map(|(l, _)| text::truncate(l, MAX_LABEL_CHARS)).collect();
    let values: Vec<String> = entries.iter().map(|(_, v)| format_value(*v)).collect();
    let label_w = labels.iter().map(|l| text::text_width(l, TEXT_SCALE, false)).max().unwrap_or(0);
    let value_w = values.iter().map(|v| text::text_width(v, TEXT_SCALE, false)).max().unwrap_or(0) + GUTTER;

    let plot_left = PAD + label_w + GUTTER;
    let plot_right = width.saturating_sub(PAD + value_w).max(plot_left + 1);
    let plot_top = PAD + GLYPH * TITLE_SCALE + 20;
    let plot_h = n as u32 * ROW_PITCH;
    let plot = Rect { x: plot_left, y: plot_top, w: plot_right - plot_left, h: plot_h };

    let (lo, hi, step) = axis_range(entries.iter().map(|(_, v)| *v));
    let span = hi * 0.5 - lo * 0.5;
    let x_of = |v: f64| -> f64 { plot_left as f64 + (v * 0.5 - lo * 0.5) / span * plot.w as f64 };
    let zero = x_of(0.0);

    let mut texts = Vec::with_capacity(3 * n + 8);
    let mut bars = Vec::with_capacity(n);

    for (i, ((label, value), (short, shown))) in entries.iter().zip(labels.iter().zip(values.iter())).enumerate() {
        let y = plot_top + i as u32 * ROW_PITCH + (ROW_PITCH - BAR_H) / 2;
        let end = x_of(*value);
        let x0 = zero.min(end).round() as u32;
        let x1 = zero.max(end).round() as u32;
        let rect = Rect { x: x0, y, w: (x1 - x0).max(MIN_BAR_W), h: BAR_H };

        let text_y = y + (BAR_H - text_h) / 2;
        let short_w = text::text_width(short, TEXT_SCALE, false);
        texts.push(TextRun {
            text: short.clone(),
            x: plot_left.saturating_sub(GUTTER + short_w),
            y: text_y,
            scale: TEXT_SCALE,
            color: FG,
            bold: false,
        });
        texts.push(TextRun {
            text: shown.clone(),
            x: x1.max(rect.x + rect.w) + GUTTER / 2,
            y: text_y,
            scale: TEXT_SCALE,
            color: FG,
            bold: false,
        });

        bars.push(Bar {
            label: label.clone(),
            value: *value,
            color: bar_color(spec.color_rule(), *value, i, n),
            rect,
        });
    }

    // Ticks under the plot.
    let tick_y = plot_top + plot_h + 8;
    let tick_count = ((hi / step - lo / step).round() as usize).min(MAX_TICKS);
    let mut gridlines = Vec::with_capacity(tick_count + 1);
    for k in 0..=tick_count {
        let v = lo + k as f64 * step;
        if !v.is_finite() || v > hi + step * 1e-6 {
            break;
        }
        let gx = x_of(v).round() as u32;
        gridlines.push(gx);
        let label = format_tick(v, step);
        let lw = text::text_width(&label, TEXT_SCALE, false);
        texts.push(TextRun {
            text: label,
            x: gx.saturating_sub(lw / 2),
            y: tick_y,
            scale: TEXT_SCALE,
            color: CAPTION,
            bold: false,
        });
    }

    // Caption: citation and date.
    let caption_y = tick_y + text_h + 16;
    let max_caption_chars = ((width - 2 * PAD) / glyph_w) as usize;
    let caption = TextRun {
        text: text::truncate(
            &format!("Source: {} | {}", spec.source_citation(), date.format("%Y-%m-%d")),
            max_caption_chars,
        ),
        x: PAD,
        y: caption_y,
        scale: TEXT_SCALE,
        color: CAPTION,
        bold: false,
    };

    ChartLayout {
        width,
        height: caption_y + text_h + PAD,
        plot,
        bars,
        gridlines,
        zero_x: if lo < 0.0 { Some(zero.round() as u32) } else { None },
        title,
        caption,
        texts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::NormalizedSeries;

    fn spec(pairs: &[(&str, f64)], rule: ColorRule) -> ChartSpec {
        let series = NormalizedSeries::from_ranked(pairs.iter().map(|(l, v)| (l.to_string(), *v)).collect()).unwrap();
        ChartSpec::new(series, "Shipping movers", "Yahoo Finance", rule)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(7.0), 10.0);
        assert_eq!(nice_step(1.3), 2.0);
        assert_eq!(nice_step(23.0), 25.0);
        assert_eq!(nice_step(420.0), 500.0);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn axis_includes_zero() {
        let (lo, hi, step) = axis_range([3.0, 9.4, 1.2].into_iter());
        assert_eq!((lo, hi, step), (0.0, 10.0, 2.0));
        let (lo, hi, _) = axis_range([5.2, -1.3, 0.0].into_iter());
        assert!(lo <= -1.3 && hi >= 5.2);
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_value(1234567.0), "1,234,567");
        assert_eq!(format_value(-1.3), "-1.30");
        assert_eq!(format_value(27.99), "28.0");
        assert_eq!(format_value(-0.001), "0.00");
        assert_eq!(format_number(999.6, 0), "1,000");
        assert_eq!(format_tick(0.5, 0.25), "0.50");
        assert_eq!(format_tick(10.0, 5.0), "10");
    }

    #[test]
    fn rows_follow_series_order_top_down() {
        let l = layout(&spec(&[("A", 1.0), ("B", 3.0), ("C", 2.0)], ColorRule::Gradient), day());
        let labels: Vec<_> = l.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert!(l.bars.windows(2).all(|w| w[0].rect.y < w[1].rect.y));
        // longer value → longer bar
        assert!(l.bars[1].rect.w > l.bars[2].rect.w && l.bars[2].rect.w > l.bars[0].rect.w);
    }

    #[test]
    fn gradient_runs_dark_to_light() {
        assert_eq!(bar_color(ColorRule::Gradient, 1.0, 0, 5), GRADIENT[0]);
        assert_eq!(bar_color(ColorRule::Gradient, 1.0, 4, 5), GRADIENT[4]);
        assert_eq!(bar_color(ColorRule::Gradient, 1.0, 0, 1), GRADIENT[0]);
    }

    #[test]
    fn negative_bars_extend_left_of_zero() {
        let l = layout(&spec(&[("Up", 4.0), ("Down", -2.0)], ColorRule::Signed), day());
        let zero = l.zero_x.unwrap();
        assert_eq!(l.bars[0].rect.x, zero);
        assert_eq!(l.bars[1].rect.x + l.bars[1].rect.w, zero);
        assert!(l.bars.iter().all(|b| b.rect.x >= l.plot.x && b.rect.x + b.rect.w <= l.plot.x + l.plot.w));
    }

    #[test]
    fn extreme_finite_values_stay_bounded() {
        let (lo, hi, step) = axis_range([f64::MAX, -f64::MAX].into_iter());
        assert!(lo.is_finite() && hi.is_finite() && step.is_finite());
        assert!(lo <= -f64::MAX && hi >= f64::MAX);

        let l = layout(&spec(&[("a", f64::MAX), ("b", -f64::MAX)], ColorRule::Signed), day());
        assert_eq!(l.bars.len(), 2);
        assert!(!l.gridlines.is_empty() && l.gridlines.len() <= MAX_TICKS + 1);
        assert!(l.gridlines.iter().all(|&gx| gx >= l.plot.x && gx <= l.plot.x + l.plot.w));
        assert!(l.zero_x.is_some());
    }

    #[test]
    fn canvas_fits_everything() {
        let l = layout(&spec(&[("A", 1.0)], ColorRule::Gradient), day());
        assert_eq!(l.width, canvas_width());
        assert!(l.caption.text.ends_with("2026-10-19"));
        assert!(l.caption.y + GLYPH * TEXT_SCALE <= l.height);
        for t in l.texts.iter().chain([&l.title, &l.caption]) {
            assert!(t.x + text::text_width(&t.text, t.scale, t.bold) <= l.width, "{t:?} overflows");
        }
    }
}
