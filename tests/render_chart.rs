// tests/render_chart.rs
use chrono::NaiveDate;
use image::GenericImageView;

use chartpost::config::consts::{DPI, NEGATIVE, POSITIVE};
use chartpost::render::{layout, pixels_per_metre, Renderer};
use chartpost::series::{ChartSpec, ColorRule, NormalizedSeries};

fn movers() -> ChartSpec {
    let series = NormalizedSeries::from_ranked(vec![
        ("ZIM Shipping".into(), 5.2),
        ("FedEx".into(), -1.3),
        ("UPS".into(), 0.0),
    ])
    .unwrap();
    ChartSpec::new(series, "Shipping & Logistics: Daily Change (%)", "Yahoo Finance", ColorRule::Signed)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

#[test]
fn signed_scenario_keeps_source_order_and_colors() {
    let l = layout(&movers(), date());
    let order: Vec<&str> = l.bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(order, ["ZIM Shipping", "FedEx", "UPS"]);
    assert_eq!(l.bars[0].color, POSITIVE);
    assert_eq!(l.bars[1].color, NEGATIVE);
    assert_eq!(l.bars[2].color, POSITIVE);

    // top to bottom
    assert!(l.bars.windows(2).all(|w| w[0].rect.y < w[1].rect.y));
    assert_eq!(l.caption.text, "Source: Yahoo Finance | 2024-05-17");
}

#[test]
fn rendered_png_shows_bar_colors() {
    let tmp = tempfile::tempdir().unwrap();
    let spec = movers();
    let l = layout(&spec, date());

    let mut r = Renderer::new(tmp.path()).with_date(date());
    let art = r.render(spec).unwrap();
    assert!(art.path.exists());
    assert_eq!(art.title, "Shipping & Logistics: Daily Change (%)");

    let img = image::open(&art.path).unwrap();
    assert_eq!(img.dimensions(), (l.width, l.height));
    for bar in &l.bars[..2] {
        let px = img.get_pixel(bar.rect.x + bar.rect.w / 2, bar.rect.y + bar.rect.h / 2);
        assert_eq!(&px.0[..3], &bar.color[..], "{}", bar.label);
    }
}

#[test]
fn rendering_twice_gives_same_picture_shape() {
    let tmp = tempfile::tempdir().unwrap();
    let mut r = Renderer::new(tmp.path()).with_date(date());
    let a = r.render(movers()).unwrap();
    let b = r.render(movers()).unwrap();

    assert_ne!(a.path, b.path);
    assert_eq!(a.file_name, "shipping_logistics_daily_change.png");
    assert_eq!(b.file_name, "shipping_logistics_daily_change (2).png");

    let (ia, ib) = (image::open(&a.path).unwrap(), image::open(&b.path).unwrap());
    assert_eq!(ia.dimensions(), ib.dimensions());
    assert_eq!(ia.to_rgb8(), ib.to_rgb8());
}

#[test]
fn creates_missing_output_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("charts").join("today");
    let art = Renderer::new(&out).with_date(date()).render(movers()).unwrap();
    assert!(art.path.starts_with(&out));
}

#[test]
fn png_records_figure_dpi() {
    let tmp = tempfile::tempdir().unwrap();
    let art = Renderer::new(tmp.path()).with_date(date()).render(movers()).unwrap();
    let bytes = std::fs::read(&art.path).unwrap();

    let at = bytes.windows(4).position(|w| w == b"pHYs").expect("pHYs chunk");
    let field = |o: usize| u32::from_be_bytes(bytes[at + o..at + o + 4].try_into().unwrap());
    let ppm = pixels_per_metre(DPI);
    assert_eq!((field(4), field(8)), (ppm, ppm));
    assert_eq!(bytes[at + 12], 1, "unit is metre");
    assert_eq!(pixels_per_metre(120), 4724);
}
