//! # Composition Tests
//!
//! End-to-end checks of the layer pipeline on full-size canvases: flow layout
//! between text and images, the bottom fade, JSON presets and the batch
//! pipeline. Text uses the block font so no font file is needed.

use cardpress::batch::{BatchReport, BatchRunner, CardSink, DirectorySink, NewsItem};
use cardpress::config::{CardConfig, OutputFormat};
use cardpress::fetch::ImageSource;
use cardpress::layers::image::place;
use cardpress::preset::{ImageLayer, NewsTemplate, Preset, PresetFile, TextboxLayer};
use cardpress::render::Composer;
use cardpress::style::{Color, Position};
use cardpress::text::{BlockFont, FontRef};
use cardpress::{CardError, Layer};
use image::{DynamicImage, Rgb, RgbImage};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn title_font() -> FontRef {
    Arc::new(BlockFont::TITLE)
}

fn solid_image(w: u32, h: u32, color: [u8; 3]) -> Arc<DynamicImage> {
    Arc::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(color))))
}

fn close_to(pixel: &Rgb<u8>, expected: [u8; 3]) -> bool {
    pixel
        .0
        .iter()
        .zip(expected)
        .all(|(a, b)| (*a as i32 - b as i32).abs() <= 2)
}

fn hello_world_preset(photo: Arc<DynamicImage>) -> Preset {
    Preset::new(Color::rgb(244, 244, 244))
        .layer(
            TextboxLayer::new("Hello World", title_font(), Position::at(80, 100), 920)
                .text_fill(Color::WHITE)
                .background(Color::rgb(0, 45, 98))
                .padding(10)
                .unwrap(),
        )
        .layer(ImageLayer::new(photo, Position::auto(0)).resize_to_height())
}

// ============================================================================
// FLOW LAYOUT
// ============================================================================

#[test]
fn test_image_top_edge_meets_text_block_bottom() {
    let composer = Composer::default();
    let photo = solid_image(400, 300, [10, 200, 30]);
    let preset = hello_world_preset(photo);

    let (canvas, trace) = composer.compose_traced(&preset).unwrap();
    // one 52px line + 10px padding above and below, then bottom padding
    let text_bottom = 100 + 72 + 10;
    assert_eq!(trace[0].y(), text_bottom);

    let Layer::Image(image_layer) = &preset.layers[1] else {
        panic!("expected image layer");
    };
    let placed = place(image_layer, composer.size(), trace[0].y()).unwrap();
    assert_eq!(placed.y, text_bottom);
    assert_eq!((placed.image.width(), placed.image.height()), (1080, 1350));

    // left margin, clear of the title banner
    assert_eq!(*canvas.get_pixel(5, text_bottom as u32 - 1), Rgb([244, 244, 244]));
    assert!(close_to(canvas.get_pixel(5, text_bottom as u32), [10, 200, 30]));
    assert!(close_to(canvas.get_pixel(1000, 1349), [10, 200, 30]));
}

#[test]
fn test_title_banner_is_painted() {
    let canvas = Composer::default()
        .compose(&hello_world_preset(solid_image(10, 10, [0, 0, 0])))
        .unwrap();
    // banner starts at (70, 90); the first glyph cell is inset from (80, 100)
    assert_eq!(*canvas.get_pixel(72, 92), Rgb([0, 45, 98]));
    assert_eq!(*canvas.get_pixel(85, 110), Rgb([255, 255, 255]));
}

#[test]
fn test_cursor_never_decreases() {
    let small: FontRef = Arc::new(BlockFont::SMALL);
    let preset = Preset::default()
        .layer(ImageLayer::new(solid_image(50, 400, [1, 1, 1]), Position::at(0, 0)))
        .layer(TextboxLayer::new("up high", small.clone(), Position::at(0, 10), 500))
        .black_fade(200)
        .layer(TextboxLayer::new("flowing text here", small, Position::auto(20), 100).auto_y_padding(8))
        .layer(ImageLayer::new(solid_image(20, 20, [2, 2, 2]), Position::at(0, 5)))
        .layer(ImageLayer::new(solid_image(200, 100, [3, 3, 3]), Position::auto(0)).max_size(Some(100), None));

    let (_, trace) = Composer::default().compose_traced(&preset).unwrap();
    assert_eq!(trace.len(), preset.layers.len());
    assert!(trace.windows(2).all(|w| w[0] <= w[1]), "{:?}", trace);
    // the last image flows from the cursor and is scaled to 100x50
    assert_eq!(trace[5].y() - trace[4].y(), 50);
}

// ============================================================================
// FADE
// ============================================================================

#[test]
fn test_fade_rows_on_full_canvas() {
    let composer = Composer::default();
    let base = Preset::new(Color::rgb(244, 244, 244))
        .layer(ImageLayer::new(solid_image(1080, 1350, [180, 120, 60]), Position::at(0, 0)));
    let before = composer.compose(&base).unwrap();
    let after = composer.compose(&base.clone().black_fade(300)).unwrap();

    for y in 0..1050 {
        for x in [0, 540, 1079] {
            assert_eq!(before.get_pixel(x, y), after.get_pixel(x, y), "row {}", y);
        }
    }
    assert_eq!(after.get_pixel(540, 1050), before.get_pixel(540, 1050));
    assert_eq!(*after.get_pixel(540, 1349), Rgb([0, 0, 0]));

    let column: Vec<u8> = (1050..1350).map(|y| after.get_pixel(540, y).0[0]).collect();
    assert!(column.windows(2).all(|w| w[0] >= w[1]));
    assert!(column[150] < column[0] && column[150] > column[299]);
}

#[test]
fn test_json_fade_far_taller_than_canvas() {
    let json = r#"{ "layers": [ { "type": "black_fade", "height": 4000000000 } ] }"#;
    let preset = PresetFile::parse(json).unwrap().resolve(&Default::default()).unwrap();
    let canvas = Composer::new(40, 30).unwrap().compose(&preset).unwrap();
    assert_eq!(*canvas.get_pixel(20, 29), Rgb([0, 0, 0]));
    let column: Vec<u8> = (0..30).map(|y| canvas.get_pixel(20, y).0[0]).collect();
    assert!(column.windows(2).all(|w| w[0] >= w[1]));
}

// ============================================================================
// JSON PRESETS
// ============================================================================

#[test]
fn test_json_preset_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    RgbImage::from_pixel(200, 100, Rgb([0, 0, 255]))
        .save(dir.path().join("photo.png"))
        .unwrap();
    let json = r#"{
        "fonts": { "title": { "builtin": "title" } },
        "images": { "photo": { "path": "photo.png" } },
        "layers": [
            { "type": "textbox", "text": "Hi", "font": "title", "position": [0, 0] },
            { "type": "image", "image": "photo", "position": [0, "auto"], "max_width": 100 }
        ]
    }"#;
    let path = dir.path().join("card.json");
    std::fs::write(&path, json).unwrap();

    let preset = PresetFile::load(&path).unwrap();
    assert_eq!(preset.bg_color, Color::rgb(244, 244, 244));
    let (canvas, trace) = Composer::new(300, 300).unwrap().compose_traced(&preset).unwrap();
    // text block is one 48px glyph row, image is 100x50 below it
    assert_eq!(trace[0].y(), 48);
    assert_eq!(trace[1].y(), 98);
    assert!(close_to(canvas.get_pixel(50, 70), [0, 0, 255]));
    assert_eq!(*canvas.get_pixel(150, 70), Rgb([244, 244, 244]));
}

#[test]
fn test_json_preset_unknown_font_fails_before_render() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("card.json");
    std::fs::write(
        &path,
        r#"{ "layers": [ { "type": "textbox", "text": "x", "font": "missing", "position": [0, 0] } ] }"#,
    )
    .unwrap();
    assert!(matches!(PresetFile::load(&path), Err(CardError::Preset(_))));
}

// ============================================================================
// BATCH
// ============================================================================

/// Records delivered cards and rejects one index.
struct RecordingSink {
    reject: usize,
    delivered: Mutex<Vec<(usize, String, usize)>>,
}

impl CardSink for RecordingSink {
    fn deliver(&self, index: usize, item: &NewsItem, card: &[u8]) -> Result<(), CardError> {
        if index == self.reject {
            return Err(CardError::Image("sink rejected card".into()));
        }
        self.delivered
            .lock()
            .unwrap()
            .push((index, item.title.clone(), card.len()));
        Ok(())
    }
}

fn template() -> NewsTemplate {
    NewsTemplate::new(title_font(), Arc::new(BlockFont::SMALL))
}

/// Resolve images on a runtime, then render outside of it.
fn run_batch(runner: &BatchRunner, items: &[NewsItem], sink: &dyn CardSink) -> BatchReport {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let images = runtime.block_on(runner.resolve_images(items));
    runner.render_all(items, &images, sink)
}

fn small_config(dir: &std::path::Path) -> CardConfig {
    CardConfig {
        width: 216,
        height: 270,
        output_dir: dir.to_path_buf(),
        format: OutputFormat::Png,
        placeholder_size: (40, 40),
        max_source_size: (100, 100),
        ..CardConfig::default()
    }
}

#[test]
fn test_batch_continues_after_failed_item() {
    let dir = tempfile::tempdir().unwrap();
    let items = vec![
        NewsItem {
            image: Some(ImageSource::Loaded(solid_image(50, 50, [9, 9, 9]))),
            ..NewsItem::new("first")
        },
        NewsItem::new("second"),
        NewsItem {
            image: Some(ImageSource::Path(dir.path().join("missing.png"))),
            ..NewsItem::new("third")
        },
    ];
    let sink = RecordingSink {
        reject: 1,
        delivered: Mutex::new(Vec::new()),
    };

    let runner = BatchRunner::new(template(), small_config(dir.path())).unwrap();
    let report = run_batch(&runner, &items, &sink);

    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, 1);

    let mut delivered = sink.delivered.into_inner().unwrap();
    delivered.sort();
    let titles: Vec<_> = delivered.iter().map(|(i, t, _)| (*i, t.as_str())).collect();
    assert_eq!(titles, vec![(0, "first"), (2, "third")]);
    assert!(delivered.iter().all(|(_, _, len)| *len > 0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_directory_sink_writes_cards_from_async_caller() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(&dir.path().join("out"));
    let items = vec![NewsItem::new("a"), NewsItem::new("b")];

    let runner = BatchRunner::new(template(), config.clone()).unwrap();
    let images = runner.resolve_images(&items).await;
    let sink = DirectorySink::new(config.clone());
    // rendering is CPU-bound, so it goes to the blocking pool
    let report = tokio::task::spawn_blocking(move || runner.render_all(&items, &images, &sink))
        .await
        .unwrap();

    assert_eq!(report.succeeded, 2);
    for index in 0..2 {
        let card = image::open(config.card_path(index)).unwrap();
        assert_eq!((card.width(), card.height()), (216, 270));
    }
}
