//! Capture smoke test - run with: cargo run -p glimpse-capture --bin capture_probe

use anyhow::Result;
use glimpse_capture::{DesktopCapture, HighlightStyle, ScreenSource};
use glimpse_config::capture::CaptureConfig;
use glimpse_types::{BoundingBox, SelectionResult};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    tracing::info!("Monitors:");
    for (i, m) in glimpse_capture::list_monitors()?.iter().enumerate() {
        tracing::info!(
            "  [{}] {} {}x{} at ({}, {}){}",
            i,
            m.name,
            m.width,
            m.height,
            m.x,
            m.y,
            if m.is_primary { " primary" } else { "" }
        );
    }

    let config = CaptureConfig::default();
    let start = std::time::Instant::now();
    let capture = DesktopCapture::new(config.all_monitors).capture()?;
    let screenshot = capture.image;
    tracing::info!(
        "Captured {}x{} at {:?} in {:?}",
        screenshot.width(),
        screenshot.height(),
        capture.origin,
        start.elapsed()
    );

    // Centre half of the desktop with one highlight in its middle
    let (w, h) = screenshot.dimensions();
    let crop = BoundingBox::new(w / 4, h / 4, w * 3 / 4, h * 3 / 4);
    let selection = SelectionResult::Annotated {
        crop,
        highlights: vec![BoundingBox::new(
            crop.width() / 4,
            crop.height() / 4,
            crop.width() / 2,
            crop.height() / 2,
        )],
    };

    let start = std::time::Instant::now();
    let url = glimpse_capture::crop_and_encode(
        &screenshot,
        &selection,
        config.jpeg_quality,
        HighlightStyle::from(&config),
    )?;
    tracing::info!("Encoded data URL of {} chars in {:?}", url.len(), start.elapsed());

    let mut cropped = glimpse_capture::crop(&screenshot, &crop)?;
    glimpse_capture::draw_highlights(
        &mut cropped,
        selection.highlight_boxes(),
        HighlightStyle::from(&config),
    );
    let jpeg = glimpse_capture::encode_jpeg(&cropped, config.jpeg_quality)?;
    std::fs::write("capture_probe.jpg", jpeg)?;
    tracing::info!("Saved to capture_probe.jpg");

    Ok(())
}
