use anyhow::{Context, Result};
use glimpse_types::Point;
use image::RgbaImage;
use xcap::Monitor;

/// Where one monitor sits on the virtual desktop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorLayout {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

/// A screenshot and the desktop position of its top-left pixel
#[derive(Debug, Clone)]
pub struct Capture {
    pub image: RgbaImage,
    pub origin: Point,
}

/// Produces the bitmap the user selects from
pub trait ScreenSource: Send + Sync {
    fn capture(&self) -> Result<Capture>;
}

/// Real screen capture through xcap
pub struct DesktopCapture {
    all_monitors: bool,
}

impl DesktopCapture {
    pub fn new(all_monitors: bool) -> Self {
        Self { all_monitors }
    }
}

impl ScreenSource for DesktopCapture {
    fn capture(&self) -> Result<Capture> {
        if self.all_monitors {
            match capture_virtual_desktop() {
                Ok(capture) => return Ok(capture),
                Err(e) => {
                    tracing::warn!("Virtual desktop capture failed, using primary monitor: {e:#}")
                }
            }
        }
        capture_primary_screen()
    }
}

fn layout_of(monitor: &Monitor) -> MonitorLayout {
    MonitorLayout {
        name: monitor.name().to_string(),
        x: monitor.x(),
        y: monitor.y(),
        width: monitor.width(),
        height: monitor.height(),
        is_primary: monitor.is_primary(),
    }
}

/// List all monitors with their desktop placement
pub fn list_monitors() -> Result<Vec<MonitorLayout>> {
    let monitors = Monitor::all().context("Failed to get monitors")?;
    Ok(monitors.iter().map(layout_of).collect())
}

/// Primary monitor, or the first one if none is flagged primary
fn primary_index(layouts: &[MonitorLayout]) -> Option<usize> {
    layouts
        .iter()
        .position(|m| m.is_primary)
        .or((!layouts.is_empty()).then_some(0))
}

/// Desktop position of a capture's top-left pixel: the virtual desktop's
/// corner when stitched, the primary monitor's otherwise
pub fn capture_origin(layouts: &[MonitorLayout], virtual_desktop: bool) -> Option<Point> {
    if virtual_desktop {
        return virtual_bounds(layouts).map(|(x, y, _, _)| Point::new(x, y));
    }
    primary_index(layouts).map(|i| Point::new(layouts[i].x, layouts[i].y))
}

/// Capture the primary monitor, or the first one if none is flagged primary
pub fn capture_primary_screen() -> Result<Capture> {
    let monitors = Monitor::all().context("Failed to get monitors")?;
    let layouts: Vec<MonitorLayout> = monitors.iter().map(layout_of).collect();
    let index = primary_index(&layouts).context("No monitor found")?;
    let origin = capture_origin(&layouts, false).context("No monitor found")?;

    let image = monitors[index]
        .capture_image()
        .context("Failed to capture screen")?;
    tracing::info!(
        "Captured primary monitor '{}' ({}x{}) at {:?}",
        layouts[index].name,
        image.width(),
        image.height(),
        origin
    );
    Ok(Capture { image, origin })
}

/// Capture every monitor and stitch them into one image of the virtual desktop
pub fn capture_virtual_desktop() -> Result<Capture> {
    let monitors = Monitor::all().context("Failed to get monitors")?;
    let layouts: Vec<MonitorLayout> = monitors.iter().map(layout_of).collect();
    let (origin_x, origin_y, width, height) =
        virtual_bounds(&layouts).context("No monitor found")?;

    let mut desktop = RgbaImage::new(width, height);
    for (monitor, layout) in monitors.iter().zip(&layouts) {
        tracing::debug!(
            "Monitor '{}': {}x{} at ({}, {}){}",
            layout.name,
            layout.width,
            layout.height,
            layout.x,
            layout.y,
            if layout.is_primary { ", primary" } else { "" }
        );
        let shot = monitor
            .capture_image()
            .with_context(|| format!("Failed to capture monitor '{}'", layout.name))?;
        image::imageops::replace(
            &mut desktop,
            &shot,
            i64::from(layout.x - origin_x),
            i64::from(layout.y - origin_y),
        );
    }

    tracing::info!(
        "Captured virtual desktop of {} monitor(s) ({}x{})",
        layouts.len(),
        width,
        height
    );
    Ok(Capture {
        image: desktop,
        origin: Point::new(origin_x, origin_y),
    })
}

/// Top-left corner and size of the rectangle enclosing every monitor
pub fn virtual_bounds(layouts: &[MonitorLayout]) -> Option<(i32, i32, u32, u32)> {
    let left = layouts.iter().map(|m| m.x).min()?;
    let top = layouts.iter().map(|m| m.y).min()?;
    let right = layouts.iter().map(|m| m.x + m.width as i32).max()?;
    let bottom = layouts.iter().map(|m| m.y + m.height as i32).max()?;

    Some((left, top, (right - left) as u32, (bottom - top) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(x: i32, y: i32, width: u32, height: u32) -> MonitorLayout {
        MonitorLayout {
            name: format!("{x},{y}"),
            x,
            y,
            width,
            height,
            is_primary: x == 0 && y == 0,
        }
    }

    #[test]
    fn test_single_monitor_bounds() {
        let bounds = virtual_bounds(&[monitor(0, 0, 1920, 1080)]);
        assert_eq!(bounds, Some((0, 0, 1920, 1080)));
    }

    #[test]
    fn test_side_by_side_with_negative_origin() {
        let layouts = [monitor(0, 0, 1920, 1080), monitor(-1280, 200, 1280, 1024)];
        assert_eq!(virtual_bounds(&layouts), Some((-1280, 0, 3200, 1224)));
    }

    #[test]
    fn test_no_monitors() {
        assert_eq!(virtual_bounds(&[]), None);
        assert_eq!(capture_origin(&[], true), None);
        assert_eq!(capture_origin(&[], false), None);
    }

    #[test]
    fn test_origin_follows_what_was_captured() {
        let layouts = [monitor(-1280, 200, 1280, 1024), monitor(0, 0, 1920, 1080)];
        assert_eq!(capture_origin(&layouts, true), Some(Point::new(-1280, 0)));
        // Primary fallback opens the overlay over the primary monitor
        assert_eq!(capture_origin(&layouts, false), Some(Point::new(0, 0)));
    }

    #[test]
    fn test_origin_without_primary_uses_first_monitor() {
        let mut layouts = [monitor(1920, 0, 1280, 1024), monitor(-800, 100, 800, 600)];
        layouts[0].is_primary = false;
        layouts[1].is_primary = false;
        assert_eq!(capture_origin(&layouts, false), Some(Point::new(1920, 0)));
    }
}
