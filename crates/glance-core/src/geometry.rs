use glance_types::{CommittedRegion, CropRegion};

/// Rectangle in intrinsic source-frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Maps a crop region from preview coordinates into intrinsic source pixels.
///
/// Each axis scales independently by the intrinsic/preview ratio. When the
/// preview and the intrinsic frame do not share an aspect ratio the crop skews
/// proportionally; that imprecision is accepted rather than corrected. The
/// result is clamped to the frame bounds.
pub fn region_to_source(committed: &CommittedRegion, intrinsic: (u32, u32)) -> SourceRect {
    let CropRegion {
        x,
        y,
        width,
        height,
    } = committed.region;
    let (frame_w, frame_h) = intrinsic;

    if committed.viewport_width <= 0.0 || committed.viewport_height <= 0.0 {
        return SourceRect::full(frame_w, frame_h);
    }

    let scale_x = frame_w as f32 / committed.viewport_width;
    let scale_y = frame_h as f32 / committed.viewport_height;

    let sx = ((x * scale_x).round().max(0.0) as u32).min(frame_w);
    let sy = ((y * scale_y).round().max(0.0) as u32).min(frame_h);
    let sw = ((width * scale_x).round() as u32).min(frame_w - sx);
    let sh = ((height * scale_y).round() as u32).min(frame_h - sy);

    SourceRect {
        x: sx,
        y: sy,
        width: sw,
        height: sh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(region: CropRegion, viewport: (f32, f32)) -> CommittedRegion {
        CommittedRegion {
            region,
            viewport_width: viewport.0,
            viewport_height: viewport.1,
        }
    }

    #[test]
    fn scales_each_axis_independently() {
        let c = committed(
            CropRegion {
                x: 100.0,
                y: 50.0,
                width: 200.0,
                height: 100.0,
            },
            (960.0, 540.0),
        );
        let rect = region_to_source(&c, (1920, 1080));
        assert_eq!(
            rect,
            SourceRect {
                x: 200,
                y: 100,
                width: 400,
                height: 200
            }
        );
    }

    #[test]
    fn mismatched_aspect_ratio_skews_rather_than_corrects() {
        let c = committed(
            CropRegion {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            },
            (1000.0, 500.0),
        );
        let rect = region_to_source(&c, (2000, 2000));
        assert_eq!(rect.width, 200);
        assert_eq!(rect.height, 400);
    }

    #[test]
    fn clamps_to_frame_bounds() {
        let c = committed(
            CropRegion {
                x: 900.0,
                y: 500.0,
                width: 200.0,
                height: 100.0,
            },
            (960.0, 540.0),
        );
        let rect = region_to_source(&c, (1920, 1080));
        assert!(rect.x + rect.width <= 1920);
        assert!(rect.y + rect.height <= 1080);
    }

    #[test]
    fn degenerate_viewport_falls_back_to_full_frame() {
        let c = committed(
            CropRegion {
                x: 10.0,
                y: 10.0,
                width: 50.0,
                height: 50.0,
            },
            (0.0, 0.0),
        );
        assert_eq!(region_to_source(&c, (1280, 720)), SourceRect::full(1280, 720));
    }
}
