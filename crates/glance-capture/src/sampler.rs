use glance_core::geometry::{self, SourceRect};
use glance_types::{CommittedRegion, FramePreview};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, RgbaImage, imageops};

use crate::backend::CaptureError;
use crate::session::CaptureSession;

const PREVIEW_MAX_WIDTH: u32 = 640;

/// A still image ready to hand to the inference client.
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

pub struct Sampled {
    pub payload: ImagePayload,
    pub preview: FramePreview,
}

/// Rasterizes the current frame (or the selected region, mapped into source
/// pixel space) into a lossy JPEG payload plus a downscaled preview of the
/// full frame.
pub fn sample(
    session: &CaptureSession,
    region: Option<&CommittedRegion>,
    quality: u8,
) -> Result<Sampled, CaptureError> {
    let frame = session.grab()?;
    let full = RgbaImage::from_raw(frame.width, frame.height, frame.data)
        .ok_or_else(|| CaptureError::Backend("frame buffer size mismatch".to_string()))?;

    let rect = match region {
        Some(committed) => {
            let mapped = geometry::region_to_source(committed, (frame.width, frame.height));
            if mapped.width == 0 || mapped.height == 0 {
                SourceRect::full(frame.width, frame.height)
            } else {
                mapped
            }
        }
        None => SourceRect::full(frame.width, frame.height),
    };

    let cropped =
        imageops::crop_imm(&full, rect.x, rect.y, rect.width, rect.height).to_image();
    let rgb = DynamicImage::ImageRgba8(cropped).to_rgb8();

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;

    let preview_image = if full.width() > PREVIEW_MAX_WIDTH {
        let scale = PREVIEW_MAX_WIDTH as f32 / full.width() as f32;
        let height = ((full.height() as f32 * scale) as u32).max(1);
        imageops::thumbnail(&full, PREVIEW_MAX_WIDTH, height)
    } else {
        full
    };

    Ok(Sampled {
        payload: ImagePayload {
            bytes,
            mime_type: "image/jpeg",
            width: rgb.width(),
            height: rgb.height(),
        },
        preview: FramePreview {
            width: preview_image.width(),
            height: preview_image.height(),
            rgba: preview_image.into_raw(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CaptureStream, RawFrame};
    use glance_types::CropRegion;

    struct GradientStream {
        width: u32,
        height: u32,
    }

    impl CaptureStream for GradientStream {
        fn intrinsic_size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn grab(&self) -> Result<RawFrame, CaptureError> {
            let image = RgbaImage::from_fn(self.width, self.height, |x, y| {
                image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
            });
            Ok(RawFrame {
                width: self.width,
                height: self.height,
                data: image.into_raw(),
            })
        }
    }

    fn session(width: u32, height: u32) -> CaptureSession {
        CaptureSession::from_stream(Box::new(GradientStream { width, height }), 1)
    }

    #[test]
    fn full_frame_sample_encodes_jpeg_at_frame_size() {
        let s = session(320, 200);
        let sampled = sample(&s, None, 80).unwrap();
        assert_eq!(sampled.payload.mime_type, "image/jpeg");
        assert_eq!((sampled.payload.width, sampled.payload.height), (320, 200));

        let decoded = image::load_from_memory(&sampled.payload.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 200));
    }

    #[test]
    fn cropped_sample_maps_preview_coordinates_to_source_pixels() {
        let s = session(1920, 1080);
        let committed = CommittedRegion {
            region: CropRegion {
                x: 100.0,
                y: 50.0,
                width: 200.0,
                height: 100.0,
            },
            viewport_width: 960.0,
            viewport_height: 540.0,
        };
        let sampled = sample(&s, Some(&committed), 80).unwrap();
        assert_eq!((sampled.payload.width, sampled.payload.height), (400, 200));
    }

    #[test]
    fn preview_is_downscaled_for_large_frames() {
        let s = session(1920, 1080);
        let sampled = sample(&s, None, 80).unwrap();
        assert_eq!(sampled.preview.width, 640);
        assert_eq!(sampled.preview.height, 360);
        assert_eq!(
            sampled.preview.rgba.len(),
            (sampled.preview.width * sampled.preview.height * 4) as usize
        );
    }

    #[test]
    fn stopped_session_refuses_to_sample() {
        let s = session(64, 64);
        s.stop();
        assert!(matches!(
            sample(&s, None, 80),
            Err(CaptureError::SourceEnded)
        ));
    }
}
