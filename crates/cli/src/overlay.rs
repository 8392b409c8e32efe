//! Detection overlays: bounding boxes and gender/age-range labels.

use std::fs;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

use agelens_core::detection::domain::face_detection::FaceDetection;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const BOX_THICKNESS: i32 = 2;
const LABEL_SCALE: f32 = 24.0;

/// Common system font locations, tried in order.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Loads a system font for label rendering.
///
/// Returns `None` when no candidate exists; the overlay then draws boxes
/// without text.
pub fn load_font() -> Option<FontVec> {
    for path in FONT_CANDIDATES {
        if let Ok(bytes) = fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                log::debug!("Using label font {path}");
                return Some(font);
            }
        }
    }
    log::warn!("No usable system font found, drawing boxes without labels");
    None
}

/// Draws a green 2px rectangle and a `"<Gender>,<AgeRange>"` label above
/// each detected face.
pub fn annotate(img: &mut RgbImage, detections: &[FaceDetection], font: Option<&FontVec>) {
    for detection in detections {
        let clamped = detection
            .bounding_box
            .clamped(img.width(), img.height());
        if clamped.is_empty() {
            continue;
        }

        for inset in 0..BOX_THICKNESS {
            let w = clamped.width() - 2 * inset;
            let h = clamped.height() - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let rect = Rect::at(clamped.x1 + inset, clamped.y1 + inset)
                .of_size(w as u32, h as u32);
            draw_hollow_rect_mut(img, rect, BOX_COLOR);
        }

        if let Some(font) = font {
            let label = detection.overlay_label();
            let y = (clamped.y1 - LABEL_SCALE as i32 - 4).max(0);
            draw_text_mut(
                img,
                LABEL_COLOR,
                clamped.x1,
                y,
                PxScale::from(LABEL_SCALE),
                font,
                &label,
            );
        }
    }
}
