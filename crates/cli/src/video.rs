//! Webcam input and frame display for the desktop loop.

use std::io::Write;
use std::process::{Child, Command, Stdio};

use image::{EncodableLayout, RgbImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{nokhwa_initialize, Camera};

/// Opens the camera at `index` streaming in RGB.
pub fn open_camera(index: u32) -> Result<Camera, Box<dyn std::error::Error>> {
    nokhwa_initialize(|granted| {
        log::debug!("Camera permission granted: {granted}");
    });

    let mut camera = Camera::new(
        CameraIndex::Index(index),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
    )?;
    camera.open_stream()?;
    log::info!(
        "Opened camera {index} at {}x{}",
        camera.resolution().width(),
        camera.resolution().height()
    );
    Ok(camera)
}

/// Display window fed raw RGB frames through an `ffplay` child process.
pub struct DisplayStream {
    ffplay: Child,
}

impl DisplayStream {
    pub fn new(width: u32, height: u32) -> Result<Self, Box<dyn std::error::Error>> {
        let ffplay = Command::new("ffplay")
            .args([
                "-f",
                "rawvideo",
                "-pixel_format",
                "rgb24",
                "-video_size",
                &format!("{width}x{height}"),
                "-window_title",
                "AgeLens",
                "-fflags",
                "nobuffer",
                "-flags",
                "low_delay",
                "-",
            ])
            .stdin(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(Self { ffplay })
    }

    pub fn write_frame(&mut self, img: &RgbImage) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(stdin) = self.ffplay.stdin.as_mut() {
            stdin.write_all(img.as_bytes())?;
            stdin.flush()?;
        }
        Ok(())
    }

    pub fn close(mut self) -> Result<(), Box<dyn std::error::Error>> {
        drop(self.ffplay.stdin.take());
        self.ffplay.kill()?;
        self.ffplay.wait()?;
        Ok(())
    }
}
