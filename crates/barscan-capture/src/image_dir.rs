//! Image-directory camera: every image file in a directory is one frame.
//!
//! Frames are loaded once at acquisition, converted to luma, and cycled
//! forever in file-name order until the stream is stopped. Useful for
//! kiosks fed by a capture daemon, and for replaying recorded sessions.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::camera::{CameraBackend, CameraConstraints, Frame, MediaStream};
use crate::error::{CaptureError, CaptureResult};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

/// Camera backend reading frames from a directory.
#[derive(Debug, Clone)]
pub struct ImageDirCamera {
    dir: PathBuf,
}

impl ImageDirCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ImageDirCamera { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl CameraBackend for ImageDirCamera {
    async fn acquire(
        &self,
        constraints: &CameraConstraints,
    ) -> CaptureResult<Box<dyn MediaStream>> {
        debug!(
            dir = ?self.dir,
            facing = ?constraints.facing,
            "Directory cameras ignore facing mode"
        );

        let dir = self.dir.clone();
        let frames = tokio::task::spawn_blocking(move || load_frames(&dir))
            .await
            .map_err(|e| CaptureError::Camera(format!("frame loader failed: {e}")))??;

        info!(dir = ?self.dir, frames = frames.len(), "Image directory camera opened");

        Ok(Box::new(ImageDirStream {
            frames,
            cursor: 0,
            live: true,
        }))
    }

    fn name(&self) -> &str {
        "image-dir"
    }
}

fn load_frames(dir: &Path) -> CaptureResult<Vec<Frame>> {
    if !dir.is_dir() {
        // A plain file at the path is as good as no device.
        std::fs::metadata(dir)?;
        return Err(CaptureError::DeviceNotFound);
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_image(path))
        .collect();
    paths.sort();

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        match image::open(&path) {
            Ok(img) => {
                let luma = img.to_luma8();
                let (width, height) = luma.dimensions();
                let label = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                frames.push(Frame::new(width, height, luma.into_raw()).with_label(label));
            }
            Err(e) => warn!(?path, error = %e, "Skipping unreadable frame"),
        }
    }

    if frames.is_empty() {
        return Err(CaptureError::DeviceNotFound);
    }
    Ok(frames)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

struct ImageDirStream {
    frames: Vec<Frame>,
    cursor: usize,
    live: bool,
}

impl MediaStream for ImageDirStream {
    fn grab(&mut self) -> Option<Frame> {
        if !self.live {
            return None;
        }
        let frame = self.frames.get(self.cursor).cloned();
        self.cursor = (self.cursor + 1) % self.frames.len();
        frame
    }

    fn live_tracks(&self) -> usize {
        usize::from(self.live)
    }

    fn stop(&mut self) {
        self.live = false;
    }
}
