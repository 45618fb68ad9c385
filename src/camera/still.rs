use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::CameraService;

const JPEG_QUALITY: u8 = 80;
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Replays still images from disk as camera frames, re-encoded to JPEG.
/// A `back/` sub-directory, when present, is used while the back camera is selected.
pub struct StillFrameCamera {
    front_frames: Arc<Vec<PathBuf>>,
    back_frames: Arc<Vec<PathBuf>>,
    use_front: AtomicBool,
    cursor: AtomicUsize,
}

impl StillFrameCamera {
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let front_frames = list_images(dir)?;
        if front_frames.is_empty() {
            bail!("no images found in {}", dir.display());
        }
        let back_dir = dir.join("back");
        let back_frames = if back_dir.is_dir() {
            list_images(&back_dir)?
        } else {
            Vec::new()
        };

        Ok(Self {
            front_frames: Arc::new(front_frames),
            back_frames: Arc::new(back_frames),
            use_front: AtomicBool::new(true),
            cursor: AtomicUsize::new(0),
        })
    }

    fn active_frames(&self) -> &Arc<Vec<PathBuf>> {
        if self.use_front.load(Ordering::SeqCst) || self.back_frames.is_empty() {
            &self.front_frames
        } else {
            &self.back_frames
        }
    }
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list frames in {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .collect();
    frames.sort();
    Ok(frames)
}

pub fn encode_jpeg(path: &Path) -> Result<Vec<u8>> {
    let image = image::open(path).with_context(|| format!("Failed to decode {}", path.display()))?;
    let rgb = image.to_rgb8();
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    Ok(bytes)
}

#[async_trait]
impl CameraService for StillFrameCamera {
    async fn capture_frame(&self) -> Option<Vec<u8>> {
        let frames = Arc::clone(self.active_frames());
        if frames.is_empty() {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst) % frames.len();
        let path = frames[index].clone();

        match tokio::task::spawn_blocking(move || encode_jpeg(&path)).await {
            Ok(Ok(bytes)) => Some(bytes),
            Ok(Err(err)) => {
                log::warn!("frame capture failed: {err:#}");
                None
            }
            Err(err) => {
                log::warn!("frame capture worker join failed: {err}");
                None
            }
        }
    }

    fn is_available(&self) -> bool {
        !self.active_frames().is_empty()
    }

    fn select_front(&self, front: bool) {
        self.use_front.store(front, Ordering::SeqCst);
        self.cursor.store(0, Ordering::SeqCst);
    }
}
