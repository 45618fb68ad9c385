pub mod still;

pub use still::StillFrameCamera;

use async_trait::async_trait;

/// Single-frame capture. A failed capture yields `None`; the tick is simply skipped.
#[async_trait]
pub trait CameraService: Send + Sync {
    async fn capture_frame(&self) -> Option<Vec<u8>>;

    fn is_available(&self) -> bool;

    /// Switch between the front (`true`) and back camera.
    fn select_front(&self, front: bool);
}
