//! # Device State
//!
//! The camera backend and decoder factory every session is built from.

use std::path::PathBuf;
use std::sync::Arc;

use barscan_capture::{
    CameraBackend, DecoderFactory, ImageDirCamera, RxingDecoderFactory, ScanEventEmitter,
    ScanSession, SessionConfig,
};

#[derive(Clone)]
pub struct DeviceState {
    camera: Arc<dyn CameraBackend>,
    decoders: Arc<dyn DecoderFactory>,
}

impl DeviceState {
    pub fn new(camera: Arc<dyn CameraBackend>, decoders: Arc<dyn DecoderFactory>) -> Self {
        DeviceState { camera, decoders }
    }

    /// A directory of frames decoded with rxing.
    pub fn image_dir(source: impl Into<PathBuf>) -> Self {
        DeviceState::new(
            Arc::new(ImageDirCamera::new(source)),
            Arc::new(RxingDecoderFactory),
        )
    }

    pub fn camera_name(&self) -> &str {
        self.camera.name()
    }

    /// Creates an idle session on these devices.
    pub fn session(
        &self,
        config: SessionConfig,
        emitter: Arc<dyn ScanEventEmitter>,
    ) -> ScanSession {
        ScanSession::with_emitter(config, self.camera.clone(), self.decoders.clone(), emitter)
    }
}

impl std::fmt::Debug for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceState")
            .field("camera", &self.camera.name())
            .finish_non_exhaustive()
    }
}
