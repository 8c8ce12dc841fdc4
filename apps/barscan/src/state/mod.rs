//! # State Module
//!
//! Shared state for the station commands.
//!
//! Each command takes only the state it needs, so state is split into
//! focused types rather than one `AppState`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┬──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │ ResultsState │  │ ConfigState  │  │  DeviceState     │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Arc<Mutex<  │  │  AppConfig   │  │  CameraBackend   │              │
//! │  │  ResultStore │  │  source path │  │  DecoderFactory  │              │
//! │  │  >>          │  │              │  │                  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ResultsState: every append and clear holds the one Mutex            │
//! │  • ConfigState: read-only after startup                                │
//! │  • DeviceState: Arc handles; each session builds its own decoder       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod devices;
mod results;

pub use config::ConfigState;
pub use devices::DeviceState;
pub use results::ResultsState;
