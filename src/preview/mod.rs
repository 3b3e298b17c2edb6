//! Interactive preview scheduling.
//!
//! While a slider moves, parameters are rendered on a downsampled copy of the
//! baseline so the UI stays responsive. Once the user pauses (or releases the
//! slider) the same parameters are recomputed at full resolution off the async
//! runtime. Results from superseded generations are discarded.
//!
//! - [`state`] - pure state machine, no I/O
//! - [`scheduler`] - tokio task that drives the state machine
//! - [`config`] - fast-buffer scale and debounce interval

pub mod config;
pub mod scheduler;
pub mod state;

pub use self::config::PreviewConfig;
pub use self::scheduler::{PreviewHandle, PreviewScheduler, PreviewSnapshot};
pub use self::state::{Frame, Phase, PreviewEvent, PreviewState, Resolution};
