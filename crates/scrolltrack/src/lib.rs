//! `scrolltrack` - Scroll-driven progress along an SVG curve
//!
//! This library maps a container's scroll position to a progress value and
//! samples a fixed curve at that progress to place and orient a marker, the
//! way a scroll-animated timeline does. Layout and geometry are read through
//! traits so the same logic runs against a browser or a simulated page.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod logging;
pub mod milestone;
pub mod observer;
pub mod progress;
pub mod sampler;
pub mod simulate;
pub mod tracker;

pub use config::Config;
pub use error::{Error, Result};
pub use events::{attach, bind, ListenerId, ScrollBinding, ScrollBus, ScrollEvents};
pub use geometry::{CurveGeometry, PathGeometry, DEFAULT_WAVE_PATH};
pub use kurbo::Point;
pub use logging::init_logging;
pub use milestone::Milestone;
pub use observer::{bind_observers, Observers, StateObserver};
pub use progress::{scroll_progress, ContainerMetrics};
pub use sampler::{sample, CurvePoint, HeadingConfig};
pub use tracker::{LayoutProbe, ScrollProgressTracker, TrackerState};
