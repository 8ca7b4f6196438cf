//! Core library for tripscan.
//!
//! - [`source`]: provider adapters (live HTTP and mock)
//! - [`coordinator`]: concurrent fan-out with per-source deadlines
//! - [`dedupe`] and [`view`]: merge cleanup and display projection
//! - [`session`]: the search state machine front-ends drive
//! - [`config`] and [`paths`]: configuration loading

pub mod config;
pub mod coordinator;
pub mod dedupe;
pub mod paths;
pub mod reporter;
pub mod session;
pub mod source;
pub mod status;
pub mod view;

pub use config::{Config, ConfigError, Mode};
pub use coordinator::{FanOut, FanOutError, FanOutReport, SourceOutcome};
pub use reporter::{NullReporter, Reporter};
pub use session::{
    CompletedSearch, SearchOutcome, SearchSession, SearchSummary, SearchTicket, SessionError,
    SessionSnapshot,
};
pub use source::{HttpSource, MockSource, Source, SourceError, SourceFactory};
pub use status::StatusBoard;
pub use view::{ViewSummary, project};

/// User-Agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("tripscan/", env!("CARGO_PKG_VERSION"));
