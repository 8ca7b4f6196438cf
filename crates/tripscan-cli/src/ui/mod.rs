//! UI Module - terminal output for tripscan
//!
//! ```text
//! Commands / SearchSession
//!        │ Reporter calls
//!        ▼
//!     Output        cloneable handle
//!        │ UiEvent over mpsc
//!        ▼
//!     Actor         single render thread
//!        │
//!        ▼
//!  SourceBoard      live per-source rows, redrawn in place
//!        │ styled with
//!        ▼
//!     Theme
//! ```
//!
//! Result lists are printed directly through [`buffer::OutputBuffer`] once a
//! search has finished, after [`Output::wait_async`] has drained the actor.

pub mod actor;
pub mod board;
pub mod buffer;
pub mod list;
pub mod output;
pub mod progress;
pub mod theme;

pub use output::Output;
pub use theme::Theme;
