//! Running the instrument live.
//!
//! [`Engine`] is the synchronous core: frames in, ticks in, sound and trigger
//! events out. [`Runtime`] puts it on a scheduler thread next to a cpal output
//! stream.
//!
//! # Example
//!
//! ```no_run
//! use gestune::{config::Config, gesture::PoseFrame, runtime::Runtime};
//!
//! fn main() -> Result<(), gestune::EngineError> {
//!     let (mut runtime, _output) = Runtime::start(&Config::default())?;
//!     let mut events = runtime.take_events().expect("first call");
//!
//!     // per camera frame:
//!     runtime.ingest(&PoseFrame::new(runtime.elapsed()));
//!     while let Ok(event) = events.pop() {
//!         println!("{} {:?}", event.voice, event.step);
//!     }
//!     Ok(())
//! }
//! ```

mod engine;
mod output;
#[cfg(feature = "rtrb")]
mod scheduler;

pub use engine::Engine;
pub use output::{AudioOutput, OutputDevice};
#[cfg(feature = "rtrb")]
pub use scheduler::Runtime;
