//! Docker Compose command dispatch.
//!
//! The dispatcher decides whether a task command runs locally or inside a
//! compose service and assembles the final argv. The probe answers whether
//! the target service is currently up, which picks between `exec` (attach to
//! the running container) and `run --rm` (one-off throwaway container).

pub mod dispatch;
pub mod probe;

pub use dispatch::{CommandIntent, Dispatcher, Invocation};
pub use probe::{ComposeProbe, ServiceProbe};
