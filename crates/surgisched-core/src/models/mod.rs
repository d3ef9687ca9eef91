//! Domain models for the surgisched system.

mod notification;
mod operation;
mod reference;
mod validation;

pub use notification::*;
pub use operation::*;
pub use reference::*;
pub use validation::*;

pub(crate) use validation::Candidate;
