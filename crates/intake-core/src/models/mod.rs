//! Data models for the application
//!
//! Leads and their attachments, the outcome of reconciling a lead with the
//! record store, and the upload response shape.

mod attachment;
mod lead;
mod outcome;
mod upload;

pub use attachment::*;
pub use lead::*;
pub use outcome::*;
pub use upload::*;
