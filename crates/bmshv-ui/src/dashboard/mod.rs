//! Dashboard front-end
//!
//! [`control`] drives the render cycle, [`console_sink`] draws it as text and
//! [`input`] reads user actions from the console.

pub mod console_sink;
pub mod control;
pub mod input;
