//! # Integration Tests
//!
//! Services wired together only through the shared bus, the way the runtime
//! wires them.

pub mod flows;
pub mod lifecycle;
