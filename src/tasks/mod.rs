//! Background Tasks Module
//!
//! Contains the deferred tasks a coalescer schedules on the Tokio runtime.
//!
//! # Tasks
//! - Batch flush: fires once per accumulation cycle and drives one wave

mod flush;

pub(crate) use flush::spawn_flush_timer;
