//! Core observer primitives for Signet.
//!
//! This crate provides the foundational notification mechanism the rest of
//! Signet is built on:
//!
//! - **Signal/Slot System**: Type-safe broadcast channels for observing
//!   state changes and lifecycle events
//!
//! Every [`Signal`] is an independent, per-instance broadcast point: it owns
//! its own set of subscriber callbacks and there is no global event
//! registry. Emission is synchronous — slots connected at emit time run
//! immediately on the emitting thread, and slots connected afterwards miss
//! earlier emissions.
//!
//! # Signal/Slot Example
//!
//! ```
//! use signet_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

pub mod signal;

pub use signal::{ConnectionGuard, ConnectionId, Signal};
