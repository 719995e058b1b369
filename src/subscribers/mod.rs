//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and the
//! built-in [`LogWriter`], for handling events broadcast through the
//! [`Bus`](crate::Bus).
//!
//! ```text
//!   SupervisedWorker ── publish(Event) ──► Bus ──► SubscriberSet::listen
//!                                                       │
//!                                               ┌───────┴───────┐
//!                                               ▼               ▼
//!                                           LogWriter        Custom ...
//! ```

mod log;
mod set;
mod subscribe;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
