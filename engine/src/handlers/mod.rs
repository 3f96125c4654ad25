//! Handlers, one file per event.
//!
//! All of them are methods on [`Engine`](crate::Engine).  They take the current time as an
//! argument instead of reading the clock so they can be replayed and tested.
//!

mod cleanup;
mod dispatch;
mod identity;
mod monitor;
mod panic;
mod score;

#[cfg(test)]
pub(crate) mod testing;
