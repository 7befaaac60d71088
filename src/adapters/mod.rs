//! Implementations of the image generator port.
//!
//! `live` calls Gemini, `recording` wraps it to capture a cassette, and
//! `replaying` answers from a cassette without touching the network.

pub mod live;
pub mod recording;
pub mod replaying;
