pub mod announcer;
pub mod client;

pub use announcer::announce_venue;
pub use client::{api_call, set_silent};
