//! Guestlist — guest/party lookup and RSVP wizard core.

pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod search;
pub mod store;
pub mod wizard;
