//! Client for the ersatz control plane and admin API.

mod client;

pub use client::{ClientError, EndpointRef, EndpointSummary, ErsatzClient, ServerStatus, VaryCommand};
