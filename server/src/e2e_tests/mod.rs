//! End-to-end tests at the HTTP request/response level.
//!
//! Each test file covers a specific scenario, driving the full router
//! in-process and checking the envelope that reaches the client.

#![cfg(test)]

mod helpers;

mod test_envelope_invariant;
mod test_health;
mod test_me;
mod test_token_rejections;
