//! # Acceptance certificate server
//! This crate hosts the HTTP surface and the job scheduler for the acceptance certificate engine. It is responsible
//! for:
//! * Running the three daily jobs (certificate sync, healthcheck with self-heal, order validation) at their
//!   configured UTC times.
//! * Letting operators trigger a certificate sync by hand.
//! * Serving the healthcheck log and the validated order report.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/`: A banner confirming the API is running.
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/handle_trigger/update_acceptance_certificates`: Runs the certificate sync immediately.
//! * `/healthcheck/status`: The healthcheck log, newest first.
//! * `/validated_order`: The validated order report.
//! * `/validated_order/status`: Reconciles yesterday's certificates and returns the results.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod jobs;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
