//! Registration client: field validation, debounced login availability
//! checks, submission and sign-in against a remote authority.
//!
//! The crate follows a hexagonal layout. [`domain`] holds every rule of the
//! registration flow and talks to the outside world only through the ports in
//! [`domain::ports`]; [`outbound`] provides the reqwest and notification
//! adapters; [`app`] loads settings and wires adapters into services;
//! [`inbound`] exposes the command-line front end.

pub mod app;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use app::{ClientSettings, RegistrationClient};
pub use domain::{RegistrationSession, SignInService};
