//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_authority;
mod notifier;

#[cfg(test)]
pub use auth_authority::MockAuthAuthority;
pub use auth_authority::{
    AuthAuthority, AuthAuthorityError, AvailabilityReply, ErrorBody, FixtureAuthAuthority,
};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{Notification, Notifier, Severity};
