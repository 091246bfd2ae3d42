//! Form fields and the per-field error map.

use std::fmt;

/// Editable inputs of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Display name ("first last").
    Name,
    /// Unique login handle.
    Login,
    /// Account password.
    Password,
}

impl Field {
    /// Every field, in display order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Login, Self::Password];

    /// Stable lower-case identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Login => "login",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional message per field plus a form-wide slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    name: Option<String>,
    login: Option<String>,
    password: Option<String>,
    general: Option<String>,
}

impl FieldErrors {
    /// Message attributed to `field`.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Form-wide message not attributable to a single field.
    pub fn general(&self) -> Option<&str> {
        self.general.as_deref()
    }

    /// No message in any slot.
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.login.is_none()
            && self.password.is_none()
            && self.general.is_none()
    }

    /// Field messages in display order, skipping empty slots.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|message| (field, message)))
    }

    pub(crate) fn set(&mut self, field: Field, message: impl Into<String>) {
        *self.slot_mut(field) = Some(message.into());
    }

    pub(crate) fn clear(&mut self, field: Field) {
        *self.slot_mut(field) = None;
    }

    pub(crate) fn set_general(&mut self, message: impl Into<String>) {
        self.general = Some(message.into());
    }

    pub(crate) fn clear_general(&mut self) {
        self.general = None;
    }

    /// Copy every populated slot of `other` over `self`; empty slots in
    /// `other` leave existing messages alone.
    pub(crate) fn merge_from(&mut self, other: &Self) {
        for (field, message) in other.iter() {
            self.set(field, message);
        }
        if let Some(message) = other.general() {
            self.set_general(message);
        }
    }

    const fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Name => &self.name,
            Field::Login => &self.login,
            Field::Password => &self.password,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Login => &mut self.login,
            Field::Password => &mut self.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_slots_the_other_side_leaves_empty() {
        let mut errors = FieldErrors::default();
        errors.set(Field::Name, "enter a first and last name");
        errors.set(Field::Password, "too weak");

        let mut incoming = FieldErrors::default();
        incoming.set(Field::Login, "Login já cadastrado");
        errors.merge_from(&incoming);

        assert_eq!(errors.get(Field::Name), Some("enter a first and last name"));
        assert_eq!(errors.get(Field::Login), Some("Login já cadastrado"));
        assert_eq!(errors.get(Field::Password), Some("too weak"));
        assert_eq!(errors.general(), None);
    }

    #[test]
    fn clearing_every_slot_empties_the_map() {
        let mut errors = FieldErrors::default();
        errors.set(Field::Login, "taken");
        errors.set_general("server unavailable");
        assert!(!errors.is_empty());

        errors.clear(Field::Login);
        errors.clear_general();
        assert!(errors.is_empty());
        assert_eq!(errors.iter().count(), 0);
    }
}
