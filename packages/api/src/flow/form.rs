use std::str::FromStr;

/// A field of the sign-in form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

impl FromStr for Field {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Field::Email),
            "password" => Ok(Field::Password),
            _ => Err(()),
        }
    }
}

/// Current values of the sign-in form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for FormInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormInputs")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl FormInputs {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Email => self.email = value.into(),
            Field::Password => self.password = value.into(),
        }
    }

    /// Merge a change event by field name. Returns `false` for unknown names.
    pub fn on_field_change(&mut self, name: &str, value: impl Into<String>) -> bool {
        match name.parse::<Field>() {
            Ok(field) => {
                self.set(field, value);
                true
            }
            Err(()) => {
                tracing::trace!(name, "ignoring change for unknown field");
                false
            }
        }
    }
}
