//! Sign-in / sign-up form.
//!
//! One form serves both modes. The mode decides which fields are rendered and
//! which schema `AuthForm::validate` applies, so toggling it swaps both.

use secrecy::SecretString;
use serde::Deserialize;

use streamflix_core::Email;

use crate::models::NewUser;

pub const INVALID_EMAIL: &str = "Invalid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be 6 or more characters";
pub const FIRST_NAME_TOO_SHORT: &str = "First Name must be 2 or more characters";
pub const LAST_NAME_TOO_SHORT: &str = "Last Name must be 2 or more characters";

const MIN_PASSWORD_CHARS: usize = 6;
const MIN_NAME_CHARS: usize = 2;

/// Which credential flow the form drives.
///
/// Unknown wire values fall back to sign-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum AuthMode {
    /// New user: account creation, then session issuance.
    #[serde(rename = "signup")]
    SignUp,
    /// Existing user: session issuance only.
    #[default]
    #[serde(rename = "signin", other)]
    SignIn,
}

impl AuthMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }

    /// Wire value used in the `mode` query parameter and hidden form field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::SignUp => "signup",
        }
    }

    #[must_use]
    pub const fn is_sign_up(self) -> bool {
        matches!(self, Self::SignUp)
    }

    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
        }
    }

    #[must_use]
    pub const fn submit_label(self) -> &'static str {
        match self {
            Self::SignIn => "Log In",
            Self::SignUp => "Sign Up",
        }
    }

    /// Prompt shown next to the link that switches to the other mode.
    #[must_use]
    pub const fn toggle_prompt(self) -> &'static str {
        match self {
            Self::SignIn => "New to Streamflix?",
            Self::SignUp => "Already have an account?",
        }
    }

    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign up now.",
            Self::SignUp => "Log in.",
        }
    }
}

/// Raw form submission.
///
/// Field names match the rendered inputs (`firstName`, `lastName`).
#[derive(Default, Deserialize)]
pub struct AuthForm {
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "firstName")]
    pub first_name: String,
    #[serde(default, rename = "lastName")]
    pub last_name: String,
}

impl std::fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthForm")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Per-field validation messages, rendered inline under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
    pub first_name: Option<&'static str>,
    pub last_name: Option<&'static str>,
}

impl FieldErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

/// A submission that passed the schema for its mode.
#[derive(Debug, Clone)]
pub enum Credentials {
    SignIn {
        email: Email,
        password: SecretString,
    },
    SignUp(NewUser),
}

impl Credentials {
    #[must_use]
    pub const fn email(&self) -> &Email {
        match self {
            Self::SignIn { email, .. } => email,
            Self::SignUp(new_user) => &new_user.email,
        }
    }

    #[must_use]
    pub const fn password(&self) -> &SecretString {
        match self {
            Self::SignIn { password, .. } => password,
            Self::SignUp(new_user) => &new_user.password,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        match self {
            Self::SignIn { .. } => AuthMode::SignIn,
            Self::SignUp(_) => AuthMode::SignUp,
        }
    }
}

impl AuthForm {
    /// Apply the schema for `self.mode`.
    ///
    /// Every failing field is reported, not just the first one. Name fields
    /// are ignored entirely in sign-in mode.
    ///
    /// # Errors
    ///
    /// Returns the collected [`FieldErrors`] when any field is invalid.
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();

        let email = Email::parse(&self.email).ok();
        if email.is_none() {
            errors.email = Some(INVALID_EMAIL);
        }

        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.password = Some(PASSWORD_TOO_SHORT);
        }

        if self.mode.is_sign_up() {
            if self.first_name.chars().count() < MIN_NAME_CHARS {
                errors.first_name = Some(FIRST_NAME_TOO_SHORT);
            }
            if self.last_name.chars().count() < MIN_NAME_CHARS {
                errors.last_name = Some(LAST_NAME_TOO_SHORT);
            }
        }

        let Some(email) = email else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        let password = SecretString::from(self.password.clone());
        Ok(match self.mode {
            AuthMode::SignIn => Credentials::SignIn { email, password },
            AuthMode::SignUp => Credentials::SignUp(NewUser {
                email,
                password,
                first_name: self.first_name.clone(),
                last_name: self.last_name.clone(),
            }),
        })
    }
}
