//! Form state and validation
//!
//! Both authentication forms share one state type driven by a reducer keyed
//! by field. Validation is a declarative list of [`Rule`]s evaluated in
//! order; the first failing rule produces the inline error and the form is
//! never submitted.

use std::collections::HashMap;
use thiserror::Error;

/// Symbols accepted (and one required) in a password
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&.,:;";

/// Minimum password length in characters
pub const MIN_PASSWORD_LEN: usize = 8;

pub const MSG_LOGIN_REQUIRED: &str = "⚠️ Todos los campos son obligatorios";
pub const MSG_REGISTER_REQUIRED: &str = "Todos los campos son obligatorios";
pub const MSG_PASSWORD_MISMATCH: &str = "Las contraseñas no coinciden";
pub const MSG_WEAK_PASSWORD: &str = "La contraseña debe tener al menos 8 caracteres, una mayúscula, una minúscula, un número y un símbolo";

/// Input fields across both forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Username,
    Password,
    ConfirmPassword,
    /// One-time code from the authenticator app
    MfaCode,
}

impl Field {
    /// Input name, also the JSON key where the field is sent
    pub fn name(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Username => "username",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
            Field::MfaCode => "token",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        match name {
            "email" => Some(Field::Email),
            "username" => Some(Field::Username),
            "password" => Some(Field::Password),
            "confirmPassword" => Some(Field::ConfirmPassword),
            "token" => Some(Field::MfaCode),
            _ => None,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Email => "Correo electrónico",
            Field::Username => "Nombre de usuario",
            Field::Password => "Contraseña",
            Field::ConfirmPassword => "Confirmar contraseña",
            Field::MfaCode => "Código MFA",
        }
    }

    /// HTML input type
    pub fn input_type(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password | Field::ConfirmPassword => "password",
            Field::Username | Field::MfaCode => "text",
        }
    }
}

/// A predicate over the form state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Value is not empty
    Required,
    /// Value equals another field's value
    Matches(Field),
    /// Value satisfies [`is_strong_password`]
    StrongPassword,
}

/// `(field, predicate, message)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub field: Field,
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(field: Field, check: Check, message: &'static str) -> Self {
        Self { field, check, message }
    }

    fn passes(&self, form: &FormState) -> bool {
        let value = form.value(self.field);
        match self.check {
            Check::Required => !value.is_empty(),
            Check::Matches(other) => value == form.value(other),
            Check::StrongPassword => is_strong_password(value),
        }
    }
}

pub const LOGIN_RULES: [Rule; 3] = [
    Rule::new(Field::Email, Check::Required, MSG_LOGIN_REQUIRED),
    Rule::new(Field::Password, Check::Required, MSG_LOGIN_REQUIRED),
    Rule::new(Field::MfaCode, Check::Required, MSG_LOGIN_REQUIRED),
];

pub const REGISTER_RULES: [Rule; 6] = [
    Rule::new(Field::Email, Check::Required, MSG_REGISTER_REQUIRED),
    Rule::new(Field::Username, Check::Required, MSG_REGISTER_REQUIRED),
    Rule::new(Field::Password, Check::Required, MSG_REGISTER_REQUIRED),
    Rule::new(Field::ConfirmPassword, Check::Required, MSG_REGISTER_REQUIRED),
    Rule::new(Field::ConfirmPassword, Check::Matches(Field::Password), MSG_PASSWORD_MISMATCH),
    Rule::new(Field::Password, Check::StrongPassword, MSG_WEAK_PASSWORD),
];

/// Client-side validation failure, shown inline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

/// Which form a state belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

impl FormKind {
    pub fn fields(self) -> &'static [Field] {
        match self {
            FormKind::Login => &[Field::Email, Field::Password, Field::MfaCode],
            FormKind::Register => &[
                Field::Email,
                Field::Username,
                Field::Password,
                Field::ConfirmPassword,
            ],
        }
    }

    pub fn rules(self) -> &'static [Rule] {
        match self {
            FormKind::Login => &LOGIN_RULES,
            FormKind::Register => &REGISTER_RULES,
        }
    }
}

/// Events the form reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// User edited a field
    Edit(Field, String),
    /// Submission started (validation passed)
    Submit,
    /// Validation or backend failure
    Fail(String),
    /// Backend accepted the submission
    Succeed(String),
}

/// Values and feedback of one form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    kind: FormKind,
    values: HashMap<Field, String>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub submitting: bool,
}

impl FormState {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            values: kind.fields().iter().map(|f| (*f, String::new())).collect(),
            error: None,
            message: None,
            submitting: false,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    /// Current value of `field`; empty for fields the form doesn't have
    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Apply one action
    pub fn apply(&mut self, action: FormAction) {
        match action {
            FormAction::Edit(field, value) => {
                if let Some(slot) = self.values.get_mut(&field) {
                    *slot = value;
                }
                self.error = None;
                self.message = None;
            }
            FormAction::Submit => {
                self.error = None;
                self.message = None;
                self.submitting = true;
            }
            FormAction::Fail(message) => {
                self.error = Some(message);
                self.message = None;
                self.submitting = false;
            }
            FormAction::Succeed(message) => {
                self.error = None;
                self.message = Some(message);
                self.submitting = false;
            }
        }
    }

    /// Builder-style edit, convenient outside reactive code
    pub fn with(mut self, field: Field, value: &str) -> Self {
        self.apply(FormAction::Edit(field, value.to_string()));
        self
    }

    /// Evaluate the form's rules in order
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.kind.rules().iter().find(|rule| !rule.passes(self)) {
            Some(rule) => Err(ValidationError {
                field: rule.field,
                message: rule.message.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// At least [`MIN_PASSWORD_LEN`] characters with a lowercase letter, an
/// uppercase letter, a digit and one of [`PASSWORD_SYMBOLS`]; nothing outside
/// ASCII letters, digits and those symbols.
pub fn is_strong_password(password: &str) -> bool {
    let is_symbol = |c: char| PASSWORD_SYMBOLS.contains(c);

    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(is_symbol)
        && password.chars().all(|c| c.is_ascii_alphanumeric() || is_symbol(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_strength() {
        assert!(is_strong_password("Abcdef1!"));
        assert!(is_strong_password("Zz9;Zz9;Zz9;"));

        assert!(!is_strong_password("abcdefgh"));
        assert!(!is_strong_password("ABCDEFG1"));
        assert!(!is_strong_password("Abc1!"));
        assert!(!is_strong_password("Abcdefg1"));
        // '#' is not in the accepted symbol set
        assert!(!is_strong_password("Abcdef1#"));
        assert!(!is_strong_password("Abcdef1! "));
    }

    #[test]
    fn test_login_requires_all_fields() {
        let form = FormState::new(FormKind::Login)
            .with(Field::Email, "ana@example.com")
            .with(Field::Password, "secret");

        let err = form.validate().unwrap_err();
        assert_eq!(err.field, Field::MfaCode);
        assert_eq!(err.to_string(), MSG_LOGIN_REQUIRED);

        let form = form.with(Field::MfaCode, "123456");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_register_rule_order() {
        let empty = FormState::new(FormKind::Register);
        assert_eq!(empty.validate().unwrap_err().message, MSG_REGISTER_REQUIRED);

        let mismatch = FormState::new(FormKind::Register)
            .with(Field::Email, "ana@example.com")
            .with(Field::Username, "ana")
            .with(Field::Password, "weak")
            .with(Field::ConfirmPassword, "other");
        assert_eq!(mismatch.validate().unwrap_err().message, MSG_PASSWORD_MISMATCH);

        let weak = mismatch.clone().with(Field::ConfirmPassword, "weak");
        let err = weak.validate().unwrap_err();
        assert_eq!(err.field, Field::Password);
        assert_eq!(err.message, MSG_WEAK_PASSWORD);

        let ok = weak
            .with(Field::Password, "Abcdef1!")
            .with(Field::ConfirmPassword, "Abcdef1!");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_edit_clears_feedback() {
        let mut form = FormState::new(FormKind::Login);
        form.apply(FormAction::Fail("boom".to_string()));
        assert_eq!(form.error.as_deref(), Some("boom"));

        form.apply(FormAction::Edit(Field::Email, "a".to_string()));
        assert!(form.error.is_none());
        assert_eq!(form.value(Field::Email), "a");

        form.apply(FormAction::Succeed("ok".to_string()));
        form.apply(FormAction::Edit(Field::Email, "ab".to_string()));
        assert!(form.message.is_none());
    }

    #[test]
    fn test_unknown_field_edits_are_ignored() {
        let form = FormState::new(FormKind::Login).with(Field::Username, "ana");
        assert_eq!(form.value(Field::Username), "");
    }

    #[test]
    fn test_submit_lifecycle() {
        let mut form = FormState::new(FormKind::Register);
        form.apply(FormAction::Submit);
        assert!(form.submitting);

        form.apply(FormAction::Succeed("Usuario registrado".to_string()));
        assert!(!form.submitting);
        assert_eq!(form.message.as_deref(), Some("Usuario registrado"));
    }

    #[test]
    fn test_field_names() {
        for field in FormKind::Register.fields().iter().chain(FormKind::Login.fields()) {
            assert_eq!(Field::from_name(field.name()), Some(*field));
        }
    }
}
