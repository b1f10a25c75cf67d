use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::controller::WizardStep;
use super::domain::{FormField, FormState};

pub const FULL_NAME_REQUIRED: &str = "Please enter your full name";
pub const EMAIL_INVALID: &str = "Enter a valid email";
pub const PHONE_INVALID: &str = "Enter a valid phone number";
pub const SKILLS_REQUIRED: &str = "Select at least one skill";
pub const PORTFOLIO_INVALID: &str = "Use a valid URL (start with http)";

/// Field level messages keyed by the offending field. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn record(&mut self, field: FormField, outcome: Result<(), &'static str>) {
        if let Err(message) = outcome {
            self.insert(field, message);
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9\- ]{7,15}$").expect("phone pattern"))
}

pub fn validate_full_name(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        Err(FULL_NAME_REQUIRED)
    } else {
        Ok(())
    }
}

/// `local@domain.tld`: ASCII only, no whitespace, a single `@` and a dot after it.
pub fn validate_email(value: &str) -> Result<(), &'static str> {
    if value.is_ascii() && email_pattern().is_match(value) {
        Ok(())
    } else {
        Err(EMAIL_INVALID)
    }
}

/// Optional leading `+` followed by 7 to 15 digits, hyphens or spaces.
pub fn validate_phone(value: &str) -> Result<(), &'static str> {
    if phone_pattern().is_match(value) {
        Ok(())
    } else {
        Err(PHONE_INVALID)
    }
}

pub fn validate_skills<I, S>(skills: I) -> Result<(), &'static str>
where
    I: IntoIterator<Item = S>,
{
    if skills.into_iter().next().is_some() {
        Ok(())
    } else {
        Err(SKILLS_REQUIRED)
    }
}

/// Empty is allowed; anything else must be an http(s) URL.
pub fn validate_portfolio(value: &str) -> Result<(), &'static str> {
    if value.is_empty() || value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(PORTFOLIO_INVALID)
    }
}

/// Rules gating a single wizard step. The review step carries none.
pub fn validate_step(step: WizardStep, state: &FormState) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match step {
        WizardStep::Identity => {
            errors.record(FormField::FullName, validate_full_name(&state.full_name));
            errors.record(FormField::Email, validate_email(&state.email));
            errors.record(FormField::Phone, validate_phone(&state.phone));
        }
        WizardStep::Skills => {
            errors.record(FormField::Skills, validate_skills(&state.skills));
            errors.record(FormField::Portfolio, validate_portfolio(&state.portfolio));
        }
        WizardStep::Review => {}
    }
    errors
}

/// Every rule regardless of step, used as the integrity check before submission.
pub fn validate_all(state: &FormState) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.record(FormField::FullName, validate_full_name(&state.full_name));
    errors.record(FormField::Email, validate_email(&state.email));
    errors.record(FormField::Phone, validate_phone(&state.phone));
    errors.record(FormField::Skills, validate_skills(&state.skills));
    errors.record(FormField::Portfolio, validate_portfolio(&state.portfolio));
    errors
}
