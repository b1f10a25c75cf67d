use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Roles an applicant can apply for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Frontend,
    Backend,
    #[serde(rename = "Full Stack")]
    FullStack,
    #[serde(rename = "AI")]
    Ai,
}

impl Role {
    pub const fn ordered() -> [Self; 4] {
        [Self::Frontend, Self::Backend, Self::FullStack, Self::Ai]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Frontend => "Frontend",
            Self::Backend => "Backend",
            Self::FullStack => "Full Stack",
            Self::Ai => "AI",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::FullStack => "fullstack",
            Self::Ai => "ai",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|role| role.slug().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    Junior,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Junior, Self::Mid, Self::Senior]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Mid => "Mid",
            Self::Senior => "Senior",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Skills offered by the selection screen.
pub const SKILL_OPTIONS: [&str; 7] = [
    "React",
    "Node.js",
    "TypeScript",
    "Python",
    "Docker",
    "SQL",
    "CSS",
];

/// Display metadata for an uploaded resume. The file itself stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRef {
    pub name: String,
}

/// Form fields addressable by edits and validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FullName,
    Email,
    Phone,
    Role,
    Skills,
    Experience,
    Portfolio,
    Resume,
}

impl FormField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Role => "role",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Portfolio => "portfolio",
            Self::Resume => "resume",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single field edit coming from the display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldEdit {
    FullName(String),
    Email(String),
    Phone(String),
    Role(Role),
    Skills(Vec<String>),
    Experience(ExperienceLevel),
    Portfolio(String),
    Resume(Option<ResumeRef>),
}

impl FieldEdit {
    pub const fn field(&self) -> FormField {
        match self {
            Self::FullName(_) => FormField::FullName,
            Self::Email(_) => FormField::Email,
            Self::Phone(_) => FormField::Phone,
            Self::Role(_) => FormField::Role,
            Self::Skills(_) => FormField::Skills,
            Self::Experience(_) => FormField::Experience,
            Self::Portfolio(_) => FormField::Portfolio,
            Self::Resume(_) => FormField::Resume,
        }
    }
}

/// The applicant's in-progress answers. Every field always holds a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub skills: BTreeSet<String>,
    pub experience: ExperienceLevel,
    pub portfolio: String,
    pub resume: Option<ResumeRef>,
}

impl FormState {
    /// Merge an edit into the form. No validation happens here.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::FullName(value) => self.full_name = value,
            FieldEdit::Email(value) => self.email = value,
            FieldEdit::Phone(value) => self.phone = value,
            FieldEdit::Role(value) => self.role = value,
            FieldEdit::Skills(values) => self.skills = values.into_iter().collect(),
            FieldEdit::Experience(value) => self.experience = value,
            FieldEdit::Portfolio(value) => self.portfolio = value,
            FieldEdit::Resume(value) => self.resume = value,
        }
    }

    /// Toggle a single skill, returning whether it is selected afterwards.
    pub fn toggle_skill(&mut self, skill: &str) -> bool {
        if self.skills.remove(skill) {
            false
        } else {
            self.skills.insert(skill.to_string());
            true
        }
    }

    pub fn resume_name(&self) -> Option<&str> {
        self.resume.as_ref().map(|resume| resume.name.as_str())
    }
}
