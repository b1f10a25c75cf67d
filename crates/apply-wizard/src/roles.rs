//! Static catalog of open roles shown before an applicant starts the wizard.

use serde::Serialize;

use crate::wizard::domain::{ExperienceLevel, Role, SKILL_OPTIONS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDetail {
    pub role: Role,
    pub slug: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub benefits: Vec<&'static str>,
    pub requirements: &'static str,
    pub stipend: StipendRange,
}

/// Monthly stipend bounds in whole US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StipendRange {
    pub min: u32,
    pub max: u32,
}

impl StipendRange {
    pub fn label(&self) -> String {
        format!(
            "${} - ${}/month",
            thousands(self.min),
            thousands(self.max)
        )
    }
}

fn thousands(value: u32) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (idx, ch) in raw.chars().enumerate() {
        if idx > 0 && (raw.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Options the display layer offers on the skills step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOptions {
    pub roles: Vec<Role>,
    pub skills: Vec<&'static str>,
    pub experience_levels: Vec<ExperienceLevel>,
}

pub fn form_options() -> FormOptions {
    FormOptions {
        roles: Role::ordered().to_vec(),
        skills: SKILL_OPTIONS.to_vec(),
        experience_levels: ExperienceLevel::ordered().to_vec(),
    }
}

#[derive(Debug, Clone)]
pub struct RoleCatalog {
    roles: Vec<RoleDetail>,
}

impl RoleCatalog {
    pub fn standard() -> Self {
        Self {
            roles: Role::ordered().into_iter().map(role_detail).collect(),
        }
    }

    pub fn roles(&self) -> &[RoleDetail] {
        &self.roles
    }

    pub fn get(&self, role: Role) -> Option<&RoleDetail> {
        self.roles.iter().find(|detail| detail.role == role)
    }

    pub fn by_slug(&self, slug: &str) -> Option<&RoleDetail> {
        Role::from_slug(slug).and_then(|role| self.get(role))
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn role_detail(role: Role) -> RoleDetail {
    match role {
        Role::Frontend => RoleDetail {
            role,
            slug: role.slug(),
            title: "Frontend Engineer",
            summary: "Build beautiful, responsive user interfaces",
            benefits: vec![
                "Master React, TypeScript, and modern web frameworks",
                "Ship production UIs used by thousands of users",
                "Learn design systems and accessibility best practices",
                "Mentor from experienced product designers and engineers",
                "3-month flexible internship (full-time or part-time)",
            ],
            requirements: "Proficiency in HTML, CSS, JavaScript/React. Portfolio or GitHub projects required.",
            stipend: StipendRange { min: 5_000, max: 8_000 },
        },
        Role::Backend => RoleDetail {
            role,
            slug: role.slug(),
            title: "Backend Engineer",
            summary: "Build scalable APIs and data infrastructure",
            benefits: vec![
                "Design and deploy production-grade API systems",
                "Work with modern stacks: Node.js, Python, Go, or Rust",
                "Learn database optimization, caching, and microservices",
                "Contribute to core business logic and architecture",
                "Remote-friendly, flexible hours",
            ],
            requirements: "Strong programming fundamentals. Experience with REST APIs or databases. Portfolio on GitHub.",
            stipend: StipendRange { min: 5_500, max: 8_500 },
        },
        Role::FullStack => RoleDetail {
            role,
            slug: role.slug(),
            title: "Full Stack Engineer",
            summary: "Own entire product features end-to-end",
            benefits: vec![
                "Take features from zero to launch independently",
                "Master both frontend and backend technologies",
                "Understand how businesses scale tech",
                "Join a small team and have direct impact on product",
                "Potential full-time offer based on performance",
            ],
            requirements: "Solid understanding of client-server architecture. Experience shipping projects (personal or academic). Git proficiency.",
            stipend: StipendRange { min: 6_000, max: 9_000 },
        },
        Role::Ai => RoleDetail {
            role,
            slug: role.slug(),
            title: "AI/ML Engineer",
            summary: "Build intelligent features with machine learning",
            benefits: vec![
                "Work on real-world ML problems and datasets",
                "Learn LLM integration, fine-tuning, and RAG systems",
                "Deploy models to production and optimize for scale",
                "Collaborate with product teams on AI features",
                "Stay ahead of AI trends in an accelerated program",
            ],
            requirements: "Python proficiency, understanding of ML fundamentals. Experience with PyTorch, TensorFlow, or scikit-learn.",
            stipend: StipendRange { min: 6_000, max: 9_500 },
        },
    }
}
