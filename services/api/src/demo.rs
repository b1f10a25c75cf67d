use apply_wizard::config::AppConfig;
use apply_wizard::error::AppError;
use apply_wizard::roles::{RoleCatalog, RoleDetail};
use apply_wizard::wizard::{
    AdvanceOutcome, ApplicationGateway, ExperienceLevel, FieldEdit, HttpApplicationGateway,
    InMemorySessionRepository, RecordingGateway, ResumeRef, Role, SessionId, SessionRepository,
    SessionSnapshot, SubmitOutcome, WizardService,
};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct RolesArgs {
    /// Show a single role (frontend, backend, fullstack, ai)
    #[arg(long)]
    pub(crate) slug: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Post the application to the configured submission endpoint instead of recording it locally
    #[arg(long)]
    pub(crate) live: bool,
}

pub(crate) fn run_roles(args: RolesArgs) -> Result<(), AppError> {
    let catalog = RoleCatalog::standard();
    match args.slug {
        Some(slug) => match catalog.by_slug(&slug) {
            Some(detail) => render_role(detail),
            None => {
                let known: Vec<&str> = catalog.roles().iter().map(|detail| detail.slug).collect();
                println!("No role matches '{slug}'. Known roles: {}", known.join(", "));
            }
        },
        None => {
            println!("Open roles");
            for detail in catalog.roles() {
                render_role(detail);
            }
        }
    }
    Ok(())
}

fn render_role(detail: &RoleDetail) {
    println!(
        "\n{} [{}] {}",
        detail.title,
        detail.slug,
        detail.stipend.label()
    );
    println!("  {}", detail.summary);
    println!("  Requirements: {}", detail.requirements);
    for benefit in &detail.benefits {
        println!("  - {benefit}");
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Application wizard demo");
    let repository = Arc::new(InMemorySessionRepository::default());

    if args.live {
        let config = AppConfig::load()?;
        let gateway = HttpApplicationGateway::from_config(&config.submission)?;
        println!("Submitting to {}", gateway.endpoint());
        let service = WizardService::new(repository, Arc::new(gateway));
        walk_through(&service).await?;
        return Ok(());
    }

    let gateway = Arc::new(RecordingGateway::default());
    let service = WizardService::new(repository, gateway.clone());
    walk_through(&service).await?;

    let submissions = gateway.submissions();
    println!("\nRecorded {} submission(s) locally", submissions.len());
    for payload in submissions {
        match serde_json::to_string_pretty(&payload) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("  Payload unavailable: {err}"),
        }
    }
    Ok(())
}

async fn walk_through<R, G>(service: &WizardService<R, G>) -> Result<(), AppError>
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    let (id, snapshot) = service.open()?;
    println!("- Opened {id}");
    render_progress(&snapshot);

    println!("\nTrying to continue with an empty form");
    let (outcome, snapshot) = service.advance(&id)?;
    render_advance(outcome, &snapshot);

    fill(service, &id, identity_answers())?;
    let (outcome, snapshot) = service.advance(&id)?;
    render_advance(outcome, &snapshot);

    fill(service, &id, skills_answers())?;
    let (outcome, snapshot) = service.advance(&id)?;
    render_advance(outcome, &snapshot);
    let (outcome, snapshot) = service.advance(&id)?;
    render_advance(outcome, &snapshot);

    let form = &snapshot.form;
    println!("\nReview");
    println!("  {} <{}> {}", form.full_name, form.email, form.phone);
    println!(
        "  {} | {} | {}",
        form.role,
        form.experience.label(),
        form.skills.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    if let Some(resume) = form.resume_name() {
        println!("  Resume: {resume}");
    }

    println!("\nSubmitting");
    let (outcome, snapshot) = service.submit(&id).await?;
    match &outcome {
        SubmitOutcome::Accepted {
            application_id,
            receipt,
        } => println!(
            "- Accepted as {application_id} (backend status {})",
            receipt.status
        ),
        SubmitOutcome::Failed { error } => println!("- Submission failed: {}", error.message),
        SubmitOutcome::Incomplete { errors } => {
            println!("- Application incomplete:");
            for (field, message) in errors.iter() {
                println!("    {}: {message}", field.key());
            }
        }
    }
    render_progress(&snapshot);
    Ok(())
}

fn fill<R, G>(
    service: &WizardService<R, G>,
    id: &SessionId,
    edits: Vec<FieldEdit>,
) -> Result<(), AppError>
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    for edit in edits {
        service.edit_field(id, edit)?;
    }
    Ok(())
}

fn identity_answers() -> Vec<FieldEdit> {
    vec![
        FieldEdit::FullName("Grace Hopper".to_string()),
        FieldEdit::Email("grace@example.com".to_string()),
        FieldEdit::Phone("+1 202 555 0143".to_string()),
        FieldEdit::Role(Role::Backend),
    ]
}

fn skills_answers() -> Vec<FieldEdit> {
    vec![
        FieldEdit::Skills(vec!["Node.js".to_string(), "SQL".to_string()]),
        FieldEdit::Experience(ExperienceLevel::Senior),
        FieldEdit::Portfolio("https://github.com/grace".to_string()),
        FieldEdit::Resume(Some(ResumeRef {
            name: "grace-hopper.pdf".to_string(),
        })),
    ]
}

fn render_advance(outcome: AdvanceOutcome, snapshot: &SessionSnapshot) {
    match outcome {
        AdvanceOutcome::Blocked => {
            println!("- Blocked on {}:", snapshot.step.label());
            for (field, message) in snapshot.errors.iter() {
                println!("    {}: {message}", field.key());
            }
        }
        AdvanceOutcome::Moved(step) => println!("- Moved to {}", step.label()),
        AdvanceOutcome::ReadyForReview => println!("- Ready for review"),
    }
    render_progress(snapshot);
}

fn render_progress(snapshot: &SessionSnapshot) {
    println!(
        "  Journey: {} ({}%)",
        snapshot.status.step.label(),
        snapshot.status.completion_percentage
    );
}
