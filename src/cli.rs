// src/cli.rs
use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::ConfigManager;
use crate::types::ResumeUpload;
use crate::ui::dom::{AlertSnapshot, Document};
use crate::ui::{page, ClickTarget, DocumentHandle, UiController, UiEvent};

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "Drive the resume matcher page against a matching backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./matcher.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Matching backend URL, overrides config and environment
    #[arg(long)]
    pub base_url: Option<String>,

    /// Write JSON logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List uploaded resumes
    Resumes,
    /// List job descriptions
    Jobs,
    /// Upload a resume file (.txt, .pdf or .docx)
    Upload { file: PathBuf },
    /// Save a job description
    AddJob {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Match a resume against a job description
    Match {
        #[arg(long)]
        resume: String,
        #[arg(long)]
        job: String,
    },
    /// Show a job description
    ShowJob { id: String },
    /// Delete a job description
    DeleteJob {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete a resume
    DeleteResume {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = ConfigManager::load(cli.config.as_deref())?.with_base_url(cli.base_url);

    let mut layout = page::default_layout();
    if let Command::Upload { file } = &cli.command {
        let upload = ResumeUpload::from_path(file).await?;
        layout.select_file(page::RESUME_FILE, Some(upload));
    }
    if let Command::DeleteJob { yes, .. } | Command::DeleteResume { yes, .. } = &cli.command {
        layout.set_confirm_answer(*yes || confirm_on_terminal()?);
    }

    let shared = Arc::new(Mutex::new(layout));
    let document: DocumentHandle = shared.clone();
    let controller = crate::build_controller(&config, document)?;

    controller.dispatch(UiEvent::Ready).await;

    match cli.command {
        Command::Resumes => {
            let doc = shared.lock().await;
            print_options(&*doc, page::SELECT_RESUME);
        }
        Command::Jobs => {
            let doc = shared.lock().await;
            print_options(&*doc, page::SELECT_JOB);
        }
        Command::Upload { .. } => {
            run(&controller, UiEvent::Navigate(page::NAV_UPLOAD.to_string())).await;
            run(&controller, UiEvent::Submit(page::RESUME_FORM.to_string())).await;
            let doc = shared.lock().await;
            if doc.is_visible(page::PROCESSING_RESULTS) {
                print_html(&*doc, page::RESULT_CONTENT);
            }
        }
        Command::AddJob { title, description } => {
            {
                let mut doc = shared.lock().await;
                doc.set_value(page::JOB_TITLE, &title);
                doc.set_value(page::JOB_DESCRIPTION, &description);
            }
            run(&controller, UiEvent::Submit(page::JOB_FORM.to_string())).await;
        }
        Command::Match { resume, job } => {
            run(&controller, UiEvent::Navigate(page::NAV_MATCH.to_string())).await;
            {
                let mut doc = shared.lock().await;
                doc.set_value(page::SELECT_RESUME, &resume);
                doc.set_value(page::SELECT_JOB, &job);
            }
            run(&controller, UiEvent::Submit(page::MATCH_FORM.to_string())).await;
            let doc = shared.lock().await;
            if doc.is_visible(page::MATCH_RESULTS) {
                print_match(&*doc);
            }
        }
        Command::ShowJob { id } => {
            run(&controller, UiEvent::Navigate(page::NAV_JOBS.to_string())).await;
            let target = ClickTarget::new("btn btn-sm btn-info view-job", Some(&id));
            run(&controller, UiEvent::JobsTableClick(target)).await;
            let doc = shared.lock().await;
            if doc.is_visible(page::JOB_MODAL) {
                print_job_modal(&*doc);
            }
        }
        Command::DeleteJob { id, .. } => {
            run(&controller, UiEvent::Navigate(page::NAV_JOBS.to_string())).await;
            let target = ClickTarget::new("btn btn-sm btn-danger delete-job", Some(&id));
            run(&controller, UiEvent::JobsTableClick(target)).await;
        }
        Command::DeleteResume { id, .. } => {
            controller.delete_resume(&id).await;
        }
    }

    let doc = shared.lock().await;
    print_alerts(&doc.alerts(page::MAIN_CONTAINER));
    Ok(())
}

async fn run(controller: &UiController, event: UiEvent) {
    info!("Dispatching {:?}", event);
    controller.dispatch(event).await;
}

fn confirm_on_terminal() -> Result<bool> {
    use std::io::{BufRead, Write};

    print!("Are you sure? [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_alerts(alerts: &[AlertSnapshot]) {
    // Oldest first reads naturally on a terminal.
    for alert in alerts.iter().rev() {
        match alert.created_at {
            Some(at) => println!(
                "{} [{}] {}",
                at.with_timezone(&Local).format("%H:%M:%S"),
                alert.severity,
                alert.message
            ),
            None => println!("[{}] {}", alert.severity, alert.message),
        }
    }
}

fn print_options(doc: &dyn Document, select: &str) {
    for option in doc.options(select).unwrap_or_default().iter().skip(1) {
        println!("{}\t{}", option.value, option.label);
    }
}

fn print_html(doc: &dyn Document, id: &str) {
    if let Some(html) = doc.inner_html(id) {
        println!("{}", html);
    }
}

fn print_match(doc: &dyn Document) {
    println!(
        "Match: {}",
        doc.text(page::MATCH_PERCENTAGE).unwrap_or_default()
    );
    print_html(doc, page::MATCHING_SKILLS);
    print_html(doc, page::MISSING_SKILLS);
    print_html(doc, page::MATCH_BREAKDOWN);
}

fn print_job_modal(doc: &dyn Document) {
    println!("{}", doc.text(page::MODAL_JOB_TITLE).unwrap_or_default());
    println!();
    println!("{}", doc.text(page::MODAL_JOB_DESCRIPTION).unwrap_or_default());
    print_html(doc, page::MODAL_JOB_SKILLS);
}
