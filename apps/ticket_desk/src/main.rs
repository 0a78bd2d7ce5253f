use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use ticket_core::{HttpBackend, ResultOutcome, TicketWorkflow};
use tracing_subscriber::EnvFilter;

mod config;
mod controller;

use config::load_settings;
use controller::{DialogController, TicketForm};

#[derive(Parser, Debug)]
#[command(about = "Raise an alumni services support ticket")]
struct Cli {
    #[arg(long, default_value = "ticket.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    employee_id: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the categories offered by the ticket service.
    Categories,
    /// Fill in the ticket form and submit it.
    Submit {
        #[arg(long)]
        category: String,
        /// Ten digits, without the +91 prefix.
        #[arg(long)]
        phone: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        attachment: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    if let Some(url) = cli.server_url {
        settings.api_base_url = url;
    }
    if let Some(employee_id) = cli.employee_id {
        settings.employee_id = employee_id;
    }

    let backend = Arc::new(
        HttpBackend::with_timeout(&settings.api_base_url, settings.request_timeout())?
            .with_paths(&settings.categories_path, &settings.create_path),
    );
    let handle = TicketWorkflow::spawn(settings.session_context(), backend.clone(), backend);
    let mut controller = DialogController::new(handle, settings.request_timeout() * 2);

    match cli.command {
        Command::Categories => {
            let lines = controller.list_categories().await?;
            if lines.is_empty() {
                println!("No categories available.");
            }
            for line in lines {
                let marker = if line.attachment_required { " (attachment required)" } else { "" };
                println!("{}{marker}", line.name);
                if let Some(instructions) = line.instructions {
                    println!("    Additional Instructions: {instructions}");
                }
            }
        }
        Command::Submit {
            category,
            phone,
            description,
            attachment,
        } => {
            let outcome = controller
                .submit(TicketForm {
                    category,
                    phone_digits: phone,
                    description,
                    attachment,
                })
                .await?;
            println!("{}", outcome.message());
            if outcome == ResultOutcome::Failure {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
