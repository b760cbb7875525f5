use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use complaint_desk::cli::{Cli, Command};
use complaint_desk::config::DeskConfig;
use complaint_desk::notify::TracingNotifier;
use complaint_desk::store::MemoryStore;
use complaint_desk::ui::Printer;
use complaint_desk::{ComplaintDesk, NewComplaint, RolePolicy};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let printer = Printer::new(cli.json);

    match run(cli, &printer).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            printer.error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, printer: &Printer) -> Result<()> {
    let config = DeskConfig::load(cli.config.as_deref())?;

    // RUST_LOG wins over the configured filter; --verbose wins over both.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store = MemoryStore::open(&config.data_file)?;
    let desk = ComplaintDesk::new(
        store,
        RolePolicy::new(config.staff_may_triage),
        TracingNotifier,
    )
    .with_retry(config.retry.clone());

    match cli.command {
        Command::File {
            title,
            body,
            category,
            department,
            priority,
            who,
        } => {
            let complaint = desk.file(
                &who.actor(),
                NewComplaint {
                    title,
                    body,
                    category,
                    department,
                    priority: priority.into(),
                },
            )?;
            printer.filed(&complaint);
        }
        Command::Assign { id, to, who } => {
            let complaint = desk.assign(id, to, &who.actor())?;
            printer.assigned(&complaint);
        }
        Command::Transition {
            id,
            status,
            note,
            who,
        } => {
            let transition = desk
                .transition_with_retry(id, status.into(), &who.actor(), note.as_deref())
                .await?;
            printer.transition(&transition);
        }
        Command::Show { id } => printer.complaint(&desk.get(id)?),
        Command::History { id } => printer.history(&desk.history(id)?),
        Command::List { status } => printer.list(&desk.list(status.map(Into::into))?),
    }

    Ok(())
}
