use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use collab_onboarding::cli::{self, Command, CommandError};
use collab_onboarding::config::OnboardingConfig;
use collab_onboarding::onboarding::{ChannelHandoff, OnboardingManager, Role, SessionAdvance};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = OnboardingConfig::from_env()?;

    // The first argument plays the entry screen's role selection.
    let role = match std::env::args().nth(1) {
        Some(selection) => Role::from_selection(Some(selection.as_str()))?,
        None => config.default_role,
    };

    let (handoff, mut completed_rx) = ChannelHandoff::new(1);
    let manager = OnboardingManager::new(&config, Arc::new(handoff));
    let session_id = manager.start(role).await?;

    eprintln!("Welcome to CollabHub! v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   {} onboarding, session {}", role.label(), session_id);
    eprintln!("   Type 'help' for commands.\n");
    eprintln!("{}\n", cli::describe_step(&manager.snapshot(session_id).await?)?);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut completed = false;

    eprint!("> ");
    while let Some(line) = lines.next_line().await? {
        let command = match cli::parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => {
                eprint!("> ");
                continue;
            }
            Err(e) => {
                eprintln!("{e}");
                eprint!("> ");
                continue;
            }
        };

        match command {
            Command::Set { field, value } | Command::Toggle { field, value } => {
                if let Err(e) = manager
                    .update_field_by_name(session_id, &field, value)
                    .await
                {
                    eprintln!("{e}");
                }
            }
            Command::Next => match manager.advance(session_id).await {
                Ok(SessionAdvance::Step(_)) => {
                    let state = manager.snapshot(session_id).await?;
                    eprintln!("\n{}\n", cli::describe_step(&state)?);
                }
                Ok(SessionAdvance::Completed(_)) => {
                    completed = true;
                    break;
                }
                Err(e) => eprintln!("{e}"),
            },
            Command::Back => {
                manager.retreat(session_id).await?;
                let state = manager.snapshot(session_id).await?;
                eprintln!("\n{}\n", cli::describe_step(&state)?);
            }
            Command::Status => {
                let state = manager.snapshot(session_id).await?;
                eprintln!("\n{}\n", cli::describe_step(&state)?);
            }
            Command::Help => eprintln!("{}", cli::HELP),
            Command::Quit => break,
        }
        eprint!("> ");
    }

    if !completed {
        manager.abandon(session_id).await;
        eprintln!("\nOnboarding abandoned.");
        return Ok(());
    }

    if let Some(profile) = completed_rx.recv().await {
        eprintln!("\nSetup complete. Handing off to the dashboard:");
        println!("{}", serde_json::to_string_pretty(&cli::redacted_json(&profile)?)?);
    }

    Ok(())
}
