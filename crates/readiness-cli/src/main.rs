mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use readiness_client::ReadinessClient;
use readiness_core::models::AnalysisRequest;
use render::Renderer;
use serde_json::Value;
use std::io::IsTerminal;

fn setup_logging() -> Result<()> {
    let mut log_path = std::env::temp_dir();
    log_path.push("readiness-cli.log");

    let log_file = std::fs::File::create(log_path)?;
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter("readiness_cli=debug,readiness_client=debug")
        .json()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "readiness")]
#[command(about = "Issue readiness checks from the terminal", long_about = None)]
struct Args {
    /// Daemon socket path
    #[arg(short, long, default_value = "/tmp/readiness.sock")]
    socket: String,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an issue and show the readiness panel
    Check {
        issue_id: String,

        /// Also run the AI description assessment
        #[arg(long)]
        analyze: bool,
    },

    /// Assign the issue to yourself, then re-evaluate it
    Fix { issue_id: String },

    /// Show or change which checks are enabled
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Run the AI description assessment on ad-hoc fields
    Analyze {
        #[arg(long)]
        summary: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "type", default_value = "Task")]
        issue_type: String,
    },

    /// Print daemon notifications as they arrive
    Watch,
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        description: Option<bool>,
        #[arg(long)]
        assignee: Option<bool>,
        #[arg(long)]
        priority: Option<bool>,
        #[arg(long)]
        labels: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = setup_logging() {
        eprintln!("Warning: failed to set up logging: {}", e);
    }

    let client = ReadinessClient::new(&args.socket);
    let renderer = Renderer::new(!args.no_color && std::io::stdout().is_terminal());
    tracing::debug!(socket = %args.socket, command = ?args.command, "Running command");

    match args.command {
        Command::Check { issue_id, analyze } => {
            let snapshot = client
                .issue_evaluate(&issue_id)
                .await
                .with_context(|| format!("Failed to evaluate issue {}", issue_id))?;
            print!("{}", renderer.snapshot(&snapshot));

            if analyze {
                println!();
                let result = client.issue_analyze(&snapshot.analysis_request).await?;
                print!("{}", renderer.analysis(&result));
            }
        }
        Command::Fix { issue_id } => {
            let assignment = client.issue_assign_self(&issue_id).await.map_err(|e| {
                tracing::error!("Assign failed for {}: {}", issue_id, e);
                e.context(format!("Could not assign {} to you", issue_id))
            })?;
            println!("Assigned {} to {}", assignment.issue_id, assignment.account_id);

            let snapshot = client.issue_evaluate(&issue_id).await?;
            print!("{}", renderer.snapshot(&snapshot));
        }
        Command::Settings { action } => {
            let settings = match action {
                SettingsAction::Show => client.settings_get().await?,
                SettingsAction::Set {
                    description,
                    assignee,
                    priority,
                    labels,
                } => {
                    let mut settings = client.settings_get().await?;
                    if let Some(value) = description {
                        settings.check_description = value;
                    }
                    if let Some(value) = assignee {
                        settings.check_assignee = value;
                    }
                    if let Some(value) = priority {
                        settings.check_priority = value;
                    }
                    if let Some(value) = labels {
                        settings.check_labels = value;
                    }
                    client.settings_save(&settings).await?
                }
            };
            print!("{}", renderer.settings(&settings));
        }
        Command::Analyze {
            summary,
            description,
            issue_type,
        } => {
            let request = AnalysisRequest {
                summary,
                description: description.map(Value::String),
                issue_type,
            };
            let result = client.issue_analyze(&request).await?;
            print!("{}", renderer.analysis(&result));
        }
        Command::Watch => {
            let mut notifications = client.subscribe_notifications().await?;
            println!("Watching {} (Ctrl-C to stop)", client.socket_path());

            loop {
                tokio::select! {
                    notification = notifications.recv() => match notification {
                        Some(notification) => println!("{}", renderer.notification(&notification)),
                        None => {
                            println!("Daemon connection closed");
                            break;
                        }
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_settings_set() {
        let args = Args::try_parse_from([
            "readiness",
            "settings",
            "set",
            "--labels",
            "false",
            "--priority",
            "true",
        ])
        .unwrap();

        match args.command {
            Command::Settings {
                action:
                    SettingsAction::Set {
                        description,
                        labels,
                        priority,
                        ..
                    },
            } => {
                assert_eq!(description, None);
                assert_eq!(labels, Some(false));
                assert_eq!(priority, Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_check_with_analyze() {
        let args = Args::try_parse_from(["readiness", "-s", "/tmp/x.sock", "check", "PROJ-1", "--analyze"])
            .unwrap();
        assert_eq!(args.socket, "/tmp/x.sock");
        assert!(matches!(
            args.command,
            Command::Check { ref issue_id, analyze: true } if issue_id == "PROJ-1"
        ));
    }
}
