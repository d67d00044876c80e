use anyhow::Context;
use clap::Parser;
use eventpro::core::roster::{load_roster, Roster};
use eventpro::core::{CelebrationHook, Storage};
use eventpro::utils::logger;
use eventpro::utils::validation::{clamp_group_size, Validate};
use eventpro::{
    CliConfig, Command, EventConfig, EventError, EventSession, LocalStorage, Participant,
};
use std::io::Write;

struct TerminalCelebration;

impl CelebrationHook for TerminalCelebration {
    fn celebrate(&self, winner: &Participant) {
        // Clear the suspense reel line before announcing.
        println!("\r\x1b[2K🎉 We have a winner: {}!", winner.name);
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        let Some(event_error) = e.downcast_ref::<EventError>() else {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        };

        tracing::error!(
            "❌ {:#} (Category: {:?}, Severity: {:?})",
            e,
            event_error.category(),
            event_error.severity()
        );
        eprintln!("❌ {}", event_error.user_friendly_message());
        eprintln!("💡 {}", event_error.recovery_suggestion());

        let exit_code = event_error.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    cli.validate()?;

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            EventConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?
        }
        None => EventConfig::default(),
    };
    config.validate()?;

    let roster = build_roster(&cli, &config).await?;

    let mut settings = config.session_settings();
    if let Command::Draw { allow_repeat: true, .. } = cli.command {
        settings.allow_repeat = true;
    }

    let mut session = match cli.seed {
        Some(seed) => EventSession::seeded(seed, settings),
        None => EventSession::new(settings),
    }
    .with_celebration(TerminalCelebration);
    session.replace_roster(roster);

    if cli.dedupe || config.dedupe() {
        let before = session.roster().len();
        session.remove_duplicates();
        tracing::info!(
            "Removed {} duplicate entries",
            before - session.roster().len()
        );
    }

    println!("📋 {} ({} participants)", config.event_name(), session.roster().len());

    match cli.command {
        Command::Roster => show_roster(session.roster()),
        Command::Draw { count, suspense, .. } => {
            for round in 1..=count {
                let result = if suspense {
                    session.draw_with_suspense(print_reel_frame).await
                } else {
                    session.draw()
                };

                match result {
                    Ok(winner) => {
                        println!("#{} {}", session.draw_engine().history().len(), winner.name);
                    }
                    Err(EventError::EmptyPool) if round > 1 => {
                        println!("⚠️ No more names left in the pool after {} draws.", round - 1);
                        break;
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            println!();
            println!("🏆 Winners (most recent first):");
            for winner in session.draw_engine().history() {
                println!("  - {}", winner.name);
            }
        }
        Command::Group { size, ref export } => {
            let requested = size.unwrap_or(config.group_size());
            let group_size = clamp_group_size(requested, session.roster().len());
            if group_size != requested {
                tracing::warn!("Group size {} adjusted to {}", requested, group_size);
            }

            let result = session.partition(group_size)?;
            for group in &result.groups {
                println!();
                println!("{} ({} people)", group.label, group.members.len());
                for member in &group.members {
                    println!("  - {}", member.name);
                }
            }

            let kinds = if export.is_empty() {
                config.export_kinds()?
            } else {
                cli.export_kinds()?
            };
            if !kinds.is_empty() {
                let output_path = cli
                    .output_path
                    .clone()
                    .unwrap_or_else(|| config.output_path().to_string());
                let storage = LocalStorage::new(output_path);
                println!();
                for kind in kinds {
                    let file = session.export(kind)?;
                    let saved = storage
                        .save_file(&file.file_name, file.content_type, &file.bytes)
                        .await?;
                    println!("📁 Saved {}", saved);
                }
            }
        }
    }

    Ok(())
}

/// Inline names win over a names file, which wins over the sample roster and
/// finally the roster file named in the config.
async fn build_roster(cli: &CliConfig, config: &EventConfig) -> anyhow::Result<Roster> {
    if !cli.names.is_empty() {
        return Ok(Roster::from_names(&cli.names));
    }

    let storage = LocalStorage::new(".".to_string());
    if let Some(path) = &cli.names_file {
        return Ok(load_roster(&storage, path).await?);
    }
    if cli.sample {
        return Ok(Roster::sample());
    }
    if let Some(path) = config.roster_file() {
        return Ok(load_roster(&storage, path).await?);
    }

    Err(EventError::MissingConfigError {
        field: "names (use --names, --names-file, --sample or [roster] file)".to_string(),
    }
    .into())
}

fn show_roster(roster: &Roster) {
    let duplicates = roster.duplicate_names();
    for (i, p) in roster.participants().iter().enumerate() {
        let marker = if duplicates.contains(&p.name) { " (duplicate)" } else { "" };
        println!("{:>3}. {}{}", i + 1, p.name, marker);
    }

    if !duplicates.is_empty() {
        println!();
        println!(
            "⚠️ Repeated names: {}",
            duplicates.into_iter().collect::<Vec<_>>().join(", ")
        );
        println!("💡 Use --dedupe to keep only the first of each.");
    }
}

fn print_reel_frame(names: &[String]) {
    print!("\r🎰 {}", names.join(" | "));
    let _ = std::io::stdout().flush();
}
