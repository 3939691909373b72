//! Terminal session loop.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use academy_core::clock::SystemClock;
use academy_i18n::Localizer;
use academy_levels::catalog::{MissionCatalog, SharedRng};
use academy_orchestrator::{Orchestrator, Screen};
use academy_store::JsonFileStore;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::commands::{self, Command};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::rng::StdRandom;
use crate::terminal;

/// The campaign shipped with the binary.
pub const BUILTIN_MISSIONS: &str = include_str!("../missions/missions.yaml");

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Loads the mission catalog named by `config`, or the built-in one.
///
/// # Errors
///
/// Returns `AppError::Io` if the file cannot be read, `AppError::Catalog`
/// if it is not a catalog, or `AppError::Config` if it has no missions.
pub async fn load_catalog(config: &AppConfig) -> Result<MissionCatalog, AppError> {
    let catalog = match &config.missions_path {
        Some(path) => {
            info!(path = %path.display(), "loading mission catalog");
            let yaml = tokio::fs::read_to_string(path).await?;
            MissionCatalog::from_yaml(&yaml)?
        }
        None => MissionCatalog::from_yaml(BUILTIN_MISSIONS)?,
    };
    if catalog.is_empty() {
        return Err(AppError::Config("mission catalog has no missions".into()));
    }
    Ok(catalog)
}

/// Builds an orchestrator from `config` using the system clock, the JSON
/// save file and an OS-seeded RNG.
///
/// # Errors
///
/// Returns an error if the catalog or the locale tables cannot be loaded.
pub async fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator, AppError> {
    let catalog = load_catalog(config).await?;
    let rng: SharedRng = Arc::new(Mutex::new(StdRandom::from_os()));
    let registry = catalog.into_registry(rng);
    let localizer = Localizer::builtin()?;

    Ok(Orchestrator::new(
        Arc::new(SystemClock),
        Arc::new(JsonFileStore::new(config.save_path.clone())),
        Arc::new(registry),
        Arc::new(localizer),
        config.orchestrator_config(),
    ))
}

/// Applies one command to the orchestrator.
pub async fn apply(orchestrator: &mut Orchestrator, command: Command) -> Flow {
    debug!(?command, "command");
    match command {
        Command::Start(name) => {
            if let Err(err) = orchestrator.begin_session(&name, false).await {
                debug!(%err, "session not started");
            }
        }
        Command::Continue => {
            let returning = orchestrator.state().has_player();
            if let Err(err) = orchestrator.begin_session("", returning).await {
                debug!(%err, "no saved player to continue");
            }
        }
        Command::Intro => orchestrator.show_intro(),
        Command::Back => orchestrator.show_landing(),
        Command::Levels => orchestrator.open_level_select(),
        Command::Play(level) => {
            if let Err(err) = orchestrator.select_level(level).await {
                debug!(%err, "mission not started");
            }
        }
        Command::Retry => {
            if orchestrator.surface().visible() == Screen::Results
                || orchestrator.surface().visible() == Screen::Game
            {
                orchestrator.retry().await;
            }
        }
        Command::Next => orchestrator.next_mission().await,
        Command::Language(language) => orchestrator.set_language(language).await,
        Command::Pause => orchestrator.pause(),
        Command::Resume => orchestrator.resume(),
        Command::Dismiss => {
            orchestrator.dismiss_dialog();
        }
        Command::Quit => return Flow::Quit,
        Command::Input(line) => orchestrator.dispatch_input(&line).await,
    }
    Flow::Continue
}

async fn draw<W>(out: &mut W, orchestrator: &Orchestrator) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    let frame = terminal::render(orchestrator.surface());
    out.write_all(b"\n").await?;
    out.write_all(frame.as_bytes()).await?;
    out.write_all(b"> ").await?;
    out.flush().await?;
    Ok(())
}

/// Runs an interactive session on stdin/stdout until `:quit` or end of
/// input.
///
/// # Errors
///
/// Returns an error if startup fails or the terminal cannot be written.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let mut orchestrator = build_orchestrator(&config).await?;
    orchestrator.start().await;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    draw(&mut stdout, &orchestrator).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match commands::parse(&line) {
                    Ok(command) => {
                        if apply(&mut orchestrator, command).await == Flow::Quit {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(%err, "unrecognized command");
                        stdout.write_all(format!("{err}\n").as_bytes()).await?;
                    }
                }
                draw(&mut stdout, &orchestrator).await?;
            }
            _ = ticker.tick() => {
                if orchestrator.tick() {
                    draw(&mut stdout, &orchestrator).await?;
                }
            }
        }
    }

    info!(
        player = orchestrator.state().player_identifier(),
        score = orchestrator.state().score(),
        "session ended"
    );
    Ok(())
}
