//! `simulate` sub-command
//!
//! Scripted participants poll one session until it is finalized. Every
//! participant disagrees on the first round of a story and agrees from the
//! second round on, so strict modes exercise re-votes and racing closes.

use crate::{build_service, event_logger};
use anyhow::{Context, Result, bail};
use poker_application::{
    CreateSessionInput, PlanningPokerPort, PollReport, PollingClient, ScriptedVotes,
    SessionRegistry, VoteChooser,
};
use poker_domain::{
    Card, OutputFormat, ParticipantName, SessionCode, StoryDraft, parse_story_list,
};
use poker_infrastructure::FileConfig;
use poker_presentation::{ConsoleFormatter, SimulateArgs};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SPREAD: [u16; 6] = [1, 2, 3, 5, 8, 13];

const DEFAULT_STORIES: [&str; 3] = ["Sign-up form", "Password reset", "Profile page"];

pub async fn run(config: &FileConfig, args: SimulateArgs) -> Result<()> {
    let stories: Vec<StoryDraft> = match &args.stories {
        Some(path) => load_stories(path)?,
        None => DEFAULT_STORIES
            .iter()
            .map(|title| StoryDraft::new(title, ""))
            .collect::<Result<_, _>>()?,
    };
    let story_count = stories.len();

    let mut polling = config.polling.to_polling_config().with_max_polls(args.max_polls);
    if let Some(ms) = args.interval_ms {
        polling = polling.with_interval(Duration::from_millis(ms));
    }

    let (port, code) = open_session(config, &args, stories).await?;
    info!("Simulating {} participants in session {}", args.participants, code);

    let names = (1..=args.participants)
        .map(|i| ParticipantName::new(format!("player-{}", i)))
        .collect::<Result<Vec<_>, _>>()?;

    // Everyone joins before anyone votes so each round needs every player
    for name in &names {
        port.join(&code, name).await?;
    }

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let handles: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let chooser: Arc<dyn VoteChooser> = Arc::new(script_for(i, story_count));
            let client = PollingClient::new(Arc::clone(&port), code.clone(), name.clone(), chooser)
                .with_config(polling.clone());
            tokio::spawn(client.run(cancel.clone()))
        })
        .collect();

    let mut reports: Vec<(ParticipantName, PollReport)> = Vec::with_capacity(names.len());
    for (name, joined) in names.into_iter().zip(futures::future::join_all(handles).await) {
        let report = joined.context("Polling task panicked")??;
        reports.push((name, report));
    }

    let results = port.results(&code).await?;

    let output = match args.format {
        OutputFormat::Text => ConsoleFormatter::format_simulation(&results, &reports),
        OutputFormat::Json => {
            let participants: Vec<_> = reports
                .iter()
                .map(|(name, report)| {
                    json!({
                        "name": name,
                        "polls": report.polls,
                        "votes_cast": report.votes_cast,
                        "closes_applied": report.closes_applied,
                        "closes_replayed": report.closes_replayed,
                        "finalized_here": report.finalized_here,
                        "interrupted": report.interrupted,
                    })
                })
                .collect();
            ConsoleFormatter::format_json(&json!({
                "results": results,
                "participants": participants,
            }))
        }
    };
    println!("{}", output);

    if !results.complete {
        warn!("Session {} was not finalized", code);
        bail!("Simulation stopped before session {} was finalized", code);
    }
    Ok(())
}

/// Create the session in-process, or on `--server` when given.
async fn open_session(
    config: &FileConfig,
    args: &SimulateArgs,
    stories: Vec<StoryDraft>,
) -> Result<(Arc<dyn PlanningPokerPort>, SessionCode)> {
    if let Some(server) = &args.server {
        return open_remote_session(server, args, stories).await;
    }

    let service = Arc::new(build_service(
        config,
        Arc::new(SessionRegistry::new()),
        event_logger(config),
    ));
    let mut input = CreateSessionInput::new(args.title.as_str(), stories);
    if let Some(mode) = args.mode {
        input = input.with_mode(mode);
    }
    let summary = service.create_session(input).await?;
    let port: Arc<dyn PlanningPokerPort> = service;
    Ok((port, summary.code))
}

#[cfg(feature = "http-client")]
async fn open_remote_session(
    server: &str,
    args: &SimulateArgs,
    stories: Vec<StoryDraft>,
) -> Result<(Arc<dyn PlanningPokerPort>, SessionCode)> {
    let client = poker_infrastructure::HttpPokerClient::new(server)?;
    let summary = client.create_session(&args.title, &stories, args.mode).await?;
    info!("Created session {} on {}", summary.code, server);
    let port: Arc<dyn PlanningPokerPort> = Arc::new(client);
    Ok((port, summary.code))
}

#[cfg(not(feature = "http-client"))]
async fn open_remote_session(
    server: &str,
    _args: &SimulateArgs,
    _stories: Vec<StoryDraft>,
) -> Result<(Arc<dyn PlanningPokerPort>, SessionCode)> {
    bail!("Cannot reach {}: built without the http-client feature", server)
}

fn load_stories(path: &Path) -> Result<Vec<StoryDraft>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read story list {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Story list {} is not valid JSON", path.display()))?;
    Ok(parse_story_list(&value)?)
}

/// Player `i` spreads out on round 0 of each story, then everyone plays the
/// same card.
fn script_for(i: usize, story_count: usize) -> ScriptedVotes {
    (0..story_count).fold(ScriptedVotes::new(Card::Unknown), |votes, story| {
        let first = Card::Number(SPREAD[(i + story) % SPREAD.len()]);
        let agreed = Card::Number(SPREAD[story % SPREAD.len()]);
        votes.with_story(story, vec![first, agreed])
    })
}
