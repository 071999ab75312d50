//! Command handlers that drive a coordinator from the terminal.
//!
//! Candidates and resolved addresses go to stdout; prompts and input errors
//! go to stderr alongside the logs.

use anyhow::{anyhow, bail, Context as _};
use placefill_core::{Candidate, ResolvedAddress};
use placefill_places::GooglePlacesClient;
use placefill_resolver::{ResolutionCoordinator, SearchEvent, SearchEvents};
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line of interactive input.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum InputLine {
    Query(String),
    /// 1-based index into the last printed candidate list.
    Pick(usize),
    Clear,
}

pub(crate) fn parse_line(line: &str) -> Result<InputLine, String> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(InputLine::Query(line.to_string()));
    };

    let mut words = command.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("clear"), None, None) => Ok(InputLine::Clear),
        (Some("pick"), Some(n), None) => n
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(InputLine::Pick)
            .ok_or_else(|| format!("not a candidate number: {n}")),
        (Some("pick"), _, _) => Err("usage: :pick N".to_string()),
        _ => Err(format!("unknown command: {line}")),
    }
}

pub(crate) fn format_candidate(index: usize, candidate: &Candidate) -> String {
    let source = if candidate.primary_provider_id().is_some() {
        "google"
    } else {
        "local"
    };
    if candidate.secondary_label.is_empty() {
        format!("{index:>2}. {} [{source}]", candidate.primary_label)
    } else {
        format!(
            "{index:>2}. {} ({}) [{source}]",
            candidate.primary_label, candidate.secondary_label
        )
    }
}

fn print_candidates(candidates: &[Candidate]) {
    if candidates.is_empty() {
        println!("no candidates");
        return;
    }
    for (i, candidate) in candidates.iter().enumerate() {
        println!("{}", format_candidate(i + 1, candidate));
    }
}

fn print_address(address: &ResolvedAddress) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(address)?);
    Ok(())
}

/// Runs one query and prints the first candidate set it produces.
pub(crate) async fn run_suggest(
    coordinator: &ResolutionCoordinator,
    mut events: SearchEvents,
    text: &str,
) -> anyhow::Result<()> {
    if text.is_empty() {
        bail!("query text must not be empty");
    }
    coordinator.on_query_changed(text);

    while let Some(event) = events.recv().await {
        if let SearchEvent::CandidatesUpdated(candidates) = event {
            print_candidates(&candidates);
            return Ok(());
        }
    }
    bail!("coordinator stopped before producing candidates")
}

/// Resolves a Google place id without going through a session.
pub(crate) async fn run_resolve(client: &GooglePlacesClient, place_id: &str) -> anyhow::Result<()> {
    let address = client
        .fetch_place_details(place_id)
        .await
        .with_context(|| format!("failed to fetch details for {place_id}"))?
        .ok_or_else(|| anyhow!("place {place_id} has no formatted address"))?;
    print_address(&address)
}

/// Reads queries and commands from stdin until an address is resolved or
/// input ends.
pub(crate) async fn run_interactive(
    coordinator: &ResolutionCoordinator,
    mut events: SearchEvents,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown: Vec<Candidate> = Vec::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    return Ok(());
                };
                match parse_line(&line) {
                    Ok(InputLine::Query(text)) => coordinator.on_query_changed(&text),
                    Ok(InputLine::Clear) => coordinator.on_query_changed(""),
                    Ok(InputLine::Pick(n)) => match shown.get(n - 1) {
                        Some(candidate) => coordinator.on_candidate_selected(candidate.clone()),
                        None => eprintln!("no candidate {n}; {} shown", shown.len()),
                    },
                    Err(message) => eprintln!("{message}"),
                }
            }
            event = events.recv() => {
                let Some(event) = event else {
                    return Ok(());
                };
                match event {
                    SearchEvent::CandidatesUpdated(candidates) => {
                        print_candidates(&candidates);
                        shown = candidates;
                    }
                    SearchEvent::AddressResolved(address) => print_address(&address)?,
                    SearchEvent::SessionDismissed => return Ok(()),
                }
            }
        }
    }
}
