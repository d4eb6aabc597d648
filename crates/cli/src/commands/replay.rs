use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::{Deserialize, Serialize};
use storefront_core::{
    DataPacket, FilterChange, FilterSession, FilterState, FilterSummary, ManualFilterEdit,
    PacketOutcome, Product, TranscriptMessage, TranscriptOutcome,
};

use crate::commands::{load_config_and_catalog, CommandResult, EXIT_INPUT};

#[derive(Debug, Args)]
pub struct ReplayArgs {
    #[arg(help = "JSON-lines file of transcript, data, edit and clear events")]
    pub transcript: PathBuf,
    #[arg(long, help = "Read products from this JSON file instead of the configured source")]
    pub catalog: Option<PathBuf>,
}

/// One line of a replay file, e.g.
/// `{"kind":"transcript","id":"m1","text":"...","is_from_agent":true}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReplayEvent {
    Transcript(TranscriptMessage),
    Data {
        #[serde(default)]
        topic: Option<String>,
        payload: String,
    },
    Edit(ManualFilterEdit),
    Clear,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StepOutcome {
    Transcript(TranscriptOutcome),
    Packet(PacketOutcome),
    Change(FilterChange),
}

#[derive(Debug, Serialize)]
struct ReplayStep {
    line: usize,
    kind: &'static str,
    outcome: StepOutcome,
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    steps: Vec<ReplayStep>,
    filters: FilterState,
    summary: FilterSummary,
    products: Vec<Product>,
}

pub fn run(args: ReplayArgs) -> CommandResult {
    let events = match read_events(&args.transcript) {
        Ok(events) => events,
        Err(message) => {
            return CommandResult::failure("replay", "invalid_input", message, EXIT_INPUT)
        }
    };

    let (config, catalog) = match load_config_and_catalog("replay", args.catalog) {
        Ok(loaded) => loaded,
        Err(result) => return result,
    };

    let mut session = FilterSession::new(config.session);
    let steps: Vec<ReplayStep> =
        events.into_iter().map(|(line, event)| apply_event(&mut session, line, event)).collect();

    let products = session.visible_products(catalog.products());
    let summary = FilterSummary::describe(session.filters(), catalog.len(), products.len());
    let message = format!("replayed {} events; {}", steps.len(), summary.counts);
    let report = ReplayReport { steps, filters: session.filters().clone(), summary, products };
    CommandResult::success_with_data("replay", message, &report)
}

fn apply_event(session: &mut FilterSession, line: usize, event: ReplayEvent) -> ReplayStep {
    let (kind, outcome) = match event {
        ReplayEvent::Transcript(message) => {
            ("transcript", StepOutcome::Transcript(session.on_transcript(&message)))
        }
        ReplayEvent::Data { topic, payload } => {
            let mut packet = DataPacket::from_text(payload);
            packet.topic = topic;
            ("data", StepOutcome::Packet(session.on_data_packet(&packet)))
        }
        ReplayEvent::Edit(edit) => ("edit", StepOutcome::Change(session.apply_manual(edit))),
        ReplayEvent::Clear => ("clear", StepOutcome::Change(session.clear_all())),
    };
    ReplayStep { line, kind, outcome }
}

/// Blank lines are skipped; line numbers are 1-based.
fn read_events(path: &Path) -> Result<Vec<(usize, ReplayEvent)>, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("could not read `{}`: {error}", path.display()))?;

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<ReplayEvent>(line)
                .map(|event| (index + 1, event))
                .map_err(|error| format!("line {}: {error}", index + 1))
        })
        .collect()
}
