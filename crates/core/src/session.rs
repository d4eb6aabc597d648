//! Per-conversation filter state and the gating rules that decide which agent
//! messages reach the extractor.
//!
//! Both inbound sources (transcribed agent speech and explicit filter packets)
//! overwrite the same [`FilterState`]. Whichever arrives last wins; there is no
//! priority between them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::filters::{ExtractedFilters, FilterState, ManualFilterEdit};
use crate::domain::product::Product;
use crate::engine::ProductFilterEngine;
use crate::extraction::FilterExtractor;
use crate::merge::FilterChange;
use crate::packet::{parse_filter_packet, DataPacket};

/// One transcribed chat message. Streaming transcription re-delivers the same
/// `id` with progressively longer `text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub id: String,
    pub text: String,
    pub is_from_agent: bool,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl TranscriptMessage {
    pub fn from_agent(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), is_from_agent: true, timestamp: Utc::now() }
    }

    pub fn from_user(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { is_from_agent: false, ..Self::from_agent(id, text) }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Identity and length of the last message handed to the extractor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedMarker {
    pub message_id: String,
    pub length: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotFromAgent,
    AlreadyProcessed,
    TooShort,
    InsufficientGrowth,
    Incomplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum GateDecision {
    Process,
    Skip(SkipReason),
}

/// Thresholds, in characters, for deciding whether a message is ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageGate {
    pub min_message_chars: usize,
    pub complete_message_chars: usize,
    pub min_growth_chars: usize,
}

impl Default for MessageGate {
    fn default() -> Self {
        Self { min_message_chars: 20, complete_message_chars: 150, min_growth_chars: 30 }
    }
}

impl MessageGate {
    /// Skipped messages leave the marker alone so a longer version of the
    /// same streamed message can still be processed later.
    pub fn evaluate(&self, marker: Option<&ProcessedMarker>, message: &TranscriptMessage) -> GateDecision {
        if !message.is_from_agent {
            return GateDecision::Skip(SkipReason::NotFromAgent);
        }

        let length = message.char_len();
        let same_message = marker.filter(|marker| marker.message_id == message.id);
        if same_message.is_some_and(|marker| marker.length == length) {
            return GateDecision::Skip(SkipReason::AlreadyProcessed);
        }
        if length < self.min_message_chars {
            return GateDecision::Skip(SkipReason::TooShort);
        }
        if same_message.is_some_and(|marker| length <= marker.length + self.min_growth_chars) {
            return GateDecision::Skip(SkipReason::InsufficientGrowth);
        }
        if !ends_with_terminal_punctuation(&message.text) && length <= self.complete_message_chars {
            return GateDecision::Skip(SkipReason::Incomplete);
        }
        GateDecision::Process
    }
}

fn ends_with_terminal_punctuation(text: &str) -> bool {
    text.trim_end().ends_with(['.', '!', '?'])
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranscriptOutcome {
    pub decision: GateDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted: Option<ExtractedFilters>,
    pub change: FilterChange,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "change", rename_all = "snake_case")]
pub enum PacketOutcome {
    IgnoredTopic,
    NoFilterTag,
    Malformed,
    Applied(FilterChange),
}

/// Filter state for one shopping conversation plus the bookkeeping needed to
/// process a streamed transcript exactly once per meaningful update.
#[derive(Clone, Debug, Default)]
pub struct FilterSession {
    filters: FilterState,
    marker: Option<ProcessedMarker>,
    gate: MessageGate,
    extractor: FilterExtractor,
    engine: ProductFilterEngine,
}

impl FilterSession {
    pub fn new(gate: MessageGate) -> Self {
        Self { gate, ..Self::default() }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn marker(&self) -> Option<&ProcessedMarker> {
        self.marker.as_ref()
    }

    pub fn gate(&self) -> &MessageGate {
        &self.gate
    }

    pub fn on_transcript(&mut self, message: &TranscriptMessage) -> TranscriptOutcome {
        let decision = self.gate.evaluate(self.marker.as_ref(), message);
        if let GateDecision::Skip(reason) = decision {
            tracing::trace!(
                event_name = "session.transcript.skipped",
                message_id = %message.id,
                ?reason,
                "transcript message not ready for extraction"
            );
            return TranscriptOutcome { decision, extracted: None, change: FilterChange::Unchanged };
        }

        let extracted = self.extractor.extract(&message.text);
        let change = self.filters.merge_extracted(&extracted);
        self.marker = Some(ProcessedMarker { message_id: message.id.clone(), length: message.char_len() });

        tracing::info!(
            event_name = "session.transcript.processed",
            message_id = %message.id,
            length = message.char_len(),
            ?change,
            "processed agent message"
        );
        TranscriptOutcome { decision, extracted: Some(extracted), change }
    }

    /// Packets replace the whole filter state. Malformed packets are logged
    /// and leave the current state in place.
    pub fn on_data_packet(&mut self, packet: &DataPacket) -> PacketOutcome {
        if !packet.is_chat() {
            tracing::debug!(
                event_name = "session.packet.ignored_topic",
                topic = packet.topic.as_deref().unwrap_or_default(),
                "ignoring data packet on non-chat topic"
            );
            return PacketOutcome::IgnoredTopic;
        }

        match parse_filter_packet(&packet.decoded()) {
            Ok(Some(state)) => {
                let change = self.replace_filters(state);
                tracing::info!(event_name = "session.packet.applied", ?change, "applied explicit filter packet");
                PacketOutcome::Applied(change)
            }
            Ok(None) => PacketOutcome::NoFilterTag,
            Err(error) => {
                tracing::warn!(
                    event_name = "session.packet.malformed",
                    error = %error,
                    "ignoring malformed filter packet"
                );
                PacketOutcome::Malformed
            }
        }
    }

    pub fn apply_manual(&mut self, edit: ManualFilterEdit) -> FilterChange {
        let before = self.filters.clone();
        self.filters.apply_edit(edit);
        if self.filters == before {
            FilterChange::Unchanged
        } else {
            FilterChange::Updated
        }
    }

    /// Clears every filter and forgets the processed marker, so the latest
    /// agent message may be parsed again.
    pub fn clear_all(&mut self) -> FilterChange {
        self.marker = None;
        self.replace_filters(FilterState::default())
    }

    pub fn visible_products(&self, catalog: &[Product]) -> Vec<Product> {
        self.engine.apply(catalog, &self.filters)
    }

    fn replace_filters(&mut self, state: FilterState) -> FilterChange {
        if self.filters == state {
            return FilterChange::Unchanged;
        }
        let change = if state.is_empty() { FilterChange::Cleared } else { FilterChange::Updated };
        self.filters = state;
        change
    }
}
