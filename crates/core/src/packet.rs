//! Explicit `[FILTER:<query>]` packets delivered on the data channel.
//!
//! Unlike free-text extraction, a packet describes the complete filter state:
//! a key that is missing or empty clears that field.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::filters::{FilterState, SortOrder};

pub const CHAT_TOPIC: &str = "chat";

static FILTER_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[FILTER:([^\]]+)\]").expect("filter tag pattern compiles"));

#[derive(Debug, Error)]
pub enum PacketError {
    #[error("filter packet query `{query}` could not be decoded: {source}")]
    Decode {
        query: String,
        #[source]
        source: serde_urlencoded::de::Error,
    },
}

/// Raw message from the real-time data channel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPacket {
    #[serde(default)]
    pub topic: Option<String>,
    pub payload: Vec<u8>,
}

impl DataPacket {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { topic: None, payload: text.into().into_bytes() }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Only untagged packets and the chat topic carry filter metadata.
    pub fn is_chat(&self) -> bool {
        self.topic.as_deref().map_or(true, |topic| topic == CHAT_TOPIC)
    }

    pub fn decoded(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Finds the first `[FILTER:...]` segment in `message` and decodes it into a
/// full filter state. Returns `Ok(None)` when the message carries no tag.
pub fn parse_filter_packet(message: &str) -> Result<Option<FilterState>, PacketError> {
    let Some(query) = FILTER_TAG.captures(message).and_then(|captures| captures.get(1)) else {
        return Ok(None);
    };
    decode_filter_query(query.as_str()).map(Some)
}

/// Decodes a `key=value&...` filter query. Missing keys are unset, so the
/// result is always a complete state.
pub fn decode_filter_query(query: &str) -> Result<FilterState, PacketError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
        .map_err(|source| PacketError::Decode { query: query.to_string(), source })?;

    let state = FilterState {
        search_term: text_value(&pairs, "search_term"),
        category: text_value(&pairs, "category"),
        min_price: price_value(&pairs, "min_price"),
        max_price: price_value(&pairs, "max_price"),
        sort_by: text_value(&pairs, "sort_by")
            .filter(|value| !value.eq_ignore_ascii_case("default"))
            .map(|value| SortOrder::parse(&value)),
    };

    tracing::debug!(
        event_name = "packet.decoded",
        query,
        search_term = state.search_term.as_deref().unwrap_or_default(),
        category = state.category.as_deref().unwrap_or_default(),
        min_price = state.min_price,
        max_price = state.max_price,
        sort_by = state.sort_by.as_ref().map(|sort| sort.as_str()).unwrap_or_default(),
        "decoded filter query"
    );
    Ok(state)
}

/// First occurrence of a key wins; later duplicates are ignored.
fn raw_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(name, _)| name == key).map(|(_, value)| value.as_str())
}

fn text_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    raw_value(pairs, key).map(str::trim).filter(|value| !value.is_empty()).map(str::to_string)
}

fn price_value(pairs: &[(String, String)], key: &str) -> Option<u64> {
    let raw = raw_value(pairs, key)?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u64>() {
        Ok(price) if price > 0 => Some(price),
        _ => {
            tracing::warn!(
                event_name = "packet.price_rejected",
                key,
                value = raw,
                "ignoring non-positive or malformed price"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_filter_query, parse_filter_packet, DataPacket};
    use crate::domain::filters::{FilterState, SortOrder};

    #[test]
    fn empty_value_clears_and_present_value_sets() {
        let state = parse_filter_packet("[FILTER:search_term=&category=electronics]")
            .expect("decode")
            .expect("tag present");
        assert_eq!(state, FilterState { category: Some("electronics".to_string()), ..FilterState::default() });
    }

    #[test]
    fn decodes_every_field_with_percent_encoding() {
        let state = parse_filter_packet(
            "Applied filters. [FILTER:search_term=smart%20plug&category=smart-home&min_price=500&max_price=2000&sort_by=price_low_to_high] Enjoy!",
        )
        .expect("decode")
        .expect("tag present");

        assert_eq!(
            state,
            FilterState {
                search_term: Some("smart plug".to_string()),
                category: Some("smart-home".to_string()),
                min_price: Some(500),
                max_price: Some(2000),
                sort_by: Some(SortOrder::PriceAsc),
            }
        );
    }

    #[test]
    fn plus_decodes_as_space() {
        let state = parse_filter_packet("[FILTER:search_term=echo+dot]").expect("decode").expect("tag present");
        assert_eq!(state.search_term.as_deref(), Some("echo dot"));
    }

    #[test]
    fn default_sort_and_bad_prices_clear() {
        let state = parse_filter_packet("[FILTER:sort_by=default&max_price=abc&min_price=0]")
            .expect("decode")
            .expect("tag present");
        assert!(state.is_empty());
    }

    #[test]
    fn first_tag_and_first_key_win() {
        let state = parse_filter_packet(
            "[FILTER:category=electronics&category=smart-home] [FILTER:category=home-security]",
        )
        .expect("decode")
        .expect("tag present");
        assert_eq!(state.category.as_deref(), Some("electronics"));
    }

    #[test]
    fn untagged_message_is_not_a_packet() {
        assert!(parse_filter_packet("just chatting").expect("decode").is_none());
        assert!(parse_filter_packet("[FILTER:]").expect("decode").is_none());
    }

    #[test]
    fn unknown_sort_value_is_preserved_for_the_engine() {
        let state = parse_filter_packet("[FILTER:sort_by=popularity]").expect("decode").expect("tag present");
        assert_eq!(state.sort_by, Some(SortOrder::Unrecognized("popularity".to_string())));
    }

    #[test]
    fn data_packet_topics() {
        assert!(DataPacket::from_text("hi").is_chat());
        assert!(DataPacket::from_text("hi").with_topic("chat").is_chat());
        assert!(!DataPacket::from_text("hi").with_topic("lk.transcription").is_chat());
        assert_eq!(DataPacket { topic: None, payload: vec![0x66, 0xff] }.decoded(), "f\u{fffd}");
    }

    #[test]
    fn bare_query_decodes_without_a_tag() {
        assert_eq!(decode_filter_query("").expect("empty query"), FilterState::default());

        let state = decode_filter_query("max_price=3000&search_term=plug").expect("decode");
        assert_eq!(state.max_price, Some(3000));
        assert_eq!(state.search_term.as_deref(), Some("plug"));
    }
}
