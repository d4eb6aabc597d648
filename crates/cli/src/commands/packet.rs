use storefront_core::parse_filter_packet;

use crate::commands::{CommandResult, EXIT_INPUT};

pub fn run(payload: &str) -> CommandResult {
    match parse_filter_packet(payload) {
        Ok(Some(filters)) => {
            CommandResult::success_with_data("packet", "filter packet decoded", &filters)
        }
        Ok(None) => CommandResult::success("packet", "message carries no [FILTER] tag"),
        Err(error) => {
            CommandResult::failure("packet", "invalid_packet", error.to_string(), EXIT_INPUT)
        }
    }
}
