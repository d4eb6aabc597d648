use storefront_core::FilterExtractor;

use crate::commands::{CommandResult, EXIT_INPUT};

pub fn run(text: &str) -> CommandResult {
    if text.trim().is_empty() {
        return CommandResult::failure(
            "extract",
            "invalid_input",
            "text must not be empty",
            EXIT_INPUT,
        );
    }

    let extracted = FilterExtractor::new().extract(text);
    let message = if extracted.is_empty() {
        "no filter intent detected"
    } else if extracted.clear_all {
        "request to show all products"
    } else {
        "filters extracted"
    };
    CommandResult::success_with_data("extract", message, &extracted)
}
