use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use storefront_core::{
    FilterState, FilterSummary, ManualFilterEdit, Product, ProductFilterEngine, SortOrder,
};

use crate::commands::{load_config_and_catalog, CommandResult};

#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    #[arg(long, help = "Read products from this JSON file instead of the configured source")]
    pub catalog: Option<PathBuf>,
    #[arg(long, help = "Case-insensitive text matched against names and descriptions")]
    pub search: Option<String>,
    #[arg(long, help = "Category slug, e.g. home-security")]
    pub category: Option<String>,
    #[arg(long)]
    pub min_price: Option<u64>,
    #[arg(long)]
    pub max_price: Option<u64>,
    #[arg(long, help = "price_asc | price_desc | rating_desc | name_asc | name_desc")]
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
struct FilterView {
    filters: FilterState,
    summary: FilterSummary,
    products: Vec<Product>,
}

pub fn run(args: FilterArgs) -> CommandResult {
    let (_, catalog) = match load_config_and_catalog("filter", args.catalog) {
        Ok(loaded) => loaded,
        Err(result) => return result,
    };

    let mut filters = FilterState::default();
    for edit in [
        ManualFilterEdit::SearchTerm(args.search),
        ManualFilterEdit::Category(args.category),
        ManualFilterEdit::MinPrice(args.min_price),
        ManualFilterEdit::MaxPrice(args.max_price),
        ManualFilterEdit::SortBy(args.sort.as_deref().map(SortOrder::parse)),
    ] {
        filters.apply_edit(edit);
    }

    let products = ProductFilterEngine::new().apply(catalog.products(), &filters);
    let summary = FilterSummary::describe(&filters, catalog.len(), products.len());
    let message = summary.counts.clone();
    CommandResult::success_with_data("filter", message, &FilterView { filters, summary, products })
}
