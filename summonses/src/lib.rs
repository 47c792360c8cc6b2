pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_page_report, emit_report, expand_output_path, load_page, parse_category, parse_format,
};

// Re-export harvest functionality from summonses-core
pub use summonses_core::harvest::{
    Category, HarvestOptions, HarvestReport, execute_harvest, extract_category_links,
};
