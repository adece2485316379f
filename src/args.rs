use clap::{Parser, ValueEnum};
use exhibitor_scout::{ExtractionOptions, PaginationMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "exhibitor-scout")]
#[command(about = "Extracts exhibitor listings from trade-show directory pages")]
#[command(version)]
pub struct Args {
    /// Directory page to extract exhibitors from
    pub url: String,

    /// Look up websites for exhibitors listed without one
    #[arg(long)]
    pub find_websites: bool,

    /// Maximum number of exhibitors to look up websites for
    #[arg(long, default_value_t = 10)]
    pub max_website_searches: usize,

    /// Follow pagination (auto: only for templates known to paginate)
    #[arg(long, value_enum, default_value_t = PaginationArg::Auto)]
    pub pagination: PaginationArg,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print every event as a JSON line instead of one response at the end
    #[arg(long)]
    pub stream: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PaginationArg {
    Auto,
    On,
    Off,
}

impl From<PaginationArg> for PaginationMode {
    fn from(arg: PaginationArg) -> Self {
        match arg {
            PaginationArg::Auto => PaginationMode::Auto,
            PaginationArg::On => PaginationMode::Enabled,
            PaginationArg::Off => PaginationMode::Disabled,
        }
    }
}

impl Args {
    /// Request-boundary defaults with the command-line overrides applied
    pub fn options(&self) -> ExtractionOptions {
        ExtractionOptions::request()
            .with_find_websites(self.find_websites)
            .with_max_website_searches(self.max_website_searches)
            .with_pagination(self.pagination.into())
    }
}
