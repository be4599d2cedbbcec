use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Scroll a terminal viewport through the numbered demo pages
    Run(RunArgs),

    /// Print the effective adapter config as JSON
    ShowConfig {
        #[arg(long, help = "JSON config file path")]
        config: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, help = "JSON config file path")]
    pub config: Option<String>,

    #[arg(long, help = "Overrides items_per_page from the config")]
    pub page_size: Option<usize>,

    #[arg(long, default_value_t = 1000, help = "Artificial delay of every page load")]
    pub delay_ms: u64,

    #[arg(
        long,
        default_value_t = 10,
        help = "Page that comes back one item short, ending the list"
    )]
    pub short_page: usize,

    #[arg(long, help = "Page whose first load fails")]
    pub fail_on_page: Option<usize>,

    #[arg(long, help = "Keep the placeholder after a failed load and retry")]
    pub retry_on_error: bool,

    #[arg(long, default_value_t = 10, help = "Rows visible per screen")]
    pub viewport: usize,

    #[arg(long, default_value_t = 100, help = "Maximum number of scroll steps")]
    pub max_steps: usize,
}
