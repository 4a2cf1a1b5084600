use std::path::PathBuf;

use clap::Parser;

use tabelo::document::DocumentUrl;

#[derive(Debug, Parser)]
#[command(
    name = "tabelo",
    version,
    about = "Tabelo - an open source table editor",
    long_about = None
)]
pub struct Cli {
    /// Documents to open at start-up (local paths or URLs).
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// Use this settings file instead of the per-user one.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Log filter, for example `debug` or `tabelo=trace`.
    #[arg(long = "log-level", value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Append log lines to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn startup_urls(&self) -> Vec<DocumentUrl> {
        self.files
            .iter()
            .map(|arg| DocumentUrl::from_user_input(arg))
            .filter(|url| !url.is_empty())
            .collect()
    }
}
