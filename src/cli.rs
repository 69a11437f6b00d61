use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::member::MemberField;
use crate::source::{DEFAULT_SOURCE_URL, FileSource, HttpSource, MemberSource};

#[derive(Parser, Debug)]
#[command(name = "member-admin")]
#[command(about = "Browse, search, edit and delete members in the terminal")]
#[command(version)]
pub struct Cli {
    /// JSON endpoint returning the member list
    #[arg(long, env = "MEMBER_ADMIN_URL", default_value = DEFAULT_SOURCE_URL)]
    pub url: String,

    /// Load members from a local JSON file instead of the URL
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// HTTP timeout in seconds (default: wait indefinitely)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Column the search box starts on
    #[arg(long, value_enum, default_value_t = MemberField::Name)]
    pub column: MemberField,

    /// Theme file (key = value colours)
    #[arg(long, value_name = "PATH")]
    pub theme: Option<PathBuf>,

    /// Keybindings file (Action = Key)
    #[arg(long, value_name = "PATH")]
    pub keybinds: Option<PathBuf>,

    /// Where to write logs
    #[arg(long, env = "MEMBER_ADMIN_LOG", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level for this crate; RUST_LOG overrides it
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write default theme.conf and keybinds.conf into the config directory and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Cli {
    /// Build the configured data source: `--file` wins over `--url`.
    pub fn source(&self) -> crate::error::Result<Box<dyn MemberSource>> {
        if let Some(path) = &self.file {
            return Ok(Box::new(FileSource::new(path.clone())));
        }
        let timeout = self.timeout.map(Duration::from_secs);
        Ok(Box::new(HttpSource::new(self.url.clone(), timeout)?))
    }
}
