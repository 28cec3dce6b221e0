use std::path::PathBuf;

use agora_core::{DataFiles, Format};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "agora")]
#[command(version)]
#[command(about = "A small social network in your terminal")]
pub struct Config {
    /// Directory holding users.txt and posts.txt
    #[arg(long, env = "AGORA_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Record format of the data files: `lines` or `json`
    #[arg(long, env = "AGORA_FORMAT", default_value_t = Format::Json)]
    pub format: Format,
}

impl Config {
    pub fn data_files(&self) -> DataFiles {
        DataFiles::new(&self.data_dir, self.format)
    }
}
