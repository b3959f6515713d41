//! Command line interface definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "feedmirror")]
#[command(about = "Mirrors Instagram posts and YouTube video metadata into a local database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the background scheduler (default)
    Run,

    /// Run one Instagram fetch cycle and exit
    FetchInstagram,

    /// Run one YouTube refresh cycle and exit
    RefreshYoutube {
        /// Refresh at most this many videos (overrides YOUTUBE_MAX_VIDEOS)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Register a YouTube video for mirroring
    AddVideo {
        /// External video id (the `v=` parameter)
        #[arg(long)]
        video_id: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
