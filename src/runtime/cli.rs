use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::donor::Direction;

#[derive(Parser, Debug)]
#[command(name = "tagmend", version, about = "Reconcile tags and album art across a music folder")]
pub struct Cli {
    /// Log at debug level regardless of the configured level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Give every track of each album the same (majority) cover art
    DedupeArt {
        /// Music folder to scan
        dir: PathBuf,
    },
    /// Fold standard albums into their special editions and renumber tracks
    MergeDeluxe {
        /// Music folder to scan
        dir: PathBuf,
    },
    /// Copy metadata onto a new file from the most likely donor in a folder
    Fill {
        /// Freshly downloaded file
        new_file: PathBuf,
        /// Folder holding candidate donors
        dir: PathBuf,
        /// The new file precedes the donor (track number minus one)
        #[arg(long)]
        decrement: bool,
    },
    /// Move featured artists from the artist tag to the album artist tag
    SplitArtists {
        /// Music folder to scan
        dir: PathBuf,
    },
    /// Merge deluxe editions, then make album art consistent
    Cleanup {
        /// Music folder to scan
        dir: PathBuf,
    },
    /// Print the effective configuration as TOML
    Config,
}

pub fn direction(decrement: bool) -> Direction {
    if decrement {
        Direction::Decrement
    } else {
        Direction::Increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn fill_parses_paths_and_direction() {
        let cli = Cli::parse_from(["tagmend", "-v", "fill", "new.mp3", "music", "--decrement"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Fill {
                new_file,
                dir,
                decrement,
            } => {
                assert_eq!(new_file, PathBuf::from("new.mp3"));
                assert_eq!(dir, PathBuf::from("music"));
                assert_eq!(direction(decrement), Direction::Decrement);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn folder_commands_take_a_directory() {
        let cli = Cli::parse_from(["tagmend", "merge-deluxe", "/music"]);
        assert!(matches!(cli.command, Command::MergeDeluxe { ref dir } if dir == &PathBuf::from("/music")));
        assert!(Cli::try_parse_from(["tagmend", "dedupe-art"]).is_err());
    }
}
