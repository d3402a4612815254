//! Command-line interface definitions for binman.
//!
//! This module contains all CLI argument parsing structures using clap's derive macros.
//! The definitions are shared between the main binary and xtask, which renders
//! them into man pages.

#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Main CLI structure for binman.
#[derive(Parser)]
#[command(
    name = "binman",
    version = crate::VERSION,
    about = "Manage programs in $XDG_BIN_HOME",
    long_about = "Manage programs in $XDG_BIN_HOME (default: ~/.local/bin).\n\n\
                  Programs are installed as relative symlinks, copies, or moved files."
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show install path
    Path,

    /// Install programs
    #[command(visible_alias = "i")]
    Install {
        /// Programs to install
        #[arg(required = true, value_name = "PROGRAM")]
        programs: Vec<String>,

        /// Overwrite existing programs
        #[arg(short, long)]
        force: bool,

        /// Copy instead of symlinking
        #[arg(short, long, conflicts_with = "move_")]
        copy: bool,

        /// Move instead of symlinking
        #[arg(short = 'm', long = "move")]
        move_: bool,

        /// Remove file extensions
        #[arg(short = 'n', long)]
        no_ext: bool,

        /// Rename single PROGRAM to NAME
        #[arg(short, long, value_name = "NAME", conflicts_with = "no_ext")]
        rename: Option<String>,
    },

    /// List programs
    ///
    /// PROGRAM can be a basename, a full path, or a symlink target path.
    #[command(visible_alias = "ls")]
    List {
        /// Programs to list (default: all)
        #[arg(value_name = "PROGRAM")]
        programs: Vec<String>,

        /// Print full paths to programs
        #[arg(short, long)]
        path: bool,

        /// Print symlink targets
        #[arg(short, long)]
        long: bool,

        /// Do not match on symlink targets
        #[arg(short, long, conflicts_with = "target")]
        direct: bool,

        /// Only match on symlink targets
        #[arg(short, long)]
        target: bool,

        /// Ignore patterns that match nothing
        #[arg(short, long)]
        quiet: bool,
    },

    /// Remove programs
    ///
    /// PROGRAM can be a basename, a full path, or a symlink target path.
    #[command(visible_alias = "rm")]
    Remove {
        /// Programs to remove
        #[arg(required = true, value_name = "PROGRAM")]
        programs: Vec<String>,

        /// Do not match on symlink targets
        #[arg(short, long, conflicts_with = "target")]
        direct: bool,

        /// Only match on symlink targets
        #[arg(short, long)]
        target: bool,

        /// Ignore patterns that match nothing
        #[arg(short, long)]
        quiet: bool,
    },

    /// Remove broken symlinks
    Prune,

    /// Check for issues
    Doctor,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
