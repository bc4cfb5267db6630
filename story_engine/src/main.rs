#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** storyc **
//! Compile, export and play multilingual branching stories.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use story_engine::style::StoryStyle;
use story_engine::{ExportFormat, STORYC_VERSION, compile_story, export_file, load_source, run_story};

#[derive(Parser)]
#[command(name = "storyc", author, version, about = "Compile and play multilingual branching stories.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story in the terminal.
    Run {
        /// Story document to play.
        file: PathBuf,
    },
    /// Export a standalone C program.
    #[command(alias = "export-c")]
    Export {
        /// Story document to compile.
        file: PathBuf,
        /// Path of the generated C source.
        out: PathBuf,
    },
    /// Export Twine passages in one language.
    ExportTwee {
        /// Story document to compile.
        file: PathBuf,
        /// Path of the generated .twee file.
        out: PathBuf,
        /// Language code declared in the document.
        language: String,
    },
    /// Export the choice graph as Graphviz DOT.
    ExportGraph {
        /// Story document to compile.
        file: PathBuf,
        /// Path of the generated .dot file.
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file } => {
            info!("Start: loading story from {}", file.display());
            let src = load_source(&file)?;
            let story = compile_story(&src, &file)?;
            info!("Story loaded successfully.");

            println!("{}", format!("storyc {STORYC_VERSION}").title_style());
            println!("{}", "Type `help` for the list of commands.".notice_style());
            run_story(&story).with_context(|| format!("while playing {}", file.display()))
        },
        Commands::Export { file, out } => export_file(&file, &out, ExportFormat::C),
        Commands::ExportTwee { file, out, language } => {
            export_file(&file, &out, ExportFormat::Twee { language: &language })
        },
        Commands::ExportGraph { file, out } => export_file(&file, &out, ExportFormat::Graph),
    }
}
