//! CLI module for Archive RAG
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `ingest`: store and index one local file
//! - `evaluate`: score an answer described in a JSON file

pub mod evaluate;
pub mod ingest;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Archive RAG - grounded question answering over historical documents
#[derive(Parser)]
#[command(name = "archive-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Store and index a local .txt, .md or .pdf file, then report the chunk count
    Ingest {
        /// File to ingest
        path: PathBuf,
    },

    /// Evaluate an answer for factual grounding
    Evaluate {
        /// JSON file holding {query, answer, context_chunks, sources}
        file: PathBuf,
    },
}

/// Load `.env` and configuration, then install logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&logging::LoggingConfig::from(&config.logging));

    Ok(config)
}
