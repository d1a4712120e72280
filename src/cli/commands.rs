use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "visearch", about = "Product catalog with visual similarity search")]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a product, optionally with an image to embed
    Add {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        /// Image file for the product
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Show one product
    Get { id: String },
    /// List products ordered by id
    List {
        #[arg(long, default_value = "20")]
        limit: usize,
        #[arg(long, default_value = "0")]
        offset: usize,
    },
    /// Update name, description or price
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Delete a product and its stored image
    Delete { id: String },
    /// Replace a product's image and recompute its embedding
    Attach { id: String, image: PathBuf },
    /// Print the embedding of an image
    Embed { image: PathBuf },
    /// Find the catalog products most similar to an image
    Search {
        image: PathBuf,
        /// Number of results
        #[arg(short, long, default_value = "5")]
        k: usize,
    },
    /// Embed products that have an image but no vector
    Reindex {
        /// Re-embed every product with an image
        #[arg(long)]
        all: bool,
    },
    /// Show catalog statistics
    Stats,
}
