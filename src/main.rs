use clap::Parser;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};
use visearch::cli::commands::{Cli, Commands};
use visearch::domain::values::product_id::ProductId;
use visearch::infrastructure::config::Config;
use visearch::ViSearch;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let vs = match Config::from_env().and_then(|config| ViSearch::new(&config)) {
        Ok(vs) => vs,
        Err(e) => {
            eprintln!("Error initializing visearch: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(vs, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(vs: ViSearch, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Add {
            name,
            description,
            price,
            image,
        } => {
            let bytes = image.as_deref().map(read_image).transpose()?;
            let product = vs
                .add_product(name, description, price, bytes.as_deref())
                .await?;
            print_json(&product)?;
        }
        Commands::Get { id } => {
            let product = vs.get_product(parse_id(&id)?)?;
            print_json(&product)?;
        }
        Commands::List { limit, offset } => {
            let products = vs.list_products(Some(limit), Some(offset))?;
            print_json(&products)?;
        }
        Commands::Update {
            id,
            name,
            description,
            price,
        } => {
            let product = vs.update_product(parse_id(&id)?, name, description, price)?;
            print_json(&product)?;
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            vs.delete_product(id)?;
            print_json(&Deleted { deleted: id })?;
        }
        Commands::Attach { id, image } => {
            let bytes = read_image(&image)?;
            let product = vs.attach_image(parse_id(&id)?, &bytes).await?;
            print_json(&product)?;
        }
        Commands::Embed { image } => {
            let report = vs.embed_image(&read_image(&image)?).await?;
            print_json(&report)?;
        }
        Commands::Search { image, k } => {
            let hits = vs.search_by_image(&read_image(&image)?, Some(k)).await?;
            print_json(&hits)?;
        }
        Commands::Reindex { all } => {
            let report = vs.reindex(all).await?;
            print_json(&report)?;
        }
        Commands::Stats => {
            print_json(&vs.stats()?)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Deleted {
    deleted: ProductId,
}

fn read_image(path: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

fn parse_id(s: &str) -> Result<ProductId, String> {
    s.parse()
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
