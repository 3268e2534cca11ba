use clap::{Parser, Subcommand};
use depicts::language::{EnvLocale, StaticLanguagePreference};
use depicts::{DepictedItem, DepictionResolver, WikibaseClient, WikibaseConfig};
use log::{info, LevelFilter};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "depicts")]
#[command(about = "Search Wikibase entities that media can depict")]
struct Args {
    /// MediaWiki action api of the Wikibase instance
    #[arg(long, default_value = "https://www.wikidata.org/w/api.php")]
    api: String,

    #[arg(long, default_value = "https://query.wikidata.org/sparql")]
    sparql_endpoint: String,

    /// Language of labels and descriptions (default: en)
    #[arg(long)]
    app_language: Option<String>,

    /// Log more, can be repeated
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Free text search
    Search {
        query: String,

        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },
    /// Resolve ids ex. "Q146|Q144"
    Entities { ids: String },
    /// Resolve the `?item` bindings of a SPARQL query
    Sparql { query: String },
}

#[derive(Serialize)]
struct DepictionResponse<'a> {
    id: &'a str,
    name: &'a str,
    description: &'a str,
}

impl<'a> From<&'a DepictedItem> for DepictionResponse<'a> {
    fn from(item: &'a DepictedItem) -> Self {
        Self {
            id: item.id(),
            name: item.name(),
            description: item.description(),
        }
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut clog = colog::default_builder();
    clog.filter(None, log_level(args.verbose));
    clog.init();

    let config = WikibaseConfig::default()
        .with_api_endpoint(&args.api)?
        .with_sparql_endpoint(&args.sparql_endpoint)?;
    info!("Using wikibase api {}", config.api_endpoint);

    let resolver = DepictionResolver::new(
        WikibaseClient::new(config)?,
        StaticLanguagePreference(args.app_language),
        EnvLocale,
    );

    let items = match args.command {
        Command::Search {
            query,
            limit,
            offset,
        } => resolver.search_for_depictions(&query, limit, offset).await?,
        Command::Entities { ids } => resolver.resolve_ids(ids.split('|')).await?,
        Command::Sparql { query } => {
            let response = resolver.service().query_sparql(&query).await?;
            resolver.to_depictions(&response).await?
        }
    };

    let response: Vec<DepictionResponse> = items.iter().map(DepictionResponse::from).collect();
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
