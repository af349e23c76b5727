use clap::Parser;
use docvault::application::add_documents::AddRequest;
use docvault::application::delete::DeleteRequest;
use docvault::application::get::GetRequest;
use docvault::application::query::QueryRequest;
use docvault::cli::commands::{Cli, Commands};
use docvault::cli::{demo, parse};
use docvault::config::Config;
use docvault::DocVault;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_env("DOCVAULT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run_command(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn open() -> Result<DocVault, Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    Ok(DocVault::new(&config)?)
}

async fn run_command(cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Demo => {
            let vault = DocVault::ephemeral()?;
            let results = demo::run(&vault).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Create { name, metadata } => {
            let metadata = parse::parse_metadata(metadata.as_deref())?;
            let collection = open()?.create_collection(&name, metadata)?;
            println!("{}", serde_json::to_string_pretty(&collection.info()?)?);
        }
        Commands::Collections => {
            let collections = open()?.list_collections()?;
            println!("{}", serde_json::to_string_pretty(&collections)?);
        }
        Commands::Drop { name } => {
            open()?.delete_collection(&name)?;
            println!("Deleted collection {name}");
        }
        Commands::Add { collection, json } => {
            let request = parse::parse_batch(&json)?;
            let count = request.ids.len();
            open()?.get_collection(&collection)?.add(request).await?;
            println!("Added {count} documents to {collection}");
        }
        Commands::Upsert { collection, json } => {
            let request = parse::parse_batch(&json)?;
            let count = request.ids.len();
            open()?.get_collection(&collection)?.upsert(request).await?;
            println!("Upserted {count} documents into {collection}");
        }
        Commands::Update { collection, json } => {
            let request: AddRequest = parse::parse_batch(&json)?;
            let count = request.ids.len();
            open()?.get_collection(&collection)?.update(request).await?;
            println!("Updated {count} documents in {collection}");
        }
        Commands::Query {
            collection,
            texts,
            n_results,
            where_filter,
            where_document,
            include,
        } => {
            let mut request = QueryRequest::texts(texts).n_results(n_results);
            request.where_filter = parse::parse_where(where_filter.as_deref())?;
            request.where_document = parse::parse_where_document(where_document.as_deref())?;
            if let Some(include) = parse::parse_include(include.as_deref())? {
                request = request.include(include);
            }
            let results = open()?.get_collection(&collection)?.query(&request).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Get {
            collection,
            ids,
            where_filter,
            where_document,
            limit,
            offset,
            include,
        } => {
            let mut request = GetRequest {
                ids,
                where_filter: parse::parse_where(where_filter.as_deref())?,
                where_document: parse::parse_where_document(where_document.as_deref())?,
                limit,
                offset,
                ..Default::default()
            };
            if let Some(include) = parse::parse_include(include.as_deref())? {
                request = request.include(include);
            }
            let results = open()?.get_collection(&collection)?.get(&request)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Count { collection } => {
            let count = open()?.get_collection(&collection)?.count()?;
            println!("{count}");
        }
        Commands::Peek { collection, limit } => {
            let results = open()?.get_collection(&collection)?.peek(limit)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::Delete {
            collection,
            ids,
            where_filter,
            where_document,
        } => {
            let request = DeleteRequest {
                ids,
                where_filter: parse::parse_where(where_filter.as_deref())?,
                where_document: parse::parse_where_document(where_document.as_deref())?,
            };
            let removed = open()?.get_collection(&collection)?.delete(&request)?;
            println!("{}", serde_json::to_string_pretty(&removed)?);
        }
    }
    Ok(())
}
