use anyhow::Context;
use clap::Parser;
use store_locator::config::cli::Command;
use store_locator::config::toml_config::TomlConfig;
use store_locator::core::export;
use store_locator::core::{CatalogDataSource, ConfigProvider, StoreSource};
use store_locator::utils::{logger, validation::Validate};
use store_locator::{
    CatalogSelection, CliConfig, DirectoryService, DirectorySession, HttpImageFetcher,
    HttpStoreSource, ImageLoader, InMemoryStoreSource, LocatorError, Product,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if let Some(path) = config.config.clone() {
        tracing::info!("📁 Loading configuration from: {}", path);
        let file = TomlConfig::from_file(&path)
            .with_context(|| format!("failed to load config file '{}'", path))?;
        file.validate()
            .with_context(|| format!("invalid config file '{}'", path))?;
        config.merge_file(&file)?;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let result = match config.seed.clone() {
        Some(seed) => {
            let source = InMemoryStoreSource::from_json_file(&seed)
                .await
                .with_context(|| format!("failed to load seed file '{}'", seed))?;
            run(&config, source).await
        }
        None => {
            let source = HttpStoreSource::from_config(&config).with_headers(config.headers.clone());
            run(&config, source).await
        }
    };

    match result {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e);
            // transient failures get their own exit code so scripts can retry
            std::process::exit(if e.is_transient() { 2 } else { 1 });
        }
    }
}

/// Returns `Ok(false)` when the requested store was not found.
async fn run<S: StoreSource>(config: &CliConfig, source: S) -> Result<bool, LocatorError> {
    let format = config.output_format();
    let directory = DirectoryService::new(source);

    match &config.command {
        Command::List => {
            let stores = directory.list_all().await?;
            println!("{}", export::render(&stores, format)?);
            Ok(true)
        }
        Command::Search { query } => {
            let stores = directory.search(query).await?;
            println!("{}", export::render(&stores, format)?);
            Ok(true)
        }
        Command::Products { store, query } => {
            let Some(products) = select_products(directory, store, query.as_deref()).await? else {
                return Ok(false);
            };
            println!("{}", export::render_products(&products, format)?);
            Ok(true)
        }
        Command::Images { store, query } => {
            let Some(products) = select_products(directory, store, query.as_deref()).await? else {
                return Ok(false);
            };

            let fetcher = HttpImageFetcher::from_config(config)?;
            let loader = ImageLoader::new(fetcher, config.concurrent_fetches());
            let slots = loader.load(&products).await;

            for (product, slot) in products.iter().zip(&slots) {
                match slot {
                    Some(bytes) => println!(
                        "{}\t{}\t{} bytes",
                        product.name(),
                        product.image_ref(),
                        bytes.len()
                    ),
                    None => println!("{}\t{}\tunavailable", product.name(), product.image_ref()),
                }
            }
            Ok(true)
        }
    }
}

async fn select_products<S: StoreSource>(
    directory: DirectoryService<S>,
    store: &str,
    query: Option<&str>,
) -> Result<Option<Vec<Product>>, LocatorError> {
    let session = DirectorySession::new(directory);
    if let Some(query) = query {
        session.search(query).await?;
    } else {
        session.refresh().await?;
    }

    let catalog = CatalogSelection::new();
    let view = session.current();
    catalog.select(store, &view);

    if catalog.selected_store().is_none() {
        eprintln!("Store '{}' not found in {}", store, view.provenance);
        return Ok(None);
    }
    Ok(Some(catalog.products()))
}
