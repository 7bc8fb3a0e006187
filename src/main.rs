use anyhow::Result;
use clap::Parser;
use bnafetch::application::DiscoverUseCase;
use bnafetch::archive::BusinessNetworkParser;
use bnafetch::config::Config;
use bnafetch::http::build_http_client;
use bnafetch::registry::NpmRegistry;

/// bnafetch - Business Network Archive fetcher
///
/// Finds business networks published to the npm registry by the trusted
/// maintainer, picks the newest release of each that supports the running
/// Composer version, downloads it and reads the business network archive it
/// ships.
///
/// Log verbosity is controlled with RUST_LOG (e.g. RUST_LOG=bnafetch=debug).
#[derive(Parser, Debug)]
#[command(author, version = env!("BNAFETCH_VERSION"), about)]
struct Cli {
    /// Registry base URL (defaults to https://registry.npmjs.org)
    #[arg(long, env = "BNAFETCH_REGISTRY_URL", value_name = "URL")]
    registry_url: Option<String>,

    /// Platform version releases must support (defaults to 0.9.0)
    #[arg(long, env = "BNAFETCH_PLATFORM_VERSION", value_name = "VERSION")]
    platform_version: Option<String>,

    /// Only trust packages published by this maintainer
    #[arg(long, env = "BNAFETCH_MAINTAINER", value_name = "USER")]
    maintainer: Option<String>,

    /// Required package keyword (repeatable; replaces the default keywords)
    #[arg(
        long = "keyword",
        env = "BNAFETCH_KEYWORDS",
        value_delimiter = ',',
        value_name = "KEYWORD"
    )]
    keywords: Vec<String>,

    /// File extension of the archives to extract from each tarball
    #[arg(long, env = "BNAFETCH_EXTENSION", value_name = "EXT")]
    extension: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,bnafetch=info"),
    )
    .init();
    let cli = Cli::parse();

    let config = Config::from_overrides(
        cli.registry_url,
        cli.platform_version.as_deref(),
        cli.maintainer,
        cli.keywords,
        cli.extension,
    )?;

    let registry = NpmRegistry::from_http_client(build_http_client()?, &config);
    let parser = BusinessNetworkParser;

    let report = DiscoverUseCase::new(&registry, &parser, &config)
        .run()
        .await?;

    for option in &report.options {
        println!("{}", option.summary());
    }
    Ok(())
}
