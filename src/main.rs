use clap::{Parser, Subcommand};
use simple_blog::worker::{HttpNetwork, MemoryCacheStorage, Request, ServiceWorker, WorkerConfig};
use simple_blog::{config, content, images, output, search, sitemap, slug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Parser)]
#[command(name = "simple-blog")]
#[command(about = "Offline cache engine, search and path tools for a static blog")]
#[command(long_about = "\
Offline cache engine, search and path tools for a static blog

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  └── posts/
      ├── dividend-etfs.md         # +++ TOML front matter +++, then markdown
      └── 2024/
          └── bitcoin-halving.md   # Nested directories are fine

Cache partitions (tiered profile):
  static-<version>   .css .js .woff .woff2 .ttf .eot .otf   cache-first, 30 days
  images-<version>   .png .jpg .jpeg .gif .webp .svg .ico   cache-first, 7 days
  runtime-<version>  .html .htm .json, pages                network-first, 1 hour

Run 'simple-blog gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show which caching strategy the worker applies to a URL
    Route {
        /// Absolute URL, or a path resolved against site.url
        url: String,
        /// Treat the request as a page navigation
        #[arg(long)]
        navigate: bool,
        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,
    },
    /// Search posts, ranked by relevance
    Search {
        query: String,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest tags, categories and title words for a partial query
    Suggest {
        query: String,
        /// Maximum suggestions; 0 uses the default
        #[arg(long, default_value_t = search::DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
    },
    /// Convert a tag or title into a URL slug
    Slugify { text: String },
    /// Resolve a content image path and its optimized variant
    ImagePath {
        src: String,
        #[arg(long, default_value_t = i64::from(images::DEFAULT_OPTIMIZED_WIDTH))]
        width: i64,
    },
    /// Print sitemap.xml
    Sitemap,
    /// Print robots.txt
    Robots,
    /// Install and activate the worker against a live origin
    Probe {
        /// Origin to warm from; defaults to site.url
        #[arg(long)]
        origin: Option<String>,
        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },
    /// Validate config and posts without producing output
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Route {
            url,
            navigate,
            method,
        } => {
            let config = config::load_config(&cli.source)?;
            let worker_config =
                WorkerConfig::from_settings(Url::parse(&config.site.url)?, &config.worker);
            let url = worker_config.origin().join(&url)?;
            let request = if navigate {
                Request::navigate(url)
            } else {
                Request::get(url)
            }
            .with_method(&method);
            let strategy = worker_config.router.route(&request);
            output::print_route(request.url.as_str(), &strategy);
        }
        Command::Search { query, json } => {
            let posts = content::load_posts(&posts_dir(&cli.source))?;
            let results = search::search_posts_with_score(&posts, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                output::print_search_results(&results);
            }
        }
        Command::Suggest { query, limit } => {
            let posts = content::load_posts(&posts_dir(&cli.source))?;
            for suggestion in search::search_suggestions(&posts, &query, limit) {
                println!("{}", suggestion);
            }
        }
        Command::Slugify { text } => {
            println!("{}", slug::slugify_tag(&text));
        }
        Command::ImagePath { src, width } => {
            println!("{}", images::resolve_content_image_path(&src));
            println!("{}", images::optimized_image_path(&src, width));
        }
        Command::Sitemap => {
            let config = config::load_config(&cli.source)?;
            let posts = content::load_posts(&posts_dir(&cli.source))?;
            println!(
                "{}",
                sitemap::sitemap_xml(&config.site, &config.sitemap.static_pages, &posts)
            );
        }
        Command::Robots => {
            let config = config::load_config(&cli.source)?;
            print!("{}", sitemap::robots_txt(&config.site, &config.robots));
        }
        Command::Probe { origin, timeout } => {
            let config = config::load_config(&cli.source)?;
            let origin = Url::parse(origin.as_deref().unwrap_or(&config.site.url))?;
            let worker = ServiceWorker::new(
                WorkerConfig::from_settings(origin, &config.worker),
                Arc::new(MemoryCacheStorage::new()),
                Arc::new(HttpNetwork::new(Duration::from_secs(timeout))?),
            );
            let install = worker.install().await;
            let activate = worker.activate().await;
            output::print_probe(&worker.config().static_partition, &install, &activate);
            if !install.failed.is_empty() {
                return Err(format!("{} core assets failed to cache", install.failed.len()).into());
            }
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            config::load_config(&cli.source)?;
            let posts = content::load_posts(&posts_dir(&cli.source))?;
            output::print_posts(&posts);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn posts_dir(source: &Path) -> PathBuf {
    source.join("posts")
}
