use std::io;
use std::path::PathBuf;

use centris_crawler::{crawl_site, CrawlerConfig, OnError, PageLocation, ScrapingContext};
use centris_scraper::{
    extract, parse_ascii_char, reconcile, scrap_page, CentrisScraper, CentrisScraperConfig,
    CsvWriterConfig, ListingPage, OutputFormat, LISTING_SCHEMA,
};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use tokio::runtime;

const DEFAULT_LOG_FILTER: &str = "centris_scraper=info,centris_crawler=warn";

/// Centris listings scraper
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    #[clap(subcommand)]
    pub cmd: SubCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommand {
    #[clap(name = "crawl")]
    Crawl(CrawlArgs),
    #[clap(name = "scrap")]
    Scrap(ScrapArgs),
    #[clap(hide = true)]
    Completion,
}

/// Download listing pages and append their records to the output file
#[derive(Debug, clap::Args)]
pub struct CrawlArgs {
    /// Path to the file listing the pages to scrap, one URL per line
    #[clap(parse(from_os_str), long, short, default_value = "start_urls.txt")]
    pub urls: PathBuf,
    /// Path to the output file, listings already in it are skipped
    #[clap(parse(from_os_str), long, short, default_value = "out.csv")]
    pub output_file: PathBuf,
    /// Output file format
    #[clap(arg_enum, long, default_value = "csv")]
    pub format: OutputFormat,
    /// Output CSV delimiter, a single ASCII character
    #[clap(long, default_value = ",", parse(try_from_str = parse_ascii_char))]
    pub delimiter: char,
    /// Optional default crawler yaml configuration file
    #[clap(env = "CENTRIS_CRAWLER_CONFIG", parse(from_os_str), long)]
    pub crawler_config: Option<PathBuf>,
    /// Override crawler's user agent
    #[clap(long)]
    pub user_agent: Option<String>,
    /// Override crawler's page buffer size
    #[clap(long)]
    pub page_buffer: Option<usize>,
    /// Override crawler's maximum concurrent page downloads
    #[clap(long)]
    pub concurrent_downloads: Option<usize>,
    /// Override crawler's number of retries per page
    #[clap(long)]
    pub retry_times: Option<usize>,
    /// Override crawler's download timeout, in seconds
    #[clap(long)]
    pub download_timeout: Option<f32>,
    /// No SIGINT handling, scraper finalizer won't be called
    #[clap(long)]
    pub no_sigint: bool,
    /// Override crawler's download error handling strategy
    #[clap(arg_enum, long)]
    pub on_dl_error: Option<OnError>,
    /// Override crawler's scrap error handling strategy
    #[clap(arg_enum, long)]
    pub on_scrap_error: Option<OnError>,
    /// When quiet no logs are outputted
    #[clap(long, short)]
    pub quiet: bool,
}

impl TryFrom<&CrawlArgs> for CrawlerConfig {
    type Error = anyhow::Error;

    fn try_from(args: &CrawlArgs) -> Result<Self, Self::Error> {
        let mut conf = if let Some(file) = args.crawler_config.as_ref().map(fs_err::File::open) {
            serde_yaml::from_reader(file?)?
        } else {
            CrawlerConfig::default()
        };
        if let Some(user_agent) = &args.user_agent {
            conf.user_agent = user_agent.to_string();
        }
        if let Some(page_buffer) = args.page_buffer {
            conf.page_buffer = page_buffer;
        }
        if let Some(concurrent_downloads) = args.concurrent_downloads {
            conf.concurrent_downloads = concurrent_downloads;
        }
        if let Some(retry_times) = args.retry_times {
            conf.retry_times = retry_times;
        }
        if let Some(download_timeout) = args.download_timeout {
            conf.download_timeout = download_timeout;
        }
        if let Some(on_dl_error) = args.on_dl_error {
            conf.on_dl_error = on_dl_error;
        }
        if let Some(on_scrap_error) = args.on_scrap_error {
            conf.on_scrap_error = on_scrap_error;
        }
        if args.no_sigint {
            conf.handle_sigint = false;
        }
        Ok(conf)
    }
}

pub fn crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let crawler_conf = (&args).try_into()?;
    let scraper_conf = CentrisScraperConfig {
        urls_file: args.urls,
        output_file: args.output_file,
        format: args.format,
        csv_writer: CsvWriterConfig {
            delimiter: args.delimiter,
            ..Default::default()
        },
    };
    let rt = runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(crawl_site::<CentrisScraper>(&crawler_conf, &scraper_conf))
}

/// Scrap a single listing page and print its record as JSON to stdout
#[derive(Debug, clap::Args)]
#[clap(group = clap::ArgGroup::new("page").required(true))]
pub struct ScrapArgs {
    /// A local html page to scrap, its file name being the listing ID
    #[clap(group = "page", parse(from_os_str), long)]
    pub file: Option<PathBuf>,
    /// A distant html page to scrap
    #[clap(group = "page", long)]
    pub url: Option<String>,
    /// Custom user agent to download the page
    #[clap(long, conflicts_with = "file")]
    pub ua: Option<String>,
    /// Listing ID, instead of the one found in the URL or file name
    #[clap(long)]
    pub id: Option<String>,
}

pub fn scrap(args: ScrapArgs) -> anyhow::Result<()> {
    let (page, ctx) = if let Some(url) = args.url {
        let mut builder = reqwest::blocking::ClientBuilder::new();
        builder = builder.user_agent(args.ua.unwrap_or_else(|| CrawlerConfig::default().user_agent));
        let client = builder.build()?;
        let resp = client.get(&url).send()?.error_for_status()?;
        let final_url = resp.url().to_string();
        let page = resp.text()?;
        let ctx = ScrapingContext::with_location(PageLocation::Url(url)).redirected_to(final_url);
        (page, ctx)
    } else if let Some(path) = args.file {
        let page = fs_err::read_to_string(&path)?;
        (page, ScrapingContext::with_location(PageLocation::Path(path)))
    } else {
        anyhow::bail!("Missing `url` or `file`");
    };

    let record = match args.id {
        Some(id) => {
            let page = ListingPage::parse(&page, ctx.final_url(), id);
            reconcile(extract(&page), &LISTING_SCHEMA, page.url())
        }
        None => scrap_page(&page, &ctx)?,
    };
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.cmd {
        SubCommand::Crawl(args) => {
            if !args.quiet {
                init_logging();
            }
            crawl(args)
        }
        SubCommand::Scrap(args) => {
            init_logging();
            scrap(args)
        }
        SubCommand::Completion => {
            generate(Shell::Bash, &mut Args::command(), "centris", &mut io::stdout());
            Ok(())
        }
    }
}
