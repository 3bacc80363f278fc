use std::future::Future;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Error, Result};
use futures::{future, stream, StreamExt};
use lazy_static::lazy_static;
use reqwest::header::USER_AGENT;

use crate::config::{CrawlerConfig, OnError};
use crate::error::FetchError;
use crate::scrapable::{PageLocation, Scrapable, ScrapingContext};

lazy_static! {
    static ref HTTP_CLI: reqwest::Client = reqwest::ClientBuilder::new()
        .gzip(true)
        .deflate(true)
        .build()
        .unwrap();
}

const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Page {
    page: String,
    ctx: ScrapingContext,
}

async fn try_download(config: &CrawlerConfig, url: &str) -> Result<Page, FetchError> {
    let resp = HTTP_CLI
        .get(url)
        .header(USER_AGENT, &config.user_agent)
        .timeout(config.timeout())
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = resp.url().to_string();
    let page = resp.text().await.map_err(|source| FetchError::Decode {
        url: url.to_string(),
        source,
    })?;

    let ctx = ScrapingContext::with_location(PageLocation::Url(url.to_string()))
        .redirected_to(final_url);
    Ok(Page { page, ctx })
}

fn is_retryable(config: &CrawlerConfig, err: &FetchError) -> bool {
    match err {
        FetchError::Status { status, .. } => config.should_retry(*status),
        FetchError::Transport { source, .. } => source.is_timeout() || source.is_connect(),
        FetchError::Decode { .. } => true,
    }
}

async fn download(config: &CrawlerConfig, url: &str) -> Result<Page, FetchError> {
    let mut attempt = 0;
    loop {
        match try_download(config, url).await {
            Ok(page) => return Ok(page),
            Err(e) if attempt < config.retry_times && is_retryable(config, &e) => {
                attempt += 1;
                log::warn!("Retrying ({attempt}/{}) got: {e}", config.retry_times);
                tokio::time::sleep(RETRY_BACKOFF * attempt as u32).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn until_err<T, E>(
    err: &mut &mut Result<(), E>,
    item: Result<T, E>,
) -> impl Future<Output = Option<T>> {
    match item {
        Ok(item) => future::ready(Some(item)),
        Err(e) => {
            **err = Err(e);
            future::ready(None)
        }
    }
}

/// Downloads every seed page and feeds them, one at a time, to a single scraper.
///
/// The scraper runs on its own thread so that parsing never blocks downloads,
/// its finalizer is always called once the last page (or a stop signal) went through.
pub async fn crawl_site<T>(crawler_conf: &CrawlerConfig, scraper_conf: &T::Config) -> Result<()>
where
    T: Scrapable + Send + 'static,
{
    let mut scraper = <T as Scrapable>::new(scraper_conf)?;
    let urls = scraper.seed()?;
    let total = urls.len();

    log::info!(
        "Crawling {total} pages with user agent: {}",
        crawler_conf.user_agent
    );

    let (tx_stop, rx_stop) = crossbeam_channel::bounded::<()>(1);
    let (tx_page, rx_page) = crossbeam_channel::bounded::<Page>(crawler_conf.page_buffer.max(1));

    // Worker

    let on_scrap_error = crawler_conf.on_scrap_error;
    let worker = thread::Builder::new()
        .name("scraper".into())
        .spawn(move || {
            let mut run = || {
                let mut scraped = 0;
                loop {
                    crossbeam_channel::select! {
                        recv(rx_page) -> page => {
                            if let Ok(Page { page, ctx }) = page {
                                let location = ctx.location().clone();
                                match scraper.scrap(page, ctx) {
                                    Ok(()) => scraped += 1,
                                    Err(e) => match on_scrap_error {
                                        OnError::SkipAndLog => {
                                            log::error!("Skipping scrap for page {location} got: {e}");
                                        }
                                        OnError::Fail => return Err(e),
                                    },
                                }
                            } else {
                                return Ok::<usize, Error>(scraped)
                            }
                        },
                        recv(rx_stop) -> _ => return Ok(scraped)
                    }
                }
            };
            let res = run();
            scraper.finalizer();
            res
        })?;
    let worker = async move {
        tokio::task::spawn_blocking(move || {
            worker
                .join()
                .map_err(|_| anyhow!("Scraper worker panicked"))?
        })
        .await?
    };

    // Downloader

    let downloader = async move {
        let stream = stream::iter(urls)
            .map(|url| async move { download(crawler_conf, &url).await })
            .buffer_unordered(crawler_conf.concurrent_downloads.max(1));

        match crawler_conf.on_dl_error {
            OnError::Fail => {
                let mut err = Ok::<(), FetchError>(());
                stream
                    .scan(&mut err, until_err)
                    .map(|page| tx_page.send(page).is_ok())
                    .take_while(|sent| future::ready(*sent))
                    .collect::<Vec<_>>()
                    .await;
                err.map_err(Error::from)
            }
            OnError::SkipAndLog => {
                stream
                    .filter_map(|dl| async move {
                        dl.map_err(|e| log::warn!("Skipping {} got: {e}", e.url())).ok()
                    })
                    .map(|page| tx_page.send(page).is_ok())
                    .take_while(|sent| future::ready(*sent))
                    .collect::<Vec<_>>()
                    .await;
                Ok(())
            }
        }
    };

    // Run until all pages went through, or until interrupted

    let downloaded = if crawler_conf.handle_sigint {
        tokio::select! {
            res = downloader => res,
            _ = tokio::signal::ctrl_c() => {
                tx_stop.send(()).ok();
                Err(anyhow!("Interrupted"))
            }
        }
    } else {
        downloader.await
    };

    let scraped = worker.await;
    downloaded?;
    let scraped = scraped?;

    log::info!("Scraped {scraped} out of {total} pages");

    Ok(())
}
