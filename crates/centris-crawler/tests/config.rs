use centris_crawler::{CrawlerConfig, OnError};

#[test]
fn defaults() {
    let conf = CrawlerConfig::default();

    assert_eq!(2, conf.retry_times);
    assert_eq!(16, conf.concurrent_downloads);
    assert_eq!(OnError::SkipAndLog, conf.on_dl_error);
    assert!(conf.handle_sigint);
    assert!(conf.should_retry(503));
    assert!(conf.should_retry(429));
    assert!(!conf.should_retry(404));
}

#[test]
fn partial_yaml_keeps_defaults() {
    let yaml = r#"
userAgent: centris-test
retryTimes: 5
onDlError: Fail
retryHttpCodes: [500]
"#;
    let conf: CrawlerConfig = serde_yaml::from_str(yaml).unwrap();

    assert_eq!("centris-test", conf.user_agent);
    assert_eq!(5, conf.retry_times);
    assert_eq!(OnError::Fail, conf.on_dl_error);
    assert!(conf.should_retry(500));
    assert!(!conf.should_retry(503));
    assert_eq!(10_000, conf.page_buffer);
    assert_eq!(OnError::SkipAndLog, conf.on_scrap_error);
}

#[test]
fn timeout_in_seconds() {
    let conf = CrawlerConfig {
        download_timeout: 1.5,
        ..Default::default()
    };

    assert_eq!(1500, conf.timeout().as_millis());
}
