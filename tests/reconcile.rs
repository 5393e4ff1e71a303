//! Update check E2E tests

mod helper;

use std::sync::Arc;
use std::time::Duration;

use mockito::Server;

use helper::{StaticUpstream, create_data_dir};
use metabo_version_check::config::{UpstreamConfig, UpstreamsConfig};
use metabo_version_check::dataset::locate_dataset;
use metabo_version_check::parser::filename::parse_local_version;
use metabo_version_check::parser::types::Source;
use metabo_version_check::report::render_table;
use metabo_version_check::version::checker::{FetchPolicy, SourceStatus, reconcile};
use metabo_version_check::version::upstream::Upstream;
use metabo_version_check::version::upstreams;

const PIPELINE_FILENAME: &str = "2021-11-17_hmdb_metabolites_classy_np_lm_2025-09-21_v5.parquet";

fn policy(timeout: Duration, retries: u32) -> FetchPolicy {
    FetchPolicy {
        timeout,
        retries,
        retry_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn single_source_dataset_follows_date_ordering() {
    let local = parse_local_version("hmdb_2024-03-01.parquet").unwrap();

    for (remote, expected) in [
        ("2024-05-01", SourceStatus::Outdated),
        ("2024-03-01", SourceStatus::UpToDate),
        ("2023-01-01", SourceStatus::UpToDate),
    ] {
        let upstreams: Vec<Arc<dyn Upstream>> =
            vec![Arc::new(StaticUpstream::release(Source::Hmdb, remote))];

        let result = reconcile(&local, &upstreams, &FetchPolicy::default()).await;

        assert_eq!(result.reports.len(), 1);
        assert_eq!(result.reports[0].status, expected, "remote {}", remote);
        assert_eq!(result.reports[0].local_version.as_ref().unwrap().to_string(), "2024-03-01");
    }
}

#[tokio::test]
async fn located_dataset_is_checked_against_both_sources() {
    let data_dir = create_data_dir(&[PIPELINE_FILENAME, "notes.txt"]);
    let dataset = locate_dataset(data_dir.path()).unwrap();

    let upstreams: Vec<Arc<dyn Upstream>> = vec![
        Arc::new(StaticUpstream::release(Source::Hmdb, "2021-11-17")),
        Arc::new(StaticUpstream::release(Source::LipidMaps, "2025-10-02")),
    ];

    let result = reconcile(&dataset.version, &upstreams, &FetchPolicy::default()).await;

    assert_eq!(result.dataset, PIPELINE_FILENAME);
    assert_eq!(result.report(Source::Hmdb).unwrap().status, SourceStatus::UpToDate);
    assert_eq!(
        result.report(Source::LipidMaps).unwrap().status,
        SourceStatus::Outdated
    );
    assert!(result.update_available());
}

#[tokio::test]
async fn unreachable_source_is_retried_and_reported_without_hiding_the_other() {
    let local = parse_local_version(PIPELINE_FILENAME).unwrap();
    let hmdb = Arc::new(StaticUpstream::unreachable(Source::Hmdb));
    let upstreams: Vec<Arc<dyn Upstream>> = vec![
        hmdb.clone() as Arc<dyn Upstream>,
        Arc::new(StaticUpstream::release(Source::LipidMaps, "2025-09-21")),
    ];

    let result = reconcile(&local, &upstreams, &policy(Duration::from_secs(5), 2)).await;

    assert_eq!(hmdb.calls(), 3);

    let hmdb_report = result.report(Source::Hmdb).unwrap();
    assert_eq!(hmdb_report.status, SourceStatus::Unknown);
    assert_eq!(hmdb_report.remote_version, None);
    assert!(hmdb_report.detail.as_ref().unwrap().contains("503"));

    let lipidmaps_report = result.report(Source::LipidMaps).unwrap();
    assert_eq!(lipidmaps_report.status, SourceStatus::UpToDate);

    let table = render_table(&result);
    assert!(table.contains("ERROR: Unexpected HTTP status 503"));
    assert!(table.contains("UP TO DATE"));
}

#[tokio::test]
async fn slow_source_times_out_without_blocking_the_other() {
    let local = parse_local_version(PIPELINE_FILENAME).unwrap();
    let upstreams: Vec<Arc<dyn Upstream>> = vec![
        Arc::new(StaticUpstream::release(Source::Hmdb, "2022-06-01")),
        Arc::new(StaticUpstream::hanging(Source::LipidMaps)),
    ];

    let result = reconcile(&local, &upstreams, &policy(Duration::from_millis(50), 0)).await;

    assert_eq!(result.report(Source::Hmdb).unwrap().status, SourceStatus::Outdated);

    let lipidmaps_report = result.report(Source::LipidMaps).unwrap();
    assert_eq!(lipidmaps_report.status, SourceStatus::Unknown);
    assert!(lipidmaps_report.detail.as_ref().unwrap().starts_with("Timed out"));
}

#[tokio::test]
async fn configured_upstreams_scrape_release_pages() {
    let mut server = Server::new_async().await;
    let hmdb_mock = server
        .mock("GET", "/downloads")
        .with_status(500)
        .create_async()
        .await;
    let lipidmaps_mock = server
        .mock("GET", "/databases/lmsd/download")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(r#"<li><a href="/files/LMSD.sdf.zip">LMSD 2025-11-30 (ZIP)</a></li>"#)
        .create_async()
        .await;

    let config = UpstreamsConfig {
        hmdb: UpstreamConfig {
            enabled: true,
            url: Some(format!("{}/downloads", server.url())),
        },
        lipid_maps: UpstreamConfig {
            enabled: true,
            url: Some(format!("{}/databases/lmsd/download", server.url())),
        },
    };
    let upstreams = upstreams::from_config(&config, Duration::from_secs(5));
    let local = parse_local_version(PIPELINE_FILENAME).unwrap();

    let result = reconcile(&local, &upstreams, &policy(Duration::from_secs(5), 0)).await;

    hmdb_mock.assert_async().await;
    lipidmaps_mock.assert_async().await;

    let hmdb_report = result.report(Source::Hmdb).unwrap();
    assert_eq!(hmdb_report.status, SourceStatus::Unknown);
    assert!(hmdb_report.detail.as_ref().unwrap().contains("500"));

    let lipidmaps_report = result.report(Source::LipidMaps).unwrap();
    assert_eq!(lipidmaps_report.status, SourceStatus::Outdated);
    assert_eq!(
        lipidmaps_report.remote_version.as_ref().unwrap().to_string(),
        "2025-11-30"
    );
    assert!(lipidmaps_report.retrieved_at.is_some());
}
