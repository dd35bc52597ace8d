mod support;

use acts_engine::{
    db_types::{HealthOutcome, NewHealthcheckEntry},
    marketplace::{DocumentListing, DownloadOutcome},
    CertificateManagement,
    CertificateSyncApi,
    HealthcheckApi,
    SqliteDatabase,
};
use chrono::{DateTime, TimeZone, Utc};
use support::{accounts, act_payload, certificate, day, descriptor, fresh_db, MockSource};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()
}

fn apis(db: &SqliteDatabase, source: MockSource) -> (HealthcheckApi<SqliteDatabase>, CertificateSyncApi<SqliteDatabase, MockSource>) {
    (HealthcheckApi::new(db.clone()), CertificateSyncApi::new(db.clone(), source))
}

#[tokio::test]
async fn fresh_data_is_a_success_without_refetching() {
    let db = fresh_db().await;
    db.insert_certificates(&[certificate(1, "100", "shop-a", day(2024, 3, 1), day(2024, 3, 2))]).await.unwrap();
    // No expectations: any marketplace call fails the test
    let (health, sync) = apis(&db, MockSource::new());
    let entry = health.healthcheck_and_self_heal(&sync, &accounts(&["shop-a"]), now()).await.unwrap();
    assert_eq!(entry.outcome(), HealthOutcome::Success);
    assert!(entry.pipeline_succeeded);
    assert!(!entry.parser_failed);
    assert!(!entry.upstream_api_failed);
    assert_eq!(entry.checked_at, now());
}

#[tokio::test]
async fn upstream_outage_during_the_rerun() {
    let db = fresh_db().await;
    let mut source = MockSource::new();
    source.expect_list_documents().times(2).returning(|_, _| Ok(DocumentListing::UpstreamFailure(500)));
    source.expect_download_all().never();
    let (health, sync) = apis(&db, source);
    let entry = health.healthcheck_and_self_heal(&sync, &accounts(&["shop-a", "shop-b"]), now()).await.unwrap();
    assert_eq!(entry.outcome(), HealthOutcome::UpstreamApiFailure);
    assert_eq!((entry.pipeline_succeeded, entry.parser_failed, entry.upstream_api_failed), (false, false, true));
}

#[tokio::test]
async fn a_successful_rerun_heals_the_pipeline() {
    let db = fresh_db().await;
    let mut source = MockSource::new();
    source.expect_list_documents().times(1).returning(|_, _| Ok(DocumentListing::Documents(vec![descriptor("100")])));
    source
        .expect_download_all()
        .times(1)
        .returning(|_, _| Ok(DownloadOutcome::Payload(act_payload("100", "01.03.2024", &[(1, 10, 1), (2, 20, 1)]))));
    let (health, sync) = apis(&db, source);
    let entry = health.healthcheck_and_self_heal(&sync, &accounts(&["shop-a"]), now()).await.unwrap();
    assert_eq!(entry.outcome(), HealthOutcome::Success);
    assert!(db.has_certificates_ingested_on(day(2024, 3, 2)).await.unwrap());
}

#[tokio::test]
async fn still_no_data_after_the_rerun() {
    let db = fresh_db().await;
    let mut source = MockSource::new();
    source.expect_list_documents().returning(|_, _| Ok(DocumentListing::Documents(vec![])));
    let (health, sync) = apis(&db, source);
    let entry = health.healthcheck_and_self_heal(&sync, &accounts(&["shop-a"]), now()).await.unwrap();
    assert_eq!(entry.outcome(), HealthOutcome::InnerMethodFailure);
    assert_eq!((entry.pipeline_succeeded, entry.parser_failed, entry.upstream_api_failed), (false, true, false));
}

#[tokio::test]
async fn statuses_are_listed_newest_first() {
    let db = fresh_db().await;
    let health = HealthcheckApi::new(db);
    let base = now();
    let outcomes = [HealthOutcome::Success, HealthOutcome::UpstreamApiFailure, HealthOutcome::InnerMethodFailure];
    for (i, outcome) in outcomes.iter().enumerate() {
        let at = base + chrono::Duration::hours(i as i64);
        health.record_run(&NewHealthcheckEntry::new(at, *outcome)).await.unwrap();
    }
    let statuses = health.statuses().await.unwrap();
    let listed = statuses.iter().map(|s| s.outcome()).collect::<Vec<_>>();
    assert_eq!(listed, vec![HealthOutcome::InnerMethodFailure, HealthOutcome::UpstreamApiFailure, HealthOutcome::Success]);
    assert!(statuses[0].checked_at > statuses[1].checked_at);
}

#[tokio::test]
async fn every_recorded_run_is_listed_straight_away() {
    let db = fresh_db().await;
    let health = HealthcheckApi::new(db);
    let base = now();
    for i in 1..=20 {
        let at = base + chrono::Duration::minutes(i);
        let recorded = health.record_run(&NewHealthcheckEntry::new(at, HealthOutcome::Success)).await.unwrap();
        let statuses = health.statuses().await.unwrap();
        assert_eq!(statuses.len(), i as usize);
        assert_eq!(statuses[0], recorded);
    }
}
