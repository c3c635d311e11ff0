mod common;

use std::fs;

use common::{article, fast_config, FakePage, FakeSession, ScriptedTransport};
use gleaner_engine::{
    read_url_list, write_report, BatchRunner, FetchOrchestrator, MemorySink, RecordStatus,
    ReportError, ReportOptions, UrlColumn,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn runner(transport: ScriptedTransport) -> BatchRunner<ScriptedTransport> {
    BatchRunner::new(FetchOrchestrator::new(fast_config(), transport))
}

#[tokio::test]
async fn one_record_per_url_in_input_order() {
    let ok = "http://example.com/ok";
    let missing = "http://example.com/missing";
    let stub = "http://example.com/stub";
    let transport = ScriptedTransport::new()
        .respond(ok, 200, &article(300))
        .respond(missing, 404, "")
        .respond(stub, 200, "<p>JavaScript is required</p>");
    let mut session = FakeSession::new().with_page(stub, FakePage::new(article(40)));
    let mut sink = MemorySink::default();

    let urls = vec![ok.to_string(), "   ".to_string(), missing.to_string(), stub.to_string()];
    let summary = runner(transport).run(&urls, &mut session, &mut sink).await;

    assert_eq!((summary.total, summary.success, summary.failure), (3, 2, 1));
    let records = sink.into_records();
    let order: Vec<_> = records.iter().map(|r| (r.url.as_str(), r.status)).collect();
    assert_eq!(
        order,
        vec![
            (ok, RecordStatus::Success),
            (missing, RecordStatus::Failure),
            (stub, RecordStatus::Success),
        ]
    );
    assert_eq!(records[0].content_preview.chars().count(), 1000);
    assert_eq!(records[1].error.as_deref(), Some("404 Not Found"));
    assert!(records[1].content_preview.is_empty());
    assert!(records[2].error.is_none());
}

#[tokio::test]
async fn preview_length_is_configurable() {
    let url = "http://example.com/ok";
    let transport = ScriptedTransport::new().respond(url, 200, &article(30));
    let mut sink = MemorySink::default();

    runner(transport)
        .with_preview_chars(9)
        .run(&[url.to_string()], &mut FakeSession::new(), &mut sink)
        .await;

    assert_eq!(sink.records()[0].content_preview, "word word");
}

#[tokio::test]
async fn browser_is_reused_across_urls() {
    let first = "http://example.com/one";
    let second = "http://example.com/two";
    let transport = ScriptedTransport::new()
        .respond(first, 403, "")
        .respond(second, 403, "");
    let mut session = FakeSession::new()
        .with_page(first, FakePage::new(article(30)))
        .with_page(second, FakePage::new(article(30)));
    let mut sink = MemorySink::default();

    let urls = [first.to_string(), second.to_string()];
    let summary = runner(transport).run(&urls, &mut session, &mut sink).await;

    assert_eq!(summary.success, 2);
    assert_eq!(session.visited(), vec![first, second]);
}

#[tokio::test]
async fn report_files_are_written() {
    let ok = "http://example.com/ok";
    let missing = "http://example.com/missing";
    let transport = ScriptedTransport::new()
        .respond(ok, 200, &article(30))
        .respond(missing, 404, "");
    let mut sink = MemorySink::default();
    let urls = [ok.to_string(), missing.to_string()];
    let summary = runner(transport)
        .run(&urls, &mut FakeSession::new(), &mut sink)
        .await;

    let temp = TempDir::new().unwrap();
    let options = ReportOptions {
        output_dir: temp.path().join("out"),
        results_filename: "results.csv".to_string(),
        manifest_filename: Some("summary.json".to_string()),
    };
    let paths = write_report(sink.records(), &summary, &options).unwrap();

    let csv = fs::read_to_string(&paths.results).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(r#""url","status","error","content_preview""#));
    assert_eq!(
        lines.next(),
        Some(format!(r#""{ok}","SUCCESS","","{}""#, vec!["word"; 30].join(" ")).as_str())
    );
    assert_eq!(
        lines.next(),
        Some(format!(r#""{missing}","FAILURE","404 Not Found","""#).as_str())
    );
    assert_eq!(lines.next(), None);

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(paths.manifest.unwrap()).unwrap()).unwrap();
    assert_eq!(manifest["total"], 2);
    assert_eq!(manifest["success_rate"], 50.0);
    assert_eq!(manifest["failures"][0]["url"], missing);
}

#[test]
fn empty_batch_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let options = ReportOptions {
        output_dir: temp.path().to_path_buf(),
        ..ReportOptions::default()
    };
    let err = write_report(&[], &Default::default(), &options).unwrap_err();
    assert!(matches!(err, ReportError::Empty));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn input_list_feeds_the_runner() {
    let csv = "name,website\nAcme,https://acme.example\nBeta,https://beta.example\nAcme again,https://acme.example\n";
    assert_eq!(
        read_url_list(csv, UrlColumn::default()),
        vec!["https://acme.example".to_string(), "https://beta.example".to_string()]
    );
}
