use super::*;
use crate::common::error::Error;
use crate::test_support::{self as mock, MockProvider};
use std::fs;
use tempfile::TempDir;

const HEADER: &str = "Address,Suburb / Town,APA number,ACC number";

fn pipeline(provider: &MockProvider, timeout: Duration) -> Pipeline<HereGeocoder> {
    let config = GeocodeConfig {
        request_timeout: timeout,
        provider_url: provider.url(),
        ..GeocodeConfig::default()
    };
    Pipeline::here(&config, SecretString::from("secret"), FieldNames::default()).expect("pipeline")
}

/// Writes `rows` under the standard header and returns `(dir, input, output)`.
fn fixture(rows: &[&str]) -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("apcc_list.csv");
    let output = dir.path().join("apcc_list_geocoded.csv");
    let mut body = format!("{HEADER}\n");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(&input, body).expect("write input");
    (dir, input, output)
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}

/// Leading house number of a query, `"12 Test St, Town"` -> `12`.
fn house_number(query: &str) -> u64 {
    query
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn single_record_gets_first_candidate_coordinates() {
    let provider = MockProvider::start(|_| mock::found(-33.8, 151.2)).await;
    let (_dir, input, output) = fixture(&["1 Main St,Springfield,5,2"]);

    let summary = pipeline(&provider, Duration::from_secs(5))
        .run_file(&input, &output)
        .await
        .expect("run");

    assert_eq!(
        read(&output),
        format!("{HEADER},Latitude,Longitude\n1 Main St,Springfield,5,2,-33.8,151.2\n")
    );
    assert_eq!(summary.records, 1);
    assert_eq!(summary.found, 1);
    assert_eq!(summary.output.as_deref(), Some(output.as_path()));
    assert_eq!(provider.requests().await[0].query, "1 Main St, Springfield");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn equal_primary_key_orders_by_secondary() {
    let provider = MockProvider::start(|query| {
        if query.starts_with("9 ") {
            mock::found(9.0, 9.0)
        } else {
            mock::found(1.0, 1.0)
        }
    })
    .await;
    let (_dir, input, output) = fixture(&["9 Nine St,Town,2,9", "1 One St,Town,2,1"]);

    pipeline(&provider, Duration::from_secs(5))
        .run_file(&input, &output)
        .await
        .expect("run");

    assert_eq!(
        read(&output),
        format!("{HEADER},Latitude,Longitude\n1 One St,Town,2,1,1.0,1.0\n9 Nine St,Town,2,9,9.0,9.0\n")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_input_writes_header_only_without_requests() {
    let provider = MockProvider::start(|_| mock::found(0.0, 0.0)).await;
    let (_dir, input, output) = fixture(&[]);

    let summary = pipeline(&provider, Duration::from_secs(5))
        .run_file(&input, &output)
        .await
        .expect("run");

    assert_eq!(read(&output), format!("{HEADER},Latitude,Longitude\n"));
    assert_eq!(summary.records, 0);
    assert_eq!(provider.request_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn output_order_ignores_completion_order() {
    let rows: Vec<String> = (0..12)
        .map(|n| format!("{n} Test St,Town,{},{}", 3 - n % 4, n))
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();

    let fast_first = MockProvider::start(|q| {
        mock::found(1.0, 2.0).set_delay(Duration::from_millis(house_number(q) * 15))
    })
    .await;
    let slow_first = MockProvider::start(|q| {
        mock::found(1.0, 2.0).set_delay(Duration::from_millis((12 - house_number(q)) * 15))
    })
    .await;

    let (_a, input_a, output_a) = fixture(&rows);
    let (_b, input_b, output_b) = fixture(&rows);
    pipeline(&fast_first, Duration::from_secs(5))
        .run_file(&input_a, &output_a)
        .await
        .expect("run a");
    pipeline(&slow_first, Duration::from_secs(5))
        .run_file(&input_b, &output_b)
        .await
        .expect("run b");

    let first = read(&output_a);
    assert_eq!(first, read(&output_b));
    assert_eq!(first.lines().count(), 13);

    let keys: Vec<(i64, i64)> = first
        .lines()
        .skip(1)
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            (fields[2].parse().expect("apa"), fields[3].parse().expect("acc"))
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn provider_timeout_only_blanks_the_slow_record() {
    let provider = MockProvider::start(|query| {
        if query.starts_with("2 ") {
            mock::found(2.0, 2.0).set_delay(Duration::from_secs(5))
        } else {
            let n = house_number(query) as f64;
            mock::found(n, n)
        }
    })
    .await;
    let (_dir, input, output) =
        fixture(&["1 Test St,Town,1,1", "2 Test St,Town,1,2", "3 Test St,Town,1,3"]);

    let summary = pipeline(&provider, Duration::from_millis(300))
        .run_file(&input, &output)
        .await
        .expect("run");

    assert_eq!(
        read(&output),
        format!(
            "{HEADER},Latitude,Longitude\n\
             1 Test St,Town,1,1,1.0,1.0\n\
             2 Test St,Town,1,2,,\n\
             3 Test St,Town,1,3,3.0,3.0\n"
        )
    );
    assert_eq!(summary.found, 2);
    assert_eq!(summary.failed, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blank_address_is_never_sent_and_bad_ids_sort_first() {
    let provider = MockProvider::start(|_| mock::found(5.0, 6.0)).await;
    let (_dir, input, output) = fixture(&["7 Test St,Town,1,1", ",,x,"]);

    let summary = pipeline(&provider, Duration::from_secs(5))
        .run_file(&input, &output)
        .await
        .expect("run");

    assert_eq!(
        read(&output),
        format!("{HEADER},Latitude,Longitude\n,,x,,,\n7 Test St,Town,1,1,5.0,6.0\n")
    );
    assert_eq!(provider.request_count().await, 1);
    assert_eq!(summary.unaddressable, 1);
    assert_eq!(summary.coerced_sort_keys, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn not_found_and_server_errors_keep_the_row() {
    let provider = MockProvider::start(|query| {
        if query.starts_with("1 ") {
            mock::empty()
        } else {
            mock::status(503)
        }
    })
    .await;
    let (_dir, input, output) = fixture(&["1 Test St,Town,1,1", "2 Test St,Town,1,2"]);

    let summary = pipeline(&provider, Duration::from_secs(5))
        .run_file(&input, &output)
        .await
        .expect("run");

    assert_eq!(
        read(&output),
        format!("{HEADER},Latitude,Longitude\n1 Test St,Town,1,1,,\n2 Test St,Town,1,2,,\n")
    );
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.failed, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_input_fails_before_any_request() {
    let provider = MockProvider::start(|_| mock::found(0.0, 0.0)).await;
    let dir = TempDir::new().expect("temp dir");
    let output = dir.path().join("out.csv");

    let err = pipeline(&provider, Duration::from_secs(5))
        .run_file(&dir.path().join("missing.csv"), &output)
        .await
        .expect_err("missing input");

    assert!(matches!(err, Error::InputNotFound { .. }));
    assert!(!output.exists());
    assert_eq!(provider.request_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unwritable_output_fails_before_any_request() {
    let provider = MockProvider::start(|_| mock::found(0.0, 0.0)).await;
    let (dir, input, _) = fixture(&["1 Main St,Springfield,5,2"]);
    let output = dir.path().join("missing-dir").join("out.csv");

    let err = pipeline(&provider, Duration::from_secs(5))
        .run_file(&input, &output)
        .await
        .expect_err("unwritable output");

    assert!(matches!(err, Error::OutputWrite { .. }));
    assert_eq!(provider.request_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn extra_columns_pass_through_unchanged() {
    let provider = MockProvider::start(|_| mock::found(-1.5, 2.25)).await;
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out.csv");
    fs::write(
        &input,
        "Name,Address,Suburb / Town,Phone,APA number,ACC number\n\
         \"Lab, North\",1 Main St,Springfield,(02) 5550 1234,0005,02\n",
    )
    .expect("write input");

    pipeline(&provider, Duration::from_secs(5))
        .run_file(&input, &output)
        .await
        .expect("run");

    assert_eq!(
        read(&output),
        "Name,Address,Suburb / Town,Phone,APA number,ACC number,Latitude,Longitude\n\
         \"Lab, North\",1 Main St,Springfield,(02) 5550 1234,0005,02,-1.5,2.25\n"
    );
}
