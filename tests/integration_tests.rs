//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: options → HTTP requests → lazy record stream

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use futures::StreamExt;
use rest_collection::{
    paginate, paginate_url, transport_fn, Error, ErrorKind, NextPage, PageRequest, PageResult,
    PaginateOptions, RequestState, SequenceEvent,
};
use serde_json::{json, Value};
use std::io::Write;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn compress_gzip(body: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body).unwrap();
    encoder.finish().unwrap()
}

fn compress_deflate(body: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body).unwrap();
    encoder.finish().unwrap()
}

fn numbers(range: std::ops::RangeInclusive<i64>) -> Vec<Value> {
    range.map(Value::from).collect()
}

// ============================================================================
// Pagination Convention Tests
// ============================================================================

#[tokio::test]
async fn test_link_header_pagination_flow() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", format!("<{base}/page2>; rel='next'").as_str())
                .set_body_json(json!({"data": [1, 2, 3]})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", format!("<{base}/page3>; rel='next'").as_str())
                .set_body_json(json!({"data": [4, 5, 6]})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [7, 8]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = paginate_url(format!("{base}/page1"))
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, numbers(1..=8));
}

#[tokio::test]
async fn test_mixed_convention_flow() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [1, 2, 3], "paging": {"next": "/page2"}})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"data": [4, 5, 6], "nextLink": format!("{base}/page3")}),
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [7, 8]})))
        .mount(&mock_server)
        .await;

    let records = paginate_url(format!("{base}/page1"))
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, numbers(1..=8));
}

#[tokio::test]
async fn test_query_string_pagination_flow() {
    let mock_server = MockServer::start().await;

    for (page, items) in [("1", json!([1, 2, 3])), ("2", json!([4, 5, 6])), ("3", json!([7, 8, 9])), ("4", json!([]))] {
        Mock::given(method("GET"))
            .and(path("/items"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": items})))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let options = PaginateOptions::new().query("page", 1);
    let records = paginate(format!("{}/items", mock_server.uri()), options)
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, numbers(1..=9));
}

#[tokio::test]
async fn test_odata_and_marker_flow() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/odata"))
        .and(query_param("Marker", "m-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": ["c"]})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/odata"))
        .and(query_param("$skip", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"value": ["b"], "NextMarker": "m-1"})),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/odata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"value": ["a"], "@odata.nextLink": format!("{base}/odata?$skip=1")}),
        ))
        .mount(&mock_server)
        .await;

    let records = paginate_url(format!("{base}/odata"))
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, vec![json!("a"), json!("b"), json!("c")]);
}

#[tokio::test]
async fn test_records_path_flow() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "very": {"unusual": [{"data": [{"id": 1}, {"id": 2}]}]},
            "data": [{"id": 99}]
        })))
        .mount(&mock_server)
        .await;

    let options = PaginateOptions::new().records_path("very.unusual[0].data");
    let records = paginate(format!("{}/reports", mock_server.uri()), options)
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[tokio::test]
async fn test_custom_extractor_and_resolver_flow() {
    let mock_server = MockServer::start().await;

    for (index, ids) in [("0", json!([1, 2])), ("1", json!([3]))] {
        Mock::given(method("GET"))
            .and(path("/custom"))
            .and(query_param("pageIndex", index))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Page-Count", "2")
                    .insert_header("X-Page-Index", index)
                    .set_body_json(json!({"payload": {"rows": ids}})),
            )
            .mount(&mock_server)
            .await;
    }

    let options = PaginateOptions::new()
        .query("pageIndex", 0)
        .data(|page: &PageResult| {
            page.body
                .pointer("/payload/rows")
                .and_then(Value::as_array)
                .cloned()
        })
        .next(|page: &PageResult, _: &RequestState| {
            let index: u64 = page.meta.header("X-Page-Index").and_then(|v| v.parse().ok()).unwrap_or(0);
            let count: u64 = page.meta.header("X-Page-Count").and_then(|v| v.parse().ok()).unwrap_or(0);
            if index + 1 < count {
                NextPage::with_param("pageIndex", index + 1)
            } else {
                NextPage::Done
            }
        });

    let records = paginate(format!("{}/custom", mock_server.uri()), options)
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, vec![json!(1), json!(2), json!(3)]);
}

// ============================================================================
// Request Tests
// ============================================================================

#[tokio::test]
async fn test_default_and_custom_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(header("Accept", "application/json"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = PaginateOptions::new().header("Authorization", "Bearer test-token");
    let records = paginate(format!("{}/items", mock_server.uri()), options)
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, vec![json!(1)]);

    let requests = mock_server.received_requests().await.unwrap();
    let encoding = requests[0]
        .headers
        .get("accept-encoding")
        .and_then(|h| h.to_str().ok());
    assert_eq!(encoding, Some("gzip, deflate"));
}

#[tokio::test]
async fn test_uri_query_merged_with_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("sort", "asc"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": ["x"]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = PaginateOptions::new().query("limit", 10);
    let records = paginate(format!("{}/items?sort=asc&limit=5", mock_server.uri()), options)
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, vec![json!("x")]);
}

// ============================================================================
// Content Encoding Tests
// ============================================================================

#[tokio::test]
async fn test_gzip_pages() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    let first = serde_json::to_vec(&json!({"data": [1, 2], "meta": {"next": "/gz2"}})).unwrap();
    let second = serde_json::to_vec(&json!({"data": [3]})).unwrap();

    Mock::given(method("GET"))
        .and(path("/gz1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Encoding", "gzip")
                .set_body_bytes(compress_gzip(&first)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gz2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Encoding", "deflate")
                .set_body_bytes(compress_deflate(&second)),
        )
        .mount(&mock_server)
        .await;

    let records = paginate_url(format!("{base}/gz1"))
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, numbers(1..=3));
}

#[tokio::test]
async fn test_corrupt_gzip_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Encoding", "gzip")
                .set_body_bytes(b"definitely not gzip".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let err = paginate_url(format!("{}/broken", mock_server.uri()))
        .unwrap()
        .collect_records()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

// ============================================================================
// Failure and Cancellation Tests
// ============================================================================

#[tokio::test]
async fn test_transport_error_on_second_page() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [1, 2], "nextLink": format!("{base}/p2")})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server exploded"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [5]})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut records = paginate_url(format!("{base}/p1")).unwrap().records();
    let mut delivered = Vec::new();
    let mut errors = Vec::new();
    while let Some(item) = records.next().await {
        match item {
            Ok(record) => delivered.push(record),
            Err(e) => errors.push(e),
        }
    }

    assert_eq!(delivered, numbers(1..=2));
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::HttpStatus { status: 500, .. }));
    assert!(errors[0].is_transport());
}

#[tokio::test]
async fn test_cancel_after_second_page() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    for (page, next) in [("a", Some("b")), ("b", Some("c")), ("c", None)] {
        let mut body = json!({"data": [format!("{page}1"), format!("{page}2")]});
        if let Some(next) = next {
            body["paging"] = json!({"next": format!("{base}/{next}")});
        }
        Mock::given(method("GET"))
            .and(path(format!("/{page}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(if page == "c" { 0 } else { 1 })
            .mount(&mock_server)
            .await;
    }

    let mut seq = paginate_url(format!("{base}/a")).unwrap();
    let mut data = Vec::new();
    while let Some(event) = seq.next().await {
        if let SequenceEvent::Data(record) = event.unwrap() {
            data.push(record);
            if data.len() == 4 {
                seq.cancel();
            }
        }
    }

    assert_eq!(data, vec![json!("a1"), json!("a2"), json!("b1"), json!("b2")]);
    assert!(seq.next().await.is_none());
}

#[tokio::test]
async fn test_page_events_precede_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Request-Id", "req-1")
                .set_body_json(json!({"mystery": {"rows": [1]}})),
        )
        .mount(&mock_server)
        .await;

    let events: Vec<SequenceEvent> = paginate_url(format!("{}/events", mock_server.uri()))
        .unwrap()
        .map(|event| event.unwrap())
        .collect()
        .await;

    // Unrecognized body: one page event, no records, no error
    assert_eq!(events.len(), 1);
    let page = events[0].as_page().unwrap();
    assert_eq!(page.meta().header("x-request-id"), Some("req-1"));
    assert_eq!(page.body(), &json!({"mystery": {"rows": [1]}}));
    assert_eq!(page.page_index(), 0);
}

#[tokio::test]
async fn test_invalid_uri_rejected_at_construction() {
    let err = paginate_url("::not a uri::").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[tokio::test]
async fn test_injected_transport_without_network() {
    let options = PaginateOptions::new()
        .uri("https://example.invalid/items")
        .query("page", 1)
        .transport(transport_fn(|request: PageRequest| async move {
            let page: i64 = request
                .query_param("page")
                .and_then(|p| p.parse().ok())
                .unwrap_or(0);
            let body = if page <= 2 { json!([page]) } else { json!([]) };
            Ok(PageResult::from_body(body))
        }));

    let records = paginate(options, PaginateOptions::new())
        .unwrap()
        .collect_records()
        .await
        .unwrap();

    assert_eq!(records, numbers(1..=2));
}
