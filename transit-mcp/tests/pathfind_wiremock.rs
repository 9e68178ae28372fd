//! Path search over live route data (wiremock-based)

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use transit_mcp::domain::StopId;
use transit_mcp::onebusaway::{OneBusAwayClient, OneBusAwayConfig};
use transit_mcp::pathfind::{PathError, RouteSuccessors, SearchLimits, Successors, find_paths};

fn id(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

fn ok(data: Value) -> Value {
    json!({"code": 200, "currentTime": 1_700_000_000_000_i64, "text": "OK", "version": 2, "data": data})
}

fn stop_json(id: &str, routes: &[&str]) -> Value {
    json!({"id": id, "name": id, "lat": 47.6, "lon": -122.3, "routeIds": routes})
}

fn stops_for_route(route: &str, groups: &[&[&str]], stops: &[(&str, &[&str])]) -> Value {
    let mut all_ids: Vec<&str> = Vec::new();
    for group in groups {
        for s in *group {
            if !all_ids.contains(s) {
                all_ids.push(*s);
            }
        }
    }

    let stop_groups: Vec<Value> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| json!({"id": i.to_string(), "stopIds": g}))
        .collect();

    ok(json!({
        "entry": {
            "routeId": route,
            "stopIds": all_ids,
            "stopGroupings": [{"type": "direction", "ordered": true, "stopGroups": stop_groups}]
        },
        "references": {
            "stops": stops.iter().map(|(s, r)| stop_json(s, r)).collect::<Vec<_>>()
        }
    }))
}

/// Route 1_A runs S -> X -> Y -> E; route 1_B runs X -> Z -> E and back.
async fn mount_network(server: &MockServer) {
    let a_stops: [(&str, &[&str]); 4] = [
        ("1_S", &["1_A"]),
        ("1_X", &["1_A", "1_B"]),
        ("1_Y", &["1_A"]),
        ("1_E", &["1_A", "1_B"]),
    ];
    let b_stops: [(&str, &[&str]); 3] = [
        ("1_X", &["1_A", "1_B"]),
        ("1_Z", &["1_B"]),
        ("1_E", &["1_A", "1_B"]),
    ];

    Mock::given(method("GET"))
        .and(path("/stop/1_S.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!({"entry": stop_json("1_S", &["1_A"]), "references": {}}))),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/stops-for-route/1_A.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stops_for_route(
            "1_A",
            &[&["1_S", "1_X", "1_Y", "1_E"]],
            &a_stops,
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/stops-for-route/1_B.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stops_for_route(
            "1_B",
            &[&["1_X", "1_Z", "1_E"], &["1_E", "1_Z", "1_X"]],
            &b_stops,
        )))
        .expect(1)
        .mount(server)
        .await;
}

fn successors_for(server: &MockServer) -> RouteSuccessors {
    let config = OneBusAwayConfig::new("test-key").with_base_url(server.uri());
    RouteSuccessors::new(Arc::new(OneBusAwayClient::new(config).unwrap()))
}

#[tokio::test]
async fn successors_follow_route_order() {
    let server = MockServer::start().await;
    mount_network(&server).await;

    let successors = successors_for(&server);

    assert_eq!(successors.successors(&id("1_S")).await.unwrap(), vec![id("1_X")]);
    // 1_X is known from the 1_A response; no stop lookup needed.
    assert_eq!(
        successors.successors(&id("1_X")).await.unwrap(),
        vec![id("1_Y"), id("1_Z")]
    );
    assert_eq!(successors.cached_routes().await, 2);
}

#[tokio::test]
async fn finds_paths_over_routes() {
    let server = MockServer::start().await;
    mount_network(&server).await;

    let successors = successors_for(&server);
    let search = find_paths(&successors, &id("1_S"), &id("1_E"), &SearchLimits::unbounded())
        .await
        .unwrap();

    let paths: Vec<Vec<&str>> = search
        .paths
        .iter()
        .map(|p| p.iter().map(StopId::as_str).collect())
        .collect();

    assert_eq!(
        paths,
        vec![
            vec!["1_S", "1_X", "1_Y", "1_E"],
            vec!["1_S", "1_X", "1_Z", "1_E"],
        ]
    );
}

#[tokio::test]
async fn upstream_failure_is_successor_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stop/1_S.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let successors = successors_for(&server);
    let err = find_paths(&successors, &id("1_S"), &id("1_E"), &SearchLimits::unbounded())
        .await
        .unwrap_err();

    match err {
        PathError::Successors { stop, message } => {
            assert_eq!(stop, id("1_S"));
            assert!(message.contains("500"));
        }
        other => panic!("expected Successors, got {other:?}"),
    }
}
