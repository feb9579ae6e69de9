//! End-to-end device lifecycle against a mock CSE

#![allow(clippy::unwrap_used)]

use mockito::{Matcher, Server, ServerGuard};
use om2m_client::{ClientConfig, CseClient, NameStyle, Outcome, Provisioned};
use serde_json::json;

fn config_for(server: &ServerGuard) -> ClientConfig {
    let addr = server.socket_address();
    ClientConfig::new(addr.ip().to_string(), "sensor01", "readings").with_port(addr.port())
}

#[test]
fn register_container_and_send_issue_four_requests() {
    let mut server = Server::new();

    let register = server
        .mock("POST", "/~/mn-name")
        .match_header("x-m2m-origin", "admin:admin")
        .match_header("content-type", "application/json;ty=2")
        .with_status(201)
        .expect(1)
        .create();
    let check = server
        .mock("GET", "/~/mn-name/sensor01/readings")
        .match_header("x-m2m-origin", "admin:admin")
        .match_header("content-type", "application/json;ty=3")
        .with_status(404)
        .expect(1)
        .create();
    let create = server
        .mock("POST", "/~/mn-name/sensor01")
        .match_header("content-type", "application/json;ty=3")
        .with_status(201)
        .expect(1)
        .create();
    let send = server
        .mock("POST", "/~/mn-name/sensor01/readings")
        .match_header("x-m2m-origin", "admin:admin")
        .match_header("content-type", "application/json;ty=4")
        .match_body(Matcher::PartialJson(json!({"cin": {"content": r#"{"v":1}"#}})))
        .with_status(201)
        .expect(1)
        .create();

    let client = CseClient::new(config_for(&server)).unwrap();
    assert_eq!(client.register_ae().unwrap(), Outcome::Created);
    register.assert();
    assert!(!check.matched());
    assert!(!create.matched());
    assert!(!send.matched());

    assert_eq!(client.create_container().unwrap(), Outcome::Created);
    check.assert();
    create.assert();
    assert!(!send.matched());

    assert_eq!(client.send_data(&json!({"v": 1})).unwrap(), Outcome::Created);
    send.assert();
}

#[test]
fn provisioning_twice_converges() {
    let mut server = Server::new();

    let _register = server.mock("POST", "/~/mn-name").with_status(409).create();
    let _check = server
        .mock("GET", "/~/mn-name/sensor01/readings")
        .with_status(200)
        .create();
    let descriptor = server
        .mock("POST", "/~/mn-name/sensor01")
        .match_body(Matcher::Json(json!({"m2m:cnt": {"rn": "DESCRIPTOR"}})))
        .with_status(409)
        .expect(2)
        .create();

    let config = config_for(&server).with_name_style(NameStyle::Short);
    let client = CseClient::new(config).unwrap();

    let expected = Provisioned {
        ae: Outcome::AlreadyExists,
        container: Outcome::AlreadyExists,
        descriptor: Outcome::AlreadyExists,
    };
    assert_eq!(client.provision().unwrap(), expected);
    assert_eq!(client.provision().unwrap(), expected);
    descriptor.assert();
}

#[test]
fn provisioning_stops_at_first_failure() {
    let mut server = Server::new();

    let _register = server
        .mock("POST", "/~/mn-name")
        .with_status(401)
        .with_body("unauthorized")
        .create();
    let check = server.mock("GET", Matcher::Any).expect(0).create();

    let client = CseClient::new(config_for(&server)).unwrap();
    let err = client.provision().unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("unauthorized"));
    check.assert();
}
