use std::time::Duration;

use relay_engine::{HostChannel, HostFailureKind, HostProvider, HostSettings, PortHostProvider};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> HostSettings {
    HostSettings {
        address: server.address().ip().to_string(),
        ports: vec![server.address().port()],
        ..HostSettings::default()
    }
}

#[tokio::test]
async fn posts_task_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("content-type", "application/json"))
        .and(body_string("{\"name\":\"A. Example\"}"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let provider = PortHostProvider::new(&settings_for(&server)).expect("provider");
    let hosts = provider.hosts().await;
    assert_eq!(hosts.len(), 1);

    hosts[0]
        .send("{\"name\":\"A. Example\"}")
        .await
        .expect("send ok");
}

#[tokio::test]
async fn maps_server_error_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = PortHostProvider::new(&settings_for(&server)).expect("provider");
    let err = provider.hosts().await[0].send("{}").await.unwrap_err();
    assert_eq!(err.kind, HostFailureKind::HttpStatus(503));
}

#[tokio::test]
async fn slow_host_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let settings = HostSettings {
        request_timeout: Duration::from_millis(50),
        ..settings_for(&server)
    };
    let provider = PortHostProvider::new(&settings).expect("provider");
    let err = provider.hosts().await[0].send("{}").await.unwrap_err();
    assert_eq!(err.kind, HostFailureKind::Timeout);
}

#[tokio::test]
async fn duplicate_ports_collapse() {
    let settings = HostSettings {
        ports: vec![1327, 27121, 1327],
        ..HostSettings::default()
    };
    let provider = PortHostProvider::new(&settings).expect("provider");
    let names: Vec<String> = provider
        .hosts()
        .await
        .iter()
        .map(|host| host.name().to_string())
        .collect();

    assert_eq!(
        names,
        vec!["http://localhost:1327/", "http://localhost:27121/"]
    );
}

#[test]
fn invalid_address_is_rejected() {
    let settings = HostSettings {
        address: "bad host".to_string(),
        ..HostSettings::default()
    };
    let err = PortHostProvider::new(&settings).err().expect("invalid endpoint");
    assert_eq!(err.kind, HostFailureKind::InvalidEndpoint);
}
