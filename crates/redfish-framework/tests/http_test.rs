//! HttpClient tests against a local `mockito` server.

use mockito::{Matcher, Server};
use redfish_framework::{
    get_resource, list_referenced, redfish_resource, Client, ClientConfig, Entity, HttpClient,
    RedfishError, Resolved, TransportError,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct Manager {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "FirmwareVersion", default)]
    pub firmware_version: String,
}

redfish_resource!(Manager, manager);

fn client_for(server: &Server) -> HttpClient {
    HttpClient::new(ClientConfig::new(server.url()).with_basic_auth("admin", "secret"))
        .expect("Failed to create test client")
}

#[tokio::test]
async fn test_get_sends_basic_auth_and_accept_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/redfish/v1/Managers/BMC")
        .match_header("authorization", "Basic YWRtaW46c2VjcmV0")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "@odata.id": "/redfish/v1/Managers/BMC",
                "Id": "BMC",
                "FirmwareVersion": "7.10.30.00",
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = HttpClient::connect(ClientConfig::new(server.url()).with_basic_auth("admin", "secret"))
        .unwrap();
    let manager = get_manager(&client, "/redfish/v1/Managers/BMC").await.unwrap();

    assert_eq!(manager.entity.id, "BMC");
    assert_eq!(manager.firmware_version, "7.10.30.00");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_carries_redfish_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/redfish/v1/Managers/Missing")
        .with_status(404)
        .with_body(
            json!({
                "error": {
                    "code": "Base.1.8.GeneralError",
                    "message": "A general error has occurred.",
                    "@Message.ExtendedInfo": [{ "Message": "The resource at the URI was not found." }]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    match client.get("/redfish/v1/Managers/Missing").await {
        Err(TransportError::Status {
            uri,
            status,
            message,
        }) => {
            assert_eq!(uri, "/redfish/v1/Managers/Missing");
            assert_eq!(status, 404);
            assert_eq!(message, "A general error has occurred.");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_a_request_error() {
    // Nothing listens on port 9 (discard) on loopback in the test environment.
    let client = HttpClient::connect(ClientConfig::new("http://127.0.0.1:9")).unwrap();

    let result = get_resource::<Manager>(&client, "/redfish/v1").await;

    assert!(matches!(
        result,
        Err(RedfishError::Transport(TransportError::Request { .. }))
    ));
}

#[tokio::test]
async fn test_collection_over_http_with_failing_member() {
    let mut server = Server::new_async().await;
    let _collection = server
        .mock("GET", "/redfish/v1/Managers")
        .with_status(200)
        .with_body(
            json!({
                "@odata.id": "/redfish/v1/Managers",
                "Members": [
                    { "@odata.id": "/redfish/v1/Managers/1" },
                    { "@odata.id": "/redfish/v1/Managers/2" }
                ],
                "Members@odata.count": 2
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _first = server
        .mock("GET", "/redfish/v1/Managers/1")
        .with_status(200)
        .with_body(json!({ "@odata.id": "/redfish/v1/Managers/1", "Id": "1" }).to_string())
        .create_async()
        .await;
    let _second = server
        .mock("GET", Matcher::Exact("/redfish/v1/Managers/2".to_string()))
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let client = HttpClient::connect(ClientConfig::new(server.url())).unwrap();
    let resolved: Resolved<Manager> = list_referenced(&client, "/redfish/v1/Managers").await;

    assert_eq!(resolved.items.len(), 1);
    assert_eq!(resolved.items[0].entity.id, "1");
    assert_eq!(resolved.failures.len(), 1);
    match resolved.failures.get("/redfish/v1/Managers/2") {
        Some(RedfishError::Transport(e)) => assert_eq!(e.status(), Some(503)),
        other => panic!("Expected HTTP 503, got {:?}", other),
    }
}
