use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

use relayer_chain_sdk::{
	models::SelectionConfig,
	services::blockchain::{BlockchainTransport, HttpTransportClient, TransportError},
	utils::{JitterSetting, RetryConfig},
};

fn config(url: &str) -> SelectionConfig {
	SelectionConfig::new(1, vec![url.to_string()], Duration::from_secs(5), 3)
		.with_request_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn test_posts_json_rpc_envelope() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_header("content-type", "application/json")
		.match_body(Matcher::Json(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": "getblockcount",
			"params": []
		})))
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":77}"#)
		.create_async()
		.await;

	let transport = HttpTransportClient::new(&server.url(), &config(&server.url())).unwrap();
	let response = transport
		.send_raw_request("getblockcount", Some(json!([])))
		.await
		.unwrap();

	assert_eq!(response["result"], 77);
	mock.assert_async().await;
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
	let server = mockito::Server::new_async().await;
	let url = format!("{}/", server.url());
	let transport = HttpTransportClient::new(&url, &config(&url)).unwrap();
	assert_eq!(transport.url(), server.url());
}

#[tokio::test]
async fn test_rejects_unsupported_scheme() {
	assert!(HttpTransportClient::new("ws://localhost:10334", &config("ws://localhost:10334")).is_err());
	assert!(HttpTransportClient::new("not a url", &config("not a url")).is_err());
}

#[tokio::test]
async fn test_http_status_error_keeps_body() {
	let mut server = mockito::Server::new_async().await;
	server
		.mock("POST", "/")
		.with_status(502)
		.with_body("bad gateway")
		.create_async()
		.await;

	let transport = HttpTransportClient::new(&server.url(), &config(&server.url())).unwrap();
	match transport.send_raw_request("getblockcount", Some(json!([]))).await {
		Err(TransportError::Http {
			status_code, body, ..
		}) => {
			assert_eq!(status_code.as_u16(), 502);
			assert_eq!(body, "bad gateway");
		}
		other => panic!("Expected Http error, got {other:?}"),
	}
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
	let mut server = mockito::Server::new_async().await;
	server
		.mock("POST", "/")
		.with_body("not json")
		.create_async()
		.await;

	let transport = HttpTransportClient::new(&server.url(), &config(&server.url())).unwrap();
	assert!(matches!(
		transport.send_raw_request("getblockcount", Some(json!([]))).await,
		Err(TransportError::ResponseParse(_))
	));
}

#[tokio::test]
async fn test_json_rpc_error_is_returned_as_body() {
	let mut server = mockito::Server::new_async().await;
	server
		.mock("POST", "/")
		.with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-100,"message":"Unknown"}}"#)
		.create_async()
		.await;

	let transport = HttpTransportClient::new(&server.url(), &config(&server.url())).unwrap();
	let response = transport
		.send_raw_request("getstorage", Some(json!(["0x01", "AgE="])))
		.await
		.unwrap();
	assert_eq!(response["error"]["code"], -100);
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
	let url = "http://127.0.0.1:1";
	let transport = HttpTransportClient::new(url, &config(url)).unwrap();
	assert!(matches!(
		transport.send_raw_request("getblockcount", Some(json!([]))).await,
		Err(TransportError::Network(_))
	));
}

#[tokio::test]
async fn test_configured_retries_are_applied() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(503)
		.expect(2)
		.create_async()
		.await;

	let retry = RetryConfig {
		max_retries: 1,
		initial_backoff: Duration::from_millis(1),
		max_backoff: Duration::from_millis(2),
		jitter: JitterSetting::None,
		..RetryConfig::default()
	};
	let transport =
		HttpTransportClient::with_retry(&server.url(), Duration::from_secs(2), &retry).unwrap();
	assert!(transport
		.send_raw_request("getblockcount", Some(json!([])))
		.await
		.is_err());
	mock.assert_async().await;
}
