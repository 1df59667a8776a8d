use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

use relayer_chain_sdk::{
	models::SelectionConfig,
	services::blockchain::{ChainEndpoint, EndpointConnector, EvmClient},
};

fn config(url: &str) -> SelectionConfig {
	SelectionConfig::new(1, vec![url.to_string()], Duration::from_secs(12), 5)
}

#[tokio::test]
async fn test_get_latest_height_parses_hex() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x12d687"}"#)
		.create_async()
		.await;

	let client = EvmClient::connect(&server.url(), &config(&server.url())).unwrap();
	assert_eq!(client.get_latest_height().await.unwrap(), 1_234_567);
	assert_eq!(client.address(), server.url());
	mock.assert_async().await;
}

#[tokio::test]
async fn test_rpc_error_is_reported() {
	let mut server = mockito::Server::new_async().await;
	server
		.mock("POST", "/")
		.with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"header not found"}}"#)
		.create_async()
		.await;

	let client = EvmClient::connect(&server.url(), &config(&server.url())).unwrap();
	let error = client.get_latest_height().await.unwrap_err();
	assert!(error.to_string().contains("header not found"));
}

#[tokio::test]
async fn test_malformed_result_is_reported() {
	let mut server = mockito::Server::new_async().await;
	server
		.mock("POST", "/")
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0xzz"}"#)
		.create_async()
		.await;

	let client = EvmClient::connect(&server.url(), &config(&server.url())).unwrap();
	assert!(client.get_latest_height().await.is_err());
}

#[test]
fn test_connect_rejects_invalid_url() {
	assert!(EvmClient::connect("ftp://node", &config("ftp://node")).is_err());
}
