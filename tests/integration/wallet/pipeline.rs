use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};

use relayer_chain_sdk::{
	models::{Neo3Witness, SelectionConfig, GAS_TOKEN_HASH},
	services::{
		blockchain::{ChainSdk, Neo3Client, SdkRegistry},
		wallet::{TransactionError, TransactionPipeline, TransactionStage, WalletError},
	},
};

use crate::integration::mocks::{test_account, unlocked_wallet, MockWallet};

const MAGIC: u32 = 860_833_102;

async fn rpc(server: &mut ServerGuard, method: &str, result: Value) -> Mock {
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({ "method": method })))
		.with_header("content-type", "application/json")
		.with_body(json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string())
		.create_async()
		.await
}

fn balances(amount: &str) -> Value {
	json!({
		"address": "NTestAccount1",
		"balance": [{
			"assethash": GAS_TOKEN_HASH,
			"amount": amount,
			"lastupdatedblock": 900
		}]
	})
}

/// Node answering every read the pipeline needs; the caller mocks `sendrawtransaction`
async fn node(gas_balance: &str) -> ServerGuard {
	let mut server = mockito::Server::new_async().await;
	rpc(&mut server, "getblockcount", json!(1000)).await;
	rpc(&mut server, "getnep17balances", balances(gas_balance)).await;
	rpc(
		&mut server,
		"invokescript",
		json!({"script": "QA==", "state": "HALT", "gasconsumed": "1000", "stack": []}),
	)
	.await;
	rpc(&mut server, "calculatenetworkfee", json!({"networkfee": "500"})).await;
	server
}

async fn sdk(server: &ServerGuard) -> Arc<ChainSdk<Neo3Client>> {
	let config = SelectionConfig::new(5, vec![server.url()], Duration::from_secs(60), 3)
		.with_network_magic(MAGIC)
		.with_require_reachable_on_start(true);
	SdkRegistry::<Neo3Client>::new()
		.get_or_create(&config)
		.await
		.unwrap()
}

fn signing_wallet() -> MockWallet {
	let mut wallet = unlocked_wallet(MAGIC, vec![test_account(1)]);
	wallet
		.expect_sign()
		.withf(|account, data| account.address == "NTestAccount1" && data.len() == 36)
		.times(1)
		.returning(|_, _| Ok(Neo3Witness::default()));
	wallet
}

#[tokio::test]
async fn test_send_invocation_broadcasts_signed_transaction() {
	let mut server = node("10000").await;
	let send = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "sendrawtransaction"})))
		.with_body(json!({"jsonrpc": "2.0", "id": 1, "result": {"hash": "0xabc"}}).to_string())
		.expect(1)
		.create_async()
		.await;

	let pipeline = TransactionPipeline::new(sdk(&server).await, Arc::new(signing_wallet()));
	let hash = pipeline.send_invocation(&[0x40]).await.unwrap();

	assert!(hash.starts_with("0x"));
	assert_eq!(hash.len(), 66);
	send.assert_async().await;
	pipeline.sdk().shutdown().await;
}

#[tokio::test]
async fn test_insufficient_balance_never_broadcasts() {
	let mut server = node("1499").await;
	let send = server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "sendrawtransaction"})))
		.expect(0)
		.create_async()
		.await;

	let mut wallet = unlocked_wallet(MAGIC, vec![test_account(1)]);
	wallet.expect_sign().never();

	let pipeline = TransactionPipeline::new(sdk(&server).await, Arc::new(wallet));
	let error = pipeline.send_invocation(&[0x40]).await.unwrap_err();

	assert_eq!(error.stage(), TransactionStage::Build);
	assert!(error.to_string().contains("Insufficient balance"));
	send.assert_async().await;
	pipeline.sdk().shutdown().await;
}

#[tokio::test]
async fn test_node_rejection_keeps_code_and_message() {
	let mut server = node("10000").await;
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "sendrawtransaction"})))
		.with_body(
			json!({
				"jsonrpc": "2.0",
				"id": 1,
				"error": {"code": -501, "message": "Policy check failed"}
			})
			.to_string(),
		)
		.create_async()
		.await;

	let pipeline = TransactionPipeline::new(sdk(&server).await, Arc::new(signing_wallet()));
	match pipeline.send_invocation(&[0x40]).await {
		Err(TransactionError::RejectedError { code, message, .. }) => {
			assert_eq!(code, -501);
			assert_eq!(message, "Policy check failed");
		}
		other => panic!("Expected RejectedError, got {other:?}"),
	}
	pipeline.sdk().shutdown().await;
}

#[tokio::test]
async fn test_signing_failure_is_sign_stage() {
	let server = node("10000").await;
	let mut wallet = unlocked_wallet(MAGIC, vec![test_account(1)]);
	wallet
		.expect_sign()
		.returning(|_, _| Err(WalletError::signing_error("hardware key unavailable", None, None)));

	let pipeline = TransactionPipeline::new(sdk(&server).await, Arc::new(wallet));
	let error = pipeline.send_invocation(&[0x40]).await.unwrap_err();
	assert_eq!(error.stage(), TransactionStage::Sign);
	pipeline.sdk().shutdown().await;
}

#[tokio::test]
async fn test_balance_lookup_failure_is_resolve_stage() {
	let mut server = mockito::Server::new_async().await;
	rpc(&mut server, "getblockcount", json!(1000)).await;
	server
		.mock("POST", "/")
		.match_body(Matcher::PartialJson(json!({"method": "getnep17balances"})))
		.with_status(500)
		.create_async()
		.await;

	let pipeline = TransactionPipeline::new(
		sdk(&server).await,
		Arc::new(unlocked_wallet(MAGIC, vec![test_account(1)])),
	);
	let error = pipeline.send_invocation(&[0x40]).await.unwrap_err();
	assert_eq!(error.stage(), TransactionStage::ResolveBalance);
	pipeline.sdk().shutdown().await;
}

#[tokio::test]
async fn test_explicit_wallet_overrides_pipeline_wallet() {
	let mut server = node("10000").await;
	rpc(&mut server, "sendrawtransaction", json!({"hash": "0x01"})).await;

	let mut unused = MockWallet::new();
	unused.expect_accounts().never();
	unused.expect_sign().never();

	let pipeline = TransactionPipeline::new(sdk(&server).await, Arc::new(unused));
	let wallet = signing_wallet();
	assert!(pipeline
		.send_invocation_with_wallet(&wallet, &[0x40])
		.await
		.is_ok());
	pipeline.sdk().shutdown().await;
}
