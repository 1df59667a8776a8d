use serde_json::{json, Value};

use relayer_chain_sdk::{
	models::{Neo3Signer, Neo3WitnessScope, ScriptHash, GAS_TOKEN},
	services::blockchain::{
		ChainEndpoint, Neo3Client, Neo3ClientError, Neo3ClientTrait, TransportError,
		EPOCH_HEIGHT_STORAGE_KEY,
	},
};

use crate::integration::mocks::MockNeo3Transport;

const CCM: &str = "0x5ba6c543c5a86a85e9ab3f028a4ad849b924fab9";

fn ok(result: Value) -> Value {
	json!({"jsonrpc": "2.0", "id": 1, "result": result})
}

fn transport() -> MockNeo3Transport {
	let mut transport = MockNeo3Transport::new();
	transport
		.expect_url()
		.return_const("http://seed1.neo.org:10332".to_string());
	transport
}

#[tokio::test]
async fn test_get_block_count_is_latest_height() {
	let mut transport = transport();
	transport
		.expect_send_raw_request()
		.withf(|method, _| method == "getblockcount")
		.times(1)
		.returning(|_, _| Ok(ok(json!(5_123_456))));

	let client = Neo3Client::new_with_transport(transport);
	assert_eq!(client.get_latest_height().await.unwrap(), 5_123_456);
	assert_eq!(client.address(), "http://seed1.neo.org:10332");
}

#[tokio::test]
async fn test_get_epoch_height_reads_ccm_storage() {
	let mut transport = transport();
	transport
		.expect_send_raw_request()
		.withf(|method, params| {
			method == "getstorage"
				&& params.as_ref() == Some(&json!([CCM, EPOCH_HEIGHT_STORAGE_KEY]))
		})
		.times(1)
		// 41, stored as a single little-endian byte
		.returning(|_, _| Ok(ok(json!("KQ=="))));

	let client = Neo3Client::new_with_transport(transport);
	assert_eq!(client.get_epoch_height(CCM).await.unwrap(), 42);
}

#[tokio::test]
async fn test_get_epoch_height_defaults_to_zero() {
	let mut transport = transport();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(ok(Value::Null)));

	let client = Neo3Client::new_with_transport(transport);
	assert_eq!(client.get_epoch_height(CCM).await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_epoch_height_rejects_corrupt_storage() {
	let mut transport = transport();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(ok(json!("not base64!"))));

	let client = Neo3Client::new_with_transport(transport);
	assert!(matches!(
		client.get_epoch_height(CCM).await,
		Err(Neo3ClientError::DecodeError(_))
	));
}

#[tokio::test]
async fn test_get_epoch_height_rejects_empty_contract() {
	let mut transport = transport();
	transport.expect_send_raw_request().never();

	let client = Neo3Client::new_with_transport(transport);
	assert!(matches!(
		client.get_epoch_height("  ").await,
		Err(Neo3ClientError::InvalidInput(_))
	));
}

#[tokio::test]
async fn test_transport_failure_is_request_error() {
	let mut transport = transport();
	transport.expect_send_raw_request().returning(|_, _| {
		Err(TransportError::network("connection refused", None, None))
	});

	let client = Neo3Client::new_with_transport(transport);
	assert!(matches!(
		client.get_block_count().await,
		Err(Neo3ClientError::RequestError(_))
	));
	assert!(client.get_latest_height().await.is_err());
}

#[tokio::test]
async fn test_rpc_error_member_keeps_code() {
	let mut transport = transport();
	transport.expect_send_raw_request().returning(|_, _| {
		Ok(json!({
			"jsonrpc": "2.0",
			"id": 1,
			"error": {"code": -500, "message": "Insufficient funds"}
		}))
	});

	let client = Neo3Client::new_with_transport(transport);
	match client.send_raw_transaction("AA==").await {
		Err(Neo3ClientError::RpcError { code, message, .. }) => {
			assert_eq!(code, -500);
			assert_eq!(message, "Insufficient funds");
		}
		other => panic!("Expected RpcError, got {other:?}"),
	}
}

#[tokio::test]
async fn test_invoke_script_sends_base64_script_and_signers() {
	let signer = Neo3Signer {
		account: ScriptHash::from_le_bytes([7; 20]),
		scopes: Neo3WitnessScope::CalledByEntry,
	};

	let mut transport = transport();
	transport
		.expect_send_raw_request()
		.withf(|method, params| {
			let params = params.as_ref().and_then(|p| p.as_array()).cloned();
			method == "invokescript"
				&& params.as_ref().map(|p| p[0] == json!("QAE=")).unwrap_or(false)
				&& params.as_ref().map(|p| p[1].as_array().map(|s| s.len()) == Some(1)).unwrap_or(false)
		})
		.returning(|_, _| {
			Ok(ok(json!({
				"script": "QAE=",
				"state": "HALT",
				"gasconsumed": "997775",
				"stack": []
			})))
		});

	let client = Neo3Client::new_with_transport(transport);
	let result = client.invoke_script(&[0x40, 0x01], &[signer]).await.unwrap();
	assert!(!result.is_fault());
	assert_eq!(result.gas_consumed, "997775");
}

#[tokio::test]
async fn test_get_nep17_balances() {
	let mut transport = transport();
	transport.expect_send_raw_request().returning(|_, _| {
		Ok(ok(json!({
			"address": "NVTiAjNgagDkTr5HTzDmQP9kPwPHN5BgVq",
			"balance": [{
				"assethash": "0xd2a4cff31913016155e38e474a2c06d08be276cf",
				"amount": "3000000000",
				"lastupdatedblock": 1000
			}]
		})))
	});

	let client = Neo3Client::new_with_transport(transport);
	let balances = client
		.get_nep17_balances("NVTiAjNgagDkTr5HTzDmQP9kPwPHN5BgVq")
		.await
		.unwrap();
	assert_eq!(balances.amount_of(&GAS_TOKEN), Ok(3_000_000_000));
}

#[tokio::test]
async fn test_missing_result_is_parse_error() {
	let mut transport = transport();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(json!({"jsonrpc": "2.0", "id": 1})));

	let client = Neo3Client::new_with_transport(transport);
	assert!(matches!(
		client.get_block_count().await,
		Err(Neo3ClientError::ResponseParseError(_))
	));
}
