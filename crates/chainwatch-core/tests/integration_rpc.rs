#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test — panics are the assertion mechanism")]

use std::sync::Arc;
use std::time::{Duration, Instant};

use chainwatch_core::rpc::{ChainClient, EvmJsonRpcClient, FailoverConfig};
use chainwatch_core::{FailoverRunner, RpcHealthRegistry};
use chainwatch_types::{ChainConfig, EndpointFailure, QueryError, TokenConfig};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": result }))
}

async fn mount_rpc(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(rpc_result(result))
        .mount(server)
        .await;
}

fn ethereum() -> ChainConfig {
    ChainConfig::new("Ethereum", "ethereum")
}

fn client() -> EvmJsonRpcClient {
    EvmJsonRpcClient::new().expect("client builds")
}

#[tokio::test]
async fn test_native_balance_scaled_by_decimals() {
    let server = MockServer::start().await;
    mount_rpc(&server, "eth_getBalance", json!("0x14d1120d7b160000")).await;

    let balance = client()
        .native_balance(&server.uri(), &ethereum(), ADDRESS)
        .await
        .expect("balance");

    assert_eq!(balance, Decimal::new(15, 1));
}

#[tokio::test]
async fn test_token_balance_uses_balance_of_call() {
    let server = MockServer::start().await;
    let contract = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "eth_call",
            "params": [{ "to": contract, "data": format!("0x70a08231{:0>64}", ADDRESS[2..].to_ascii_lowercase()) }, "latest"]
        })))
        .respond_with(rpc_result(json!(
            "0x0000000000000000000000000000000000000000000000000000000005f5e100"
        )))
        .expect(1)
        .mount(&server)
        .await;

    let usdc = TokenConfig::new("USDC", "usd-coin").with_contract(contract, 6);
    let balance = client().token_balance(&server.uri(), &usdc, ADDRESS).await.expect("balance");

    assert_eq!(balance, Decimal::from(100));
}

#[tokio::test]
async fn test_recent_transactions_scans_newest_first() {
    let server = MockServer::start().await;
    mount_rpc(&server, "eth_blockNumber", json!("0x10")).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_getBlockByNumber", "params": ["0x10", true] })))
        .respond_with(rpc_result(json!({
            "number": "0x10",
            "transactions": [
                { "hash": "0xa", "from": ADDRESS.to_ascii_lowercase(), "to": "0xbeef", "value": "0xde0b6b3a7640000" },
                { "hash": "0xb", "from": "0xcafe", "to": "0xbeef", "value": "0x1" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_getBlockByNumber", "params": ["0xf", true] })))
        .respond_with(rpc_result(json!({
            "number": "0xf",
            "transactions": [
                { "hash": "0xc", "from": "0xcafe", "to": ADDRESS, "value": "0x0" },
                { "hash": "0xd", "from": "0xcafe", "to": null }
            ]
        })))
        .mount(&server)
        .await;

    let chain = ChainConfig { tx_scan_blocks: 2, ..ethereum() };
    let txs = client().recent_transactions(&server.uri(), &chain, ADDRESS).await.expect("txs");

    let hashes: Vec<_> = txs.iter().map(|t| t.hash.as_str()).collect();
    assert_eq!(hashes, vec!["0xa", "0xc"]);
    assert_eq!(txs[0].from, ADDRESS);
    assert_eq!(txs[0].value, Some(Decimal::ONE));
    assert_eq!(txs[0].block_number, Some(16));
    assert_eq!(txs[1].to, ADDRESS);
    assert!(txs.iter().all(|t| t.chain == "Ethereum"));
}

#[tokio::test]
async fn test_failure_categories() {
    let server = MockServer::start().await;
    let chain = ethereum();

    {
        let _guard = Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount_as_scoped(&server)
            .await;
        let err = client().native_balance(&server.uri(), &chain, ADDRESS).await.unwrap_err();
        assert!(matches!(err, EndpointFailure::Transport { .. }), "got {err:?}");
    }

    {
        let _guard = Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0", "id": 1,
                "error": { "code": -32005, "message": "rate limited" }
            })))
            .mount_as_scoped(&server)
            .await;
        let err = client().native_balance(&server.uri(), &chain, ADDRESS).await.unwrap_err();
        assert!(matches!(err, EndpointFailure::Rpc { code: -32005, .. }), "got {err:?}");
    }

    {
        let _guard = Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount_as_scoped(&server)
            .await;
        let err = client().native_balance(&server.uri(), &chain, ADDRESS).await.unwrap_err();
        assert!(matches!(err, EndpointFailure::Malformed { .. }), "got {err:?}");
    }

    {
        let _guard = Mock::given(method("POST"))
            .respond_with(rpc_result(Value::Null))
            .mount_as_scoped(&server)
            .await;
        let err = client().native_balance(&server.uri(), &chain, ADDRESS).await.unwrap_err();
        assert!(matches!(err, EndpointFailure::Malformed { .. }), "got {err:?}");
    }

    {
        let _guard = Mock::given(method("POST"))
            .respond_with(rpc_result(json!("not-hex")))
            .mount_as_scoped(&server)
            .await;
        let err = client().native_balance(&server.uri(), &chain, ADDRESS).await.unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }
}

#[tokio::test]
async fn test_failover_across_real_endpoints() {
    let broken = MockServer::start().await;
    let slow = MockServer::start().await;
    let healthy = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&broken)
        .await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!("0x1")).set_delay(Duration::from_secs(2)))
        .mount(&slow)
        .await;
    mount_rpc(&healthy, "eth_getBalance", json!("0xde0b6b3a7640000")).await;

    let registry = Arc::new(RpcHealthRegistry::new());
    let runner = FailoverRunner::new(
        Arc::clone(&registry),
        FailoverConfig {
            attempt_timeout: Duration::from_millis(300),
            cooldown: Duration::from_secs(60),
        },
    );
    let candidates = vec![broken.uri(), slow.uri(), healthy.uri()];
    let evm = client();
    let chain = ethereum();

    let outcome = runner
        .attempt_query(&candidates, |endpoint| {
            let evm = &evm;
            let chain = &chain;
            async move { evm.native_balance(&endpoint, chain, ADDRESS).await }
        })
        .await
        .expect("third endpoint answers");

    assert_eq!(outcome.value, Decimal::ONE);
    assert_eq!(outcome.endpoint, healthy.uri());
    assert_eq!(outcome.attempts, 3);

    let now = Instant::now();
    assert!(registry.is_in_cooldown(&broken.uri(), now));
    assert!(registry.is_in_cooldown(&slow.uri(), now));
    assert!(!registry.is_in_cooldown(&healthy.uri(), now));
    assert_eq!(
        chainwatch_core::prioritize(&candidates, &registry, now),
        vec![healthy.uri(), broken.uri(), slow.uri()]
    );
}

#[tokio::test]
async fn test_exhausted_pass_reports_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let runner = FailoverRunner::new(Arc::new(RpcHealthRegistry::new()), FailoverConfig::default());
    let evm = client();
    let chain = ethereum();
    let candidates = [server.uri()];

    let err = runner
        .attempt_query(&candidates, |endpoint| {
            let evm = &evm;
            let chain = &chain;
            async move { evm.native_balance(&endpoint, chain, ADDRESS).await }
        })
        .await
        .unwrap_err();

    assert_eq!(err, QueryError::AllEndpointsExhausted { attempts: 1 });
}

#[tokio::test]
async fn test_balance_wider_than_decimal_mantissa_is_not_a_failure() {
    let server = MockServer::start().await;
    // 10^29 wei at 18 decimals
    mount_rpc(&server, "eth_getBalance", json!("0x1431e0fae6d7217caa0000000")).await;

    let registry = Arc::new(RpcHealthRegistry::new());
    let runner = FailoverRunner::new(Arc::clone(&registry), FailoverConfig::default());
    let evm = client();
    let chain = ethereum();
    let candidates = [server.uri()];

    let outcome = runner
        .attempt_query(&candidates, |endpoint| {
            let evm = &evm;
            let chain = &chain;
            async move { evm.native_balance(&endpoint, chain, ADDRESS).await }
        })
        .await
        .expect("large balance is valid data");

    assert_eq!(outcome.value, Decimal::from(100_000_000_000_u64));
    assert!(!registry.is_in_cooldown(&server.uri(), Instant::now()));
}

#[tokio::test]
async fn test_bad_account_address_leaves_registry_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!("0x1")))
        .expect(0)
        .mount(&server)
        .await;
    let second = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!("0x1")))
        .expect(0)
        .mount(&second)
        .await;

    let registry = Arc::new(RpcHealthRegistry::new());
    let runner = FailoverRunner::new(Arc::clone(&registry), FailoverConfig::default());
    let evm = client();
    let chain = ethereum();
    let candidates = [server.uri(), second.uri()];

    let err = runner
        .attempt_query(&candidates, |endpoint| {
            let evm = &evm;
            let chain = &chain;
            async move { evm.fetch_snapshot(&endpoint, chain, "0xMyAddress").await }
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QueryError::InvalidRequest { ref message } if message.contains("0xMyAddress")
    ));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_token_without_contract_leaves_registry_empty() {
    let server = MockServer::start().await;
    mount_rpc(&server, "eth_getBalance", json!("0x1")).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_call" })))
        .respond_with(rpc_result(json!("0x1")))
        .expect(0)
        .mount(&server)
        .await;

    let registry = Arc::new(RpcHealthRegistry::new());
    let runner = FailoverRunner::new(Arc::clone(&registry), FailoverConfig::default());
    let evm = client();
    let chain = ethereum().with_token(TokenConfig::new("DAI", "dai"));
    let candidates = [server.uri()];

    let err = runner
        .attempt_query(&candidates, |endpoint| {
            let evm = &evm;
            let chain = &chain;
            async move { evm.fetch_snapshot(&endpoint, chain, ADDRESS).await }
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QueryError::InvalidRequest { ref message } if message.contains("DAI")
    ));
    assert!(registry.is_empty());
}
