//! JSON-RPC Example
//!
//! Demonstrates courier's JSON-RPC 2.0 methods against an Ethereum style node.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use courier::prelude::*;
use serde_json::Value;

// ============================================================================
// Data Types
// ============================================================================

/// A block, reduced to the fields this example reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: String,
    pub hash: String,
    pub parent_hash: String,
    #[serde(default)]
    pub transactions: Vec<Value>,
}

// ============================================================================
// Declarative API
// ============================================================================

/// Node methods. Each single parameter is sent as the whole `params` member.
#[derive(Debug, Clone)]
pub struct NodeApi {
    block_number: MethodBinder,
    get_balance: MethodBinder,
    get_block_by_number: MethodBinder,
}

impl NodeApi {
    pub fn new() -> courier::Result<Self> {
        Self::with_builder(&JsonRpcBuilder::new())
    }

    pub fn with_builder(rpc: &JsonRpcBuilder) -> courier::Result<Self> {
        let block_number = rpc
            .method("eth_blockNumber", vec![])
            .decorate(Signature::new("block_number").returns::<String>())?;

        let get_balance = rpc.method("eth_getBalance", vec![]).decorate(
            Signature::new("get_balance")
                .param::<(String, String)>("params")
                .returns::<String>(),
        )?;

        let get_block_by_number = rpc.method("eth_getBlockByNumber", vec![]).decorate(
            Signature::new("get_block_by_number")
                .param::<(String, bool)>("params")
                .returns::<Option<Block>>(),
        )?;

        Ok(Self {
            block_number,
            get_balance,
            get_block_by_number,
        })
    }

    pub async fn block_number(&self, client: &HyperClient) -> courier::Result<u64> {
        let hex: String = self.block_number.bind(client).call_as(&args!()).await?;
        parse_quantity(&hex)
    }

    pub async fn get_balance(
        &self,
        client: &HyperClient,
        address: &str,
        block: &str,
    ) -> courier::Result<u128> {
        let hex: String = self
            .get_balance
            .bind(client)
            .call_as(&args!((address, block)))
            .await?;
        parse_quantity(&hex)
    }

    pub async fn get_block_by_number(
        &self,
        client: &HyperClient,
        block: &str,
        full_transactions: bool,
    ) -> courier::Result<Option<Block>> {
        self.get_block_by_number
            .bind(client)
            .call_as(&args!((block, full_transactions)))
            .await
    }
}

/// Parse a `0x` prefixed hex quantity.
fn parse_quantity<T>(hex: &str) -> courier::Result<T>
where
    T: TryFrom<u128>,
{
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    u128::from_str_radix(digits, 16)
        .ok()
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| Error::codec(format!("invalid quantity '{hex}'")))
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> courier::Result<()> {
    let api = NodeApi::new()?;
    let node = HyperClient::builder("https://ethereum-rpc.publicnode.com")
        .user_agent("courier-json-rpc-demo/0.1.0")
        .build()?;

    println!("JSON-RPC client created!");
    println!("Endpoint: {}", node.base_url());

    println!("\n=== Resolved pipelines ===");
    for (name, method) in [
        ("block_number", &api.block_number),
        ("get_balance", &api.get_balance),
        ("get_block_by_number", &api.get_block_by_number),
    ] {
        println!("{name}:");
        println!("  request:  {:?}", method.spec().request_chain());
        println!("  response: {:?}", method.spec().response_chain());
    }

    // These calls would work against a live node
    println!("\n=== Example API calls ===");
    println!("api.block_number(&node).await?");
    println!("api.get_balance(&node, \"0x...\", \"latest\").await?");
    println!("api.get_block_by_number(&node, \"latest\", false).await?");

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================
