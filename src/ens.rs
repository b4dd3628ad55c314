//! ENS reverse resolution.
//!
//! An address resolves to a name when the registry points its reverse node
//! (`<hex>.addr.reverse`) at a resolver, that resolver returns a non-empty
//! `name`, and the name resolves forward to the same address again.

use async_trait::async_trait;
use log::debug;
use tiny_keccak::{Hasher, Keccak};
use web3::ethabi::{self, ParamType, Token};
use web3::types::{Address, H256};

use crate::error::{ConnectError, ConnectResult};

const REVERSE_SUFFIX: &str = "addr.reverse";

const RESOLVER_SIG: &str = "resolver(bytes32)";
const NAME_SIG: &str = "name(bytes32)";
const ADDR_SIG: &str = "addr(bytes32)";

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut out = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut out);
    out
}

/// EIP-137 namehash. The empty name hashes to the zero node.
pub fn namehash(name: &str) -> H256 {
    let mut node = [0u8; 32];
    if name.is_empty() {
        return H256::from(node);
    }
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&keccak256(label.as_bytes()));
        node = keccak256(&buf);
    }
    H256::from(node)
}

/// `<lowercase hex without 0x>.addr.reverse`
pub fn reverse_name(address: &Address) -> String {
    format!("{}.{}", hex::encode(address.as_bytes()), REVERSE_SUFFIX)
}

/// First four bytes of the keccak of a function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

fn encode_node_call(signature: &str, node: H256) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend(ethabi::encode(&[Token::FixedBytes(node.as_bytes().to_vec())]));
    data
}

/// Decodes a single return value; empty return data means "nothing there".
fn decode_single(kind: ParamType, data: &[u8]) -> ConnectResult<Option<Token>> {
    if data.is_empty() {
        return Ok(None);
    }
    let mut tokens = ethabi::decode(&[kind], data)?;
    Ok(tokens.pop())
}

/// Read-only contract calls (`eth_call` against the latest block).
#[async_trait(?Send)]
pub trait ContractCaller {
    async fn call(&self, to: Address, data: Vec<u8>) -> ConnectResult<Vec<u8>>;
}

pub struct Ens<'a, C: ContractCaller + ?Sized> {
    caller: &'a C,
    registry: Address,
}

impl<'a, C: ContractCaller + ?Sized> Ens<'a, C> {
    pub fn new(caller: &'a C, registry: Address) -> Self {
        Self { caller, registry }
    }

    /// Resolver contract for `node`, `None` when unset.
    pub async fn resolver(&self, node: H256) -> ConnectResult<Option<Address>> {
        let data = self
            .caller
            .call(self.registry, encode_node_call(RESOLVER_SIG, node))
            .await?;
        match decode_single(ParamType::Address, &data)? {
            Some(Token::Address(resolver)) if !resolver.is_zero() => Ok(Some(resolver)),
            Some(Token::Address(_)) | None => Ok(None),
            Some(other) => Err(unexpected("resolver", &other)),
        }
    }

    async fn name(&self, resolver: Address, node: H256) -> ConnectResult<Option<String>> {
        let data = self
            .caller
            .call(resolver, encode_node_call(NAME_SIG, node))
            .await?;
        match decode_single(ParamType::String, &data)? {
            Some(Token::String(name)) if !name.is_empty() => Ok(Some(name)),
            Some(Token::String(_)) | None => Ok(None),
            Some(other) => Err(unexpected("name", &other)),
        }
    }

    async fn addr(&self, resolver: Address, node: H256) -> ConnectResult<Option<Address>> {
        let data = self
            .caller
            .call(resolver, encode_node_call(ADDR_SIG, node))
            .await?;
        match decode_single(ParamType::Address, &data)? {
            Some(Token::Address(addr)) if !addr.is_zero() => Ok(Some(addr)),
            Some(Token::Address(_)) | None => Ok(None),
            Some(other) => Err(unexpected("addr", &other)),
        }
    }

    /// Forward resolution of `name` to an address.
    pub async fn resolve_name(&self, name: &str) -> ConnectResult<Option<Address>> {
        let node = namehash(name);
        match self.resolver(node).await? {
            Some(resolver) => self.addr(resolver, node).await,
            None => Ok(None),
        }
    }

    /// Primary name of `address`, verified by resolving it forward again.
    ///
    /// The forward check uses the lowercased name; the name is returned as stored.
    pub async fn lookup_address(&self, address: Address) -> ConnectResult<Option<String>> {
        let node = namehash(&reverse_name(&address));
        let resolver = match self.resolver(node).await? {
            Some(resolver) => resolver,
            None => {
                debug!("no reverse resolver for {:?}", address);
                return Ok(None);
            }
        };
        let name = match self.name(resolver, node).await? {
            Some(name) => name,
            None => return Ok(None),
        };
        match self.resolve_name(&name.to_lowercase()).await? {
            Some(forward) if forward == address => Ok(Some(name)),
            forward => {
                debug!("{} resolves to {:?}, not {:?}", name, forward, address);
                Ok(None)
            }
        }
    }
}

fn unexpected(call: &str, token: &Token) -> ConnectError {
    ConnectError::Resolution(format!("unexpected {} return value: {:?}", call, token))
}
