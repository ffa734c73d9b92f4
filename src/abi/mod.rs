//! Event schemas and log decoding
//!
//! An [`EventSchema`] describes one contract event: its name and ordered parameters, each
//! either indexed (carried in a topic) or not (carried as a 32-byte word in the data
//! payload). Schemas are registered in a [`SchemaRegistry`] keyed by signature hash, and
//! decoding is driven entirely by the schema.

use alloy_primitives::{B256, keccak256};
use std::collections::HashMap;
use std::sync::OnceLock;

mod decode;

pub use decode::{DecodeError, DecodedEvent, Token};

/// Static ABI types supported by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Address,
    Uint256,
}

impl ParamType {
    pub fn canonical_name(&self) -> &'static str {
        match self {
            ParamType::Address => "address",
            ParamType::Uint256 => "uint256",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParam {
    pub name: &'static str,
    pub kind: ParamType,
    pub indexed: bool,
}

impl EventParam {
    pub const fn indexed(name: &'static str, kind: ParamType) -> Self {
        Self {
            name,
            kind,
            indexed: true,
        }
    }

    pub const fn data(name: &'static str, kind: ParamType) -> Self {
        Self {
            name,
            kind,
            indexed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSchema {
    pub name: &'static str,
    pub params: Vec<EventParam>,
}

impl EventSchema {
    pub fn new(name: &'static str, params: Vec<EventParam>) -> Self {
        Self { name, params }
    }

    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|p| p.kind.canonical_name()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// keccak256 of the canonical signature; the value of topic[0]
    pub fn selector(&self) -> B256 {
        keccak256(self.signature().as_bytes())
    }

    /// Number of topics a matching log carries (signature plus indexed params)
    pub fn topic_count(&self) -> usize {
        1 + self.params.iter().filter(|p| p.indexed).count()
    }

    /// Minimum payload length in bytes for the non-indexed params
    pub fn data_len(&self) -> usize {
        32 * self.params.iter().filter(|p| !p.indexed).count()
    }
}

/// The NFT `Transfer(address indexed from, address indexed to, uint256 tokenId)` event
///
/// `tokenId` is read from the data payload, so a matching log has exactly 3 topics.
pub fn transfer_schema() -> EventSchema {
    EventSchema::new(
        "Transfer",
        vec![
            EventParam::indexed("from", ParamType::Address),
            EventParam::indexed("to", ParamType::Address),
            EventParam::data("tokenId", ParamType::Uint256),
        ],
    )
}

/// Event schemas keyed by selector
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<B256, EventSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: EventSchema) {
        self.schemas.insert(schema.selector(), schema);
    }

    pub fn get(&self, selector: &B256) -> Option<&EventSchema> {
        self.schemas.get(selector)
    }
}

static NFT_REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// Registry holding the fixed NFT contract interface
pub fn nft_registry() -> &'static SchemaRegistry {
    NFT_REGISTRY.get_or_init(|| {
        let mut registry = SchemaRegistry::new();
        registry.register(transfer_schema());
        registry
    })
}
