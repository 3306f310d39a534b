//! Event signature table.
//!
//! Topic 0 of every contract log is `keccak256` of the canonical event
//! signature. The table is hashed once on first use.

use std::collections::HashMap;

use lazy_static::lazy_static;
use primitive_types::H256;
use sha3::{Digest, Keccak256};
use shared_types::EventKind;

/// Whether a signature belongs to the current contract or its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    Current(EventKind),
    /// Recognised but not decoded.
    Legacy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSignature {
    pub name: &'static str,
    pub signature: &'static str,
    pub topic: H256,
    pub kind: SignatureKind,
}

const CURRENT_SIGNATURES: [(EventKind, &str, &str); 6] = [
    (
        EventKind::Created,
        "ArkivEntityCreated",
        "ArkivEntityCreated(uint256,address,uint256,uint256)",
    ),
    (
        EventKind::Updated,
        "ArkivEntityUpdated",
        "ArkivEntityUpdated(uint256,address,uint256,uint256,uint256)",
    ),
    (
        EventKind::Deleted,
        "ArkivEntityDeleted",
        "ArkivEntityDeleted(uint256,address)",
    ),
    (
        EventKind::Extended,
        "ArkivEntityBTLExtended",
        "ArkivEntityBTLExtended(uint256,address,uint256,uint256,uint256)",
    ),
    (
        EventKind::OwnerChanged,
        "ArkivEntityOwnerChanged",
        "ArkivEntityOwnerChanged(uint256,address,address)",
    ),
    (
        EventKind::Expired,
        "ArkivEntityExpired",
        "ArkivEntityExpired(uint256,address)",
    ),
];

const LEGACY_SIGNATURES: [(&str, &str); 4] = [
    (
        "GolemBaseStorageEntityCreated",
        "GolemBaseStorageEntityCreated(uint256,uint256)",
    ),
    (
        "GolemBaseStorageEntityUpdated",
        "GolemBaseStorageEntityUpdated(uint256,uint256)",
    ),
    (
        "GolemBaseStorageEntityDeleted",
        "GolemBaseStorageEntityDeleted(uint256)",
    ),
    (
        "GolemBaseStorageEntityBTLExtended",
        "GolemBaseStorageEntityBTLExtended(uint256,uint256,uint256)",
    ),
];

lazy_static! {
    static ref SIGNATURES: HashMap<H256, EventSignature> = {
        let current = CURRENT_SIGNATURES
            .iter()
            .map(|(kind, name, signature)| (*name, *signature, SignatureKind::Current(*kind)));
        let legacy = LEGACY_SIGNATURES
            .iter()
            .map(|(name, signature)| (*name, *signature, SignatureKind::Legacy));

        current
            .chain(legacy)
            .map(|(name, signature, kind)| {
                let topic = event_topic(signature);
                (
                    topic,
                    EventSignature {
                        name,
                        signature,
                        topic,
                        kind,
                    },
                )
            })
            .collect()
    };
}

/// `keccak256(signature)` as a topic.
pub fn event_topic(signature: &str) -> H256 {
    H256::from_slice(&Keccak256::digest(signature.as_bytes()))
}

/// Look up a topic 0 value.
pub fn lookup_signature(topic: &H256) -> Option<&'static EventSignature> {
    SIGNATURES.get(topic)
}

/// Canonical signature for `kind`.
pub fn signature_for(kind: EventKind) -> &'static str {
    CURRENT_SIGNATURES
        .iter()
        .find(|(k, _, _)| *k == kind)
        .map(|(_, _, signature)| *signature)
        .unwrap_or_default()
}

/// Topic 0 used when installing a log filter for `kind`.
pub fn topic_for(kind: EventKind) -> H256 {
    event_topic(signature_for(kind))
}
