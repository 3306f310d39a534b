//! Log → [`Event`] decoding.

use primitive_types::{H160, H256, U256};
use shared_types::{
    Address, BlockNumber, CreatedEvent, DeletedEvent, EntityKey, Event, EventKind, ExpiredEvent,
    ExtendedEvent, OwnerChangedEvent, RpcLog, UpdatedEvent,
};
use tracing::debug;

use super::signatures::{lookup_signature, SignatureKind};
use crate::error::{DecodeError, Result};

const WORD: usize = 32;

/// Decode one contract log.
///
/// Anonymous logs, unknown signatures and legacy signatures yield `Ok(None)`.
pub fn decode_log(log: &RpcLog) -> Result<Option<Event>> {
    let Some(topic0) = log.topics.first() else {
        debug!(address = ?log.address, "Anonymous log, skipping");
        return Ok(None);
    };

    let Some(signature) = lookup_signature(topic0) else {
        debug!(topic = ?topic0, address = ?log.address, "Unrecognized log topic, skipping");
        return Ok(None);
    };

    let kind = match signature.kind {
        SignatureKind::Current(kind) => kind,
        SignatureKind::Legacy => {
            debug!(event = signature.name, "Legacy event, skipping");
            return Ok(None);
        }
    };

    let reader = LogReader {
        event: signature.name,
        log,
    };

    let event = match kind {
        EventKind::Created => {
            reader.require_words(2)?;
            Event::Created(CreatedEvent {
                entity_key: reader.key()?,
                owner_address: reader.address(2)?,
                expiration_block: reader.block(0, "expirationBlock")?,
                cost: reader.word(1),
            })
        }
        EventKind::Updated => {
            reader.require_words(3)?;
            Event::Updated(UpdatedEvent {
                entity_key: reader.key()?,
                owner_address: reader.address(2)?,
                old_expiration_block: reader.block(0, "oldExpirationBlock")?,
                new_expiration_block: reader.block(1, "newExpirationBlock")?,
                cost: reader.word(2),
            })
        }
        EventKind::Extended => {
            reader.require_words(3)?;
            Event::Extended(ExtendedEvent {
                entity_key: reader.key()?,
                owner_address: reader.address(2)?,
                old_expiration_block: reader.block(0, "oldExpirationBlock")?,
                new_expiration_block: reader.block(1, "newExpirationBlock")?,
                cost: reader.word(2),
            })
        }
        EventKind::Deleted => Event::Deleted(DeletedEvent {
            entity_key: reader.key()?,
            owner_address: reader.address(2)?,
        }),
        EventKind::Expired => Event::Expired(ExpiredEvent {
            entity_key: reader.key()?,
            owner_address: reader.address(2)?,
        }),
        EventKind::OwnerChanged => Event::OwnerChanged(OwnerChangedEvent {
            entity_key: reader.key()?,
            old_owner_address: reader.address(2)?,
            new_owner_address: reader.address(3)?,
        }),
    };

    Ok(Some(event))
}

/// Decode a log and keep it only if it is of `kind`.
pub fn decode_log_for(kind: EventKind, log: &RpcLog) -> Result<Option<Event>> {
    Ok(decode_log(log)?.filter(|event| event.kind() == kind))
}

struct LogReader<'a> {
    event: &'static str,
    log: &'a RpcLog,
}

impl LogReader<'_> {
    fn topic(&self, index: usize) -> Result<&H256> {
        self.log.topics.get(index).ok_or(DecodeError::MissingTopic {
            event: self.event,
            index,
        })
    }

    fn key(&self) -> Result<EntityKey> {
        Ok(EntityKey::from_bytes(self.topic(1)?.0))
    }

    // Address topics are left-padded to 32 bytes.
    fn address(&self, index: usize) -> Result<Address> {
        let topic = self.topic(index)?;
        Ok(H160::from_slice(&topic.as_bytes()[12..]))
    }

    fn require_words(&self, count: usize) -> Result<()> {
        let actual = self.log.data.len();
        let expected = count * WORD;
        if actual < expected {
            return Err(DecodeError::DataTooShort {
                event: self.event,
                expected,
                actual,
            });
        }
        Ok(())
    }

    // Callers check length with `require_words` first.
    fn word(&self, index: usize) -> U256 {
        let start = index * WORD;
        U256::from_big_endian(&self.log.data.as_slice()[start..start + WORD])
    }

    fn block(&self, index: usize, field: &'static str) -> Result<BlockNumber> {
        let value = self.word(index);
        if value.bits() > 64 {
            return Err(DecodeError::Overflow {
                event: self.event,
                field,
            });
        }
        Ok(value.low_u64())
    }
}
