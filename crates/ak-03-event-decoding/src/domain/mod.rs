pub mod decoder;
pub mod receipt;
pub mod signatures;

pub use decoder::{decode_log, decode_log_for};
pub use receipt::to_receipt;
pub use signatures::{
    event_topic, lookup_signature, signature_for, topic_for, EventSignature, SignatureKind,
};
