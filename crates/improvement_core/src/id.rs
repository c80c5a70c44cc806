//! Improvement id generation.

use crate::model::improvement::ImprovementId;
use uuid::Uuid;

const SHORT_ID_LEN: usize = 12;

/// Produces short, effectively-unique, URL-safe identifiers.
///
/// No ordering guarantee is implied between generated ids.
pub trait IdGenerator {
    fn generate(&self) -> ImprovementId;
}

/// Default generator: leading hex digits of a random v4 UUID.
///
/// The first 12 hex digits of a v4 UUID are all random (48 bits).
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortIdGenerator;

impl IdGenerator for ShortIdGenerator {
    fn generate(&self) -> ImprovementId {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(SHORT_ID_LEN);
        id
    }
}
