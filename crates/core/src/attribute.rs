// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Segment attribute identifiers and update deltas

use std::fmt;
use uuid::Uuid;

/// Identifier of a single segment attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub Uuid);

impl AttributeId {
    /// Generate a random attribute id
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_parts(msb: u64, lsb: u64) -> Self {
        Self(Uuid::from_u64_pair(msb, lsb))
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an update does to one attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeValue {
    /// Insert or overwrite the attribute with this value
    Upsert(i64),
    /// Remove the attribute
    Delete,
}

/// A single attribute delta
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeUpdate {
    pub id: AttributeId,
    pub value: AttributeValue,
}

impl AttributeUpdate {
    pub fn upsert(id: AttributeId, value: i64) -> Self {
        Self {
            id,
            value: AttributeValue::Upsert(value),
        }
    }

    pub fn delete(id: AttributeId) -> Self {
        Self {
            id,
            value: AttributeValue::Delete,
        }
    }
}
