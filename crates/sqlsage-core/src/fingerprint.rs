//! Schema fingerprinting.
//!
//! A fingerprint is a SHA-256 digest over a snapshot's canonical byte
//! serialization. Every string field is length-prefixed and every scalar is
//! encoded fixed-width little-endian, so the digest is stable across
//! processes and machine architectures. Equal snapshots always produce equal
//! fingerprints; any change to a column's type, nullability, or key role
//! produces a different one.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::snapshot::{KeyRole, SchemaSnapshot};

// ─── Fingerprint ─────────────────────────────────────────────────────────────

/// A 32-byte schema digest, displayed and serialized as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
  pub fn as_bytes(&self) -> &[u8; 32] { &self.0 }
}

impl fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&hex::encode(self.0))
  }
}

impl From<Fingerprint> for String {
  fn from(fp: Fingerprint) -> Self { fp.to_string() }
}

impl TryFrom<String> for Fingerprint {
  type Error = hex::FromHexError;

  fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl FromStr for Fingerprint {
  type Err = hex::FromHexError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(s, &mut bytes)?;
    Ok(Self(bytes))
  }
}

// ─── Computation ─────────────────────────────────────────────────────────────

/// Compute the fingerprint of a snapshot. Pure; performs no I/O.
pub fn fingerprint(snapshot: &SchemaSnapshot) -> Fingerprint {
  let mut hasher = Sha256::new();
  for col in snapshot.columns() {
    update_str(&mut hasher, &col.table);
    update_str(&mut hasher, &col.column);
    update_str(&mut hasher, &col.sql_type);
    hasher.update([col.nullable as u8]);
    hasher.update([encode_key_role(col.key)]);
  }
  Fingerprint(hasher.finalize().into())
}

/// Length-prefixed string encoding; prevents adjacent fields from gluing
/// together into the same digest input.
fn update_str(hasher: &mut Sha256, s: &str) {
  hasher.update((s.len() as u32).to_le_bytes());
  hasher.update(s.as_bytes());
}

fn encode_key_role(role: KeyRole) -> u8 {
  match role {
    KeyRole::None => 0,
    KeyRole::PrimaryKey => 1,
    KeyRole::ForeignKey => 2,
  }
}
