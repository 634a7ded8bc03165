//! Compact JSON codec for QR-based device-to-device transfer.
//!
//! The payload has to fit inside a scannable QR image, so every byte counts:
//! single-letter field names, no whitespace, and default-valued fields are
//! omitted instead of emitted. Single letters are scoped *per object type* —
//! `i` is the investments array at the top level, an investment's own id
//! inside an investment object, and an account's id inside an account object.
//! Each entity therefore gets its own pair of pure encode/decode functions;
//! nothing in here shares a flat key namespace.
//!
//! Top-level keys, each present only when the collection is non-empty:
//!
//! | key | collection        |
//! |-----|-------------------|
//! | `b` | banks (with embedded accounts) |
//! | `p` | investment platforms |
//! | `i` | investments       |
//! | `e` | calendar events   |
//! | `r` | credentials       |
//!
//! The abbreviation table is a wire contract: both devices must agree on it
//! byte for byte, so the letters never change, even the colliding ones.

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;
