// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what a training record IS,
// what the end-of-sequence terminator IS, and what can go
// wrong while preparing a dataset.
//
// Rules for this layer:
//   - NO burn types here
//   - NO file I/O
//   - Only structs, enums, and traits
//
// Everything above (application) and below (data, infra)
// speaks in these types.

// A single training record: the text field plus any other columns
pub mod record;

// The non-empty terminator string appended to every record
pub mod terminator;

// Typed errors raised while loading or formatting records
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
