//! Double-buffered capture pipeline.
//!
//! ```text
//! [AudioSource] → reader thread → SlotPair (2 slots, depth-1 handoff) → writer thread → [Storage file]
//! ```

pub mod reader;
pub mod slots;
pub mod writer;
