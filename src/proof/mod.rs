//! Offline Game Verification
//!
//! Provides verifiable game histories through:
//! - Game transcript recording
//! - A chained SHA-256 commitment over the whole history
//! - Verification by deterministic replay
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PROOF SYSTEM                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  transcript.rs   - Opening + move history, history chain    │
//! │  verify.rs       - Verification by replay                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod transcript;
pub mod verify;

// Re-export key types
pub use transcript::{GameTranscript, MoveRecord, TRANSCRIPT_VERSION};
pub use verify::{verify_transcript, VerificationError, VerificationResult};
