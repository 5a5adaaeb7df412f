//! Pipeline stages for the scan.
//!
//! Each submodule implements exactly one transformation step, keeping the
//! stages independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! prepare ───────────▶ extract
//! (decode, downscale,  (one structured-extraction
//!  JPEG, base64)        call to the VLM)
//! ```
//!
//! 1. [`prepare`] — decode the source image, downscale to the width bound,
//!    re-encode at fixed JPEG quality; runs in `spawn_blocking` because
//!    image codecs are CPU-bound
//! 2. [`extract`] — the only stage with network I/O; a single atomic call
//!    that either yields the full record list or fails

pub mod extract;
pub mod prepare;
