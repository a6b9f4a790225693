//! Shared helpers for integration tests

use parley::session::SledBlobStore;
use tempfile::TempDir;

/// Create a sled blob store in a fresh temporary directory
///
/// The TempDir must be kept alive for the duration of the test.
pub fn create_temp_blobs() -> (SledBlobStore, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let blobs = SledBlobStore::new(tmp.path().join("sessions")).expect("Failed to open blob store");
    (blobs, tmp)
}
