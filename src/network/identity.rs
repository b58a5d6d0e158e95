use std::fs;
use std::path::Path;

use libp2p::identity;

use crate::error::{ChatError, Result};

/// Loads the node key from `path`, generating and saving a new one when the
/// file does not exist yet.
pub fn load_or_generate_key(path: impl AsRef<Path>) -> Result<identity::Keypair> {
    let path = path.as_ref();
    if path.exists() {
        let bytes = fs::read(path)?;
        let keypair = identity::Keypair::from_protobuf_encoding(&bytes)
            .map_err(|e| ChatError::Identity(format!("failed to decode key: {e}")))?;
        log::info!("Loaded identity key from {}", path.display());
        return Ok(keypair);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let keypair = identity::Keypair::generate_ed25519();
    let encoded = keypair
        .to_protobuf_encoding()
        .map_err(|e| ChatError::Identity(format!("failed to encode key: {e}")))?;
    fs::write(path, encoded)?;
    log::info!("Generated new identity key and saved to {}", path.display());
    Ok(keypair)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libp2p::PeerId;

    #[test]
    fn key_is_stable_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("relay_key.pk");

        let first = load_or_generate_key(&path).unwrap();
        let second = load_or_generate_key(&path).unwrap();

        assert_eq!(
            PeerId::from(first.public()),
            PeerId::from(second.public())
        );
    }

    #[test]
    fn corrupt_key_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay_key.pk");
        fs::write(&path, b"garbage").unwrap();

        assert!(matches!(
            load_or_generate_key(&path),
            Err(ChatError::Identity(_))
        ));
    }
}
