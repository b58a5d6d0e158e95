use libp2p::multiaddr::Protocol;
use libp2p::{Multiaddr, PeerId};

use crate::error::{ChatError, Result};

/// Splits `/ip4/.../tcp/4001/p2p/<PeerId>` into the peer id and the dialable
/// address without the `/p2p` suffix.
pub fn parse_relay_addr(entry: &str) -> Result<(PeerId, Multiaddr)> {
    let mut addr: Multiaddr = entry.parse().map_err(|err| ChatError::InvalidAddress {
        address: entry.to_string(),
        reason: format!("{err}"),
    })?;

    match addr.pop() {
        Some(Protocol::P2p(peer_id)) => Ok((peer_id, addr)),
        _ => Err(ChatError::InvalidAddress {
            address: entry.to_string(),
            reason: "missing /p2p/<PeerId> suffix".to_string(),
        }),
    }
}

/// Parses every configured relay, skipping (and logging) invalid entries.
pub fn parse_relay_peers(entries: &[String]) -> Vec<(PeerId, Multiaddr)> {
    entries
        .iter()
        .filter_map(|entry| match parse_relay_addr(entry) {
            Ok(peer) => Some(peer),
            Err(err) => {
                log::warn!("{err}");
                None
            }
        })
        .collect()
}
