use libp2p::core::muxing::StreamMuxerBox;
use libp2p::core::transport::Boxed;
use libp2p::core::upgrade::Version;
use libp2p::{PeerId, Transport, dns, identity, noise, tcp, yamux};

use crate::error::{ChatError, Result};

/// TCP with DNS resolution, upgraded with noise and yamux.
pub fn build_transport(local_key: &identity::Keypair) -> Result<Boxed<(PeerId, StreamMuxerBox)>> {
    let noise_config = noise::Config::new(local_key).map_err(ChatError::network)?;

    let tcp_transport = tcp::tokio::Transport::new(tcp::Config::default().nodelay(true));
    let transport = dns::tokio::Transport::system(tcp_transport)?
        .upgrade(Version::V1)
        .authenticate(noise_config)
        .multiplex(yamux::Config::default())
        .boxed();

    Ok(transport)
}
