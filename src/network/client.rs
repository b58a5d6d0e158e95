use std::time::Duration;

use futures::StreamExt;
use libp2p::gossipsub::{self, IdentTopic};
use libp2p::multiaddr::Protocol;
use libp2p::swarm::{Config as SwarmConfig, SwarmEvent};
use libp2p::{Multiaddr, PeerId, Swarm, identify, identity};
use tokio::sync::mpsc;

use crate::common::{ConnectionState, NetworkCommand, NetworkEvent, OutboundEvent};
use crate::error::Result;

use super::behavior::{RelayBehavior, RelayBehaviorEvent, build_behavior};
use super::transport::build_transport;

enum SessionEnd {
    Disconnected,
    CommandsClosed,
}

/// Per-join state; dropped together with the swarm when the user leaves.
struct ActiveSession {
    room: String,
    local_peer_id: PeerId,
    /// Join announcement held back until a relay is subscribed to the topic.
    pending_join: Option<OutboundEvent>,
    pending_dials: usize,
    state: ConnectionState,
}

/// Network task of the chat client.
///
/// Idle until the first `join_room` event; then dials the relays and stays
/// connected until `Disconnect`. There is no reconnect: a lost or failed
/// connection is only reported.
pub struct RelayClient {
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
    relay_peers: Vec<(PeerId, Multiaddr)>,
    topic_name: String,
    idle_timeout: Duration,
}

impl RelayClient {
    pub fn new(
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
        relay_peers: Vec<(PeerId, Multiaddr)>,
        topic_name: impl Into<String>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            event_sender,
            command_receiver,
            relay_peers,
            topic_name: topic_name.into(),
            idle_timeout,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        log::info!("Network task started, waiting for a room join");

        while let Some(command) = self.command_receiver.recv().await {
            match command {
                NetworkCommand::Emit(join @ OutboundEvent::JoinRoom { .. }) => {
                    match self.run_session(join).await {
                        Ok(SessionEnd::Disconnected) => {}
                        Ok(SessionEnd::CommandsClosed) => break,
                        Err(err) => {
                            log::error!("Relay session failed: {err}");
                            self.send_event(NetworkEvent::ConnectionChanged(
                                ConnectionState::Failed(err.to_string()),
                            ))
                            .await;
                        }
                    }
                }
                NetworkCommand::Emit(event) => {
                    log::warn!("Not connected to a relay; dropping {event:?}");
                }
                NetworkCommand::Disconnect => {
                    log::debug!("Disconnect requested while idle");
                }
            }
        }

        log::info!("Command channel closed, network task stopping");
        Ok(())
    }

    async fn run_session(&mut self, join: OutboundEvent) -> Result<SessionEnd> {
        let local_key = identity::Keypair::generate_ed25519();
        let local_peer_id = PeerId::from(local_key.public());
        log::info!("Local PeerID: {local_peer_id}");

        let transport = build_transport(&local_key)?;
        let (behavior, topic) = build_behavior(&local_key, &self.topic_name)?;

        let mut swarm = Swarm::new(
            transport,
            behavior,
            local_peer_id,
            SwarmConfig::with_tokio_executor().with_idle_connection_timeout(self.idle_timeout),
        );

        let mut session = ActiveSession {
            room: join.room().to_string(),
            local_peer_id,
            pending_join: Some(join),
            pending_dials: 0,
            state: ConnectionState::Disconnected,
        };
        self.set_state(&mut session, ConnectionState::Connecting)
            .await;

        for (peer_id, addr) in &self.relay_peers {
            log::info!("Dialing relay {peer_id} at {addr}");
            match swarm.dial(addr.clone().with(Protocol::P2p(*peer_id))) {
                Ok(()) => session.pending_dials += 1,
                Err(err) => log::warn!("Failed to dial relay {peer_id}: {err}"),
            }
        }

        if session.pending_dials == 0 {
            let reason = if self.relay_peers.is_empty() {
                "no relay nodes configured"
            } else {
                "could not dial any relay node"
            };
            self.set_state(&mut session, ConnectionState::Failed(reason.to_string()))
                .await;
        }

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => match command {
                    Some(NetworkCommand::Emit(event)) => {
                        handle_emit(event, &mut swarm, &topic, &mut session);
                    }
                    Some(NetworkCommand::Disconnect) => {
                        log::info!("Leaving room {}, closing relay connections", session.room);
                        self.set_state(&mut session, ConnectionState::Disconnected).await;
                        return Ok(SessionEnd::Disconnected);
                    }
                    None => return Ok(SessionEnd::CommandsClosed),
                },
                event = swarm.select_next_some() => {
                    self.handle_swarm_event(event, &mut swarm, &topic, &mut session).await;
                }
            }
        }
    }

    async fn handle_swarm_event(
        &self,
        event: SwarmEvent<RelayBehaviorEvent>,
        swarm: &mut Swarm<RelayBehavior>,
        topic: &IdentTopic,
        session: &mut ActiveSession,
    ) {
        match event {
            SwarmEvent::Behaviour(RelayBehaviorEvent::Gossipsub(gossipsub::Event::Message {
                message,
                ..
            })) => {
                if message.source == Some(session.local_peer_id) {
                    return;
                }
                match OutboundEvent::from_bytes(&message.data) {
                    Ok(event) => {
                        if let Some(inbound) = event.into_inbound(&session.room) {
                            self.send_event(NetworkEvent::Inbound(inbound)).await;
                        }
                    }
                    Err(err) => log::debug!("Ignoring undecodable relay payload: {err}"),
                }
            }
            SwarmEvent::Behaviour(RelayBehaviorEvent::Gossipsub(gossipsub::Event::Subscribed {
                peer_id,
                topic: subscribed,
            })) => {
                if subscribed != topic.hash() {
                    return;
                }
                log::info!("Peer {peer_id} subscribed to {subscribed}");
                if session.state != ConnectionState::Connected {
                    self.set_state(session, ConnectionState::Connected).await;
                    if let Some(join) = session.pending_join.take() {
                        publish(swarm, topic, &join);
                    }
                }
            }
            SwarmEvent::Behaviour(RelayBehaviorEvent::Identify(identify::Event::Received {
                peer_id,
                info,
                ..
            })) => {
                log::debug!("Identify info from {peer_id}: agent={}", info.agent_version);
            }
            SwarmEvent::ConnectionEstablished {
                peer_id, endpoint, ..
            } => {
                if endpoint.is_dialer() {
                    session.pending_dials = session.pending_dials.saturating_sub(1);
                }
                log::info!("Connected to {peer_id}");
            }
            SwarmEvent::OutgoingConnectionError { peer_id, error, .. } => {
                session.pending_dials = session.pending_dials.saturating_sub(1);
                log::warn!("Failed to reach relay {peer_id:?}: {error}");
                if session.pending_dials == 0 && swarm.connected_peers().next().is_none() {
                    self.set_state(session, ConnectionState::Failed(error.to_string()))
                        .await;
                }
            }
            SwarmEvent::ConnectionClosed {
                peer_id,
                num_established,
                ..
            } => {
                if num_established > 0 {
                    return;
                }
                log::info!("Connection to {peer_id} closed");
                if swarm.connected_peers().next().is_none()
                    && session.state == ConnectionState::Connected
                {
                    self.set_state(session, ConnectionState::Disconnected).await;
                }
            }
            _ => {}
        }
    }

    async fn set_state(&self, session: &mut ActiveSession, state: ConnectionState) {
        if session.state == state {
            return;
        }
        log::info!("Relay connection {state}");
        session.state = state.clone();
        self.send_event(NetworkEvent::ConnectionChanged(state)).await;
    }

    async fn send_event(&self, event: NetworkEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }
}

fn handle_emit(
    event: OutboundEvent,
    swarm: &mut Swarm<RelayBehavior>,
    topic: &IdentTopic,
    session: &mut ActiveSession,
) {
    if let OutboundEvent::JoinRoom { room, .. } = &event {
        session.room = room.clone();
    }
    if session.state != ConnectionState::Connected {
        if matches!(event, OutboundEvent::JoinRoom { .. }) {
            session.pending_join = Some(event);
        } else {
            log::warn!("Relay not connected; dropping {event:?}");
        }
        return;
    }
    publish(swarm, topic, &event);
}

fn publish(swarm: &mut Swarm<RelayBehavior>, topic: &IdentTopic, event: &OutboundEvent) {
    match event.to_bytes() {
        Ok(bytes) => {
            if let Err(err) = swarm
                .behaviour_mut()
                .gossipsub
                .publish(topic.clone(), bytes)
            {
                log::warn!("Publish error: {err:?}");
            }
        }
        Err(err) => log::warn!("Failed to serialize event: {err:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join_without_relays_reports_failure_and_stops_on_close() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let client = RelayClient::new(
            event_tx,
            cmd_rx,
            Vec::new(),
            "room-chat-test",
            Duration::from_secs(5),
        );
        let task = tokio::spawn(client.run());

        cmd_tx
            .send(NetworkCommand::Emit(OutboundEvent::JoinRoom {
                room: "room-1".into(),
                username: "alice".into(),
            }))
            .await
            .unwrap();

        loop {
            match event_rx.recv().await {
                Some(NetworkEvent::ConnectionChanged(ConnectionState::Failed(_))) => break,
                Some(_) => continue,
                None => panic!("network task stopped before reporting failure"),
            }
        }

        cmd_tx.send(NetworkCommand::Disconnect).await.unwrap();
        drop(cmd_tx);

        assert!(task.await.unwrap().is_ok());
    }

    fn message(text: &str) -> NetworkCommand {
        NetworkCommand::Emit(OutboundEvent::Message {
            room: "room-1".into(),
            message: text.into(),
            sender: "alice".into(),
        })
    }

    #[tokio::test]
    async fn idle_client_stays_silent_until_join() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let client = RelayClient::new(
            event_tx,
            cmd_rx,
            Vec::new(),
            "room-chat-test",
            Duration::from_secs(5),
        );
        let task = tokio::spawn(client.run());

        cmd_tx.send(message("too early")).await.unwrap();
        cmd_tx.send(NetworkCommand::Disconnect).await.unwrap();
        drop(cmd_tx);

        assert!(task.await.unwrap().is_ok());
        assert_eq!(event_rx.recv().await, None);
    }

    #[tokio::test]
    async fn message_without_connection_is_dropped() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let client = RelayClient::new(
            event_tx,
            cmd_rx,
            Vec::new(),
            "room-chat-test",
            Duration::from_secs(5),
        );
        let task = tokio::spawn(client.run());

        cmd_tx
            .send(NetworkCommand::Emit(OutboundEvent::JoinRoom {
                room: "room-1".into(),
                username: "alice".into(),
            }))
            .await
            .unwrap();

        loop {
            match event_rx.recv().await {
                Some(NetworkEvent::ConnectionChanged(ConnectionState::Failed(_))) => break,
                Some(NetworkEvent::ConnectionChanged(ConnectionState::Connecting)) => continue,
                other => panic!("unexpected event before failure: {other:?}"),
            }
        }

        cmd_tx.send(message("lost")).await.unwrap();
        drop(cmd_tx);

        assert!(task.await.unwrap().is_ok());
        assert_eq!(event_rx.recv().await, None);
    }
}
