//! Matchmaking state machine.
//!
//! `Matchmaker` is the single owner of the live connection set, the waiting
//! pool and the session index. Every inbound event maps to one method here, and each method is a
//! complete transition: callers wrap the whole value in one lock and never
//! see a half-applied change. Nothing in this module sends anything; methods
//! return who has to be notified and the caller pushes after unlocking.

use std::collections::{HashMap, HashSet};

use super::{
    entity::Pair,
    event::EndReason,
    value_object::{ChatKind, ConnectionId, SessionId, Timestamp},
    waiting_pool::WaitingPool,
};

/// Where a connection currently is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Waiting(ChatKind),
    Paired(SessionId),
}

/// A session torn down by a leave, re-join or disconnect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndedSession {
    pub session_id: SessionId,
    /// The member that stays behind and has to be told
    pub remaining: ConnectionId,
    pub reason: EndReason,
    pub duration_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// No partner was available; the requester is now queued
    Waiting,
    /// The requester was matched with the oldest waiting connection
    Paired(Pair),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinResult {
    /// The requester's previous session, ended as an implicit leave
    pub ended: Option<EndedSession>,
    pub outcome: JoinOutcome,
}

/// Point-in-time counters for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchmakingSnapshot {
    pub waiting_text: usize,
    pub waiting_video: usize,
    pub active_sessions: usize,
}

#[derive(Debug, Default)]
pub struct Matchmaker {
    /// Connections between connect and disconnect. Only these may queue.
    connected: HashSet<ConnectionId>,
    pool: WaitingPool,
    sessions: HashMap<SessionId, Pair>,
    session_of: HashMap<ConnectionId, SessionId>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a freshly accepted connection. Returns `false` if it
    /// was already tracked.
    pub fn connect(&mut self, connection_id: ConnectionId) -> bool {
        self.connected.insert(connection_id)
    }

    pub fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        self.connected.contains(connection_id)
    }

    /// Handle a request to be paired for `kind`.
    ///
    /// A paired requester leaves its current session first, then the
    /// requester is removed from every queue, so duplicate requests and kind
    /// switches never leave it in two places.
    ///
    /// Returns `None` for a connection that is not (or no longer) connected,
    /// so a join that loses the race against its own disconnect cannot queue
    /// a dead peer.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        kind: ChatKind,
        now: Timestamp,
        new_session_id: impl FnOnce() -> SessionId,
    ) -> Option<JoinResult> {
        if !self.connected.contains(&connection_id) {
            tracing::debug!("Ignoring join from unknown connection '{}'", connection_id);
            return None;
        }

        let ended = self.end_session_of(&connection_id, EndReason::Left, now);
        self.clear_waiting(&connection_id);

        let Some(peer) = self.next_available_peer(kind, &connection_id) else {
            self.pool.enqueue(kind, connection_id);
            return Some(JoinResult {
                ended,
                outcome: JoinOutcome::Waiting,
            });
        };

        match Pair::new(new_session_id(), kind, peer, connection_id.clone(), now) {
            Ok(pair) => {
                for member in &pair.members {
                    self.session_of
                        .insert(member.clone(), pair.session_id.clone());
                }
                self.sessions.insert(pair.session_id.clone(), pair.clone());
                Some(JoinResult {
                    ended,
                    outcome: JoinOutcome::Paired(pair),
                })
            }
            Err(e) => {
                tracing::error!("Refusing to create pair: {}", e);
                self.pool.enqueue(kind, connection_id);
                Some(JoinResult {
                    ended,
                    outcome: JoinOutcome::Waiting,
                })
            }
        }
    }

    /// End `session_id` on behalf of `connection_id`.
    ///
    /// Returns `None` when the session is gone or `connection_id` is not a
    /// member of it.
    pub fn leave(
        &mut self,
        connection_id: &ConnectionId,
        session_id: &SessionId,
        now: Timestamp,
    ) -> Option<EndedSession> {
        if self.find_pair(connection_id, session_id).is_none() {
            return None;
        }
        self.end_session(session_id, connection_id, EndReason::Left, now)
    }

    /// Drop every trace of `connection_id`. Safe to call for idle connections.
    pub fn disconnect(
        &mut self,
        connection_id: &ConnectionId,
        now: Timestamp,
    ) -> Option<EndedSession> {
        self.connected.remove(connection_id);
        self.clear_waiting(connection_id);
        self.end_session_of(connection_id, EndReason::Disconnect, now)
    }

    /// The live pair `session_id` if `connection_id` is one of its members
    pub fn find_pair(&self, connection_id: &ConnectionId, session_id: &SessionId) -> Option<&Pair> {
        self.sessions
            .get(session_id)
            .filter(|pair| pair.contains(connection_id))
    }

    pub fn state_of(&self, connection_id: &ConnectionId) -> ConnectionState {
        if let Some(session_id) = self.session_of.get(connection_id) {
            return ConnectionState::Paired(session_id.clone());
        }
        match self.pool.waiting_kind(connection_id) {
            Some(kind) => ConnectionState::Waiting(kind),
            None => ConnectionState::Idle,
        }
    }

    pub fn snapshot(&self) -> MatchmakingSnapshot {
        MatchmakingSnapshot {
            waiting_text: self.pool.len(ChatKind::Text),
            waiting_video: self.pool.len(ChatKind::Video),
            active_sessions: self.sessions.len(),
        }
    }

    /// Pop waiting connections until one can actually be paired.
    ///
    /// A popped entry equal to the requester, or one that is already paired,
    /// is an invariant violation; it is logged and discarded.
    fn next_available_peer(
        &mut self,
        kind: ChatKind,
        requester: &ConnectionId,
    ) -> Option<ConnectionId> {
        while let Some(peer) = self.pool.dequeue_next(kind) {
            if &peer == requester {
                tracing::error!(
                    "Connection '{}' was still queued for {} after removal",
                    peer,
                    kind
                );
                continue;
            }
            if let Some(session_id) = self.session_of.get(&peer) {
                tracing::error!(
                    "Connection '{}' was queued for {} while paired in session {}",
                    peer,
                    kind,
                    session_id
                );
                continue;
            }
            return Some(peer);
        }
        None
    }

    fn clear_waiting(&mut self, connection_id: &ConnectionId) {
        let removed = self.pool.remove_if_present(connection_id);
        if removed > 1 {
            tracing::error!(
                "Connection '{}' was waiting in {} queue slots at once; cleared all of them",
                connection_id,
                removed
            );
        }
    }

    fn end_session_of(
        &mut self,
        connection_id: &ConnectionId,
        reason: EndReason,
        now: Timestamp,
    ) -> Option<EndedSession> {
        let session_id = self.session_of.get(connection_id)?.clone();
        self.end_session(&session_id, connection_id, reason, now)
    }

    /// Remove `session_id` and every reverse-index entry pointing at it.
    fn end_session(
        &mut self,
        session_id: &SessionId,
        initiator: &ConnectionId,
        reason: EndReason,
        now: Timestamp,
    ) -> Option<EndedSession> {
        let Some(pair) = self.sessions.remove(session_id) else {
            tracing::error!(
                "Connection '{}' pointed at missing session {}; clearing the stale entry",
                initiator,
                session_id
            );
            self.session_of.remove(initiator);
            return None;
        };

        for member in &pair.members {
            self.session_of.remove(member);
        }

        let remaining = pair.partner_of(initiator)?.clone();
        Some(EndedSession {
            session_id: pair.session_id,
            remaining,
            reason,
            duration_ms: pair.started_at.millis_until(now),
        })
    }
}
