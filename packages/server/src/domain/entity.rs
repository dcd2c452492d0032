//! Entities of the matchmaking domain.

use super::{
    error::DomainError,
    value_object::{ChatKind, ConnectionId, SessionId, Timestamp},
};

/// One live one-to-one chat session.
///
/// The two members form an unordered set: either one may send or receive
/// in any given event, and `members` lists exactly the connections that
/// receive relayed traffic for this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub session_id: SessionId,
    pub kind: ChatKind,
    pub members: [ConnectionId; 2],
    pub started_at: Timestamp,
}

impl Pair {
    pub fn new(
        session_id: SessionId,
        kind: ChatKind,
        first: ConnectionId,
        second: ConnectionId,
        started_at: Timestamp,
    ) -> Result<Self, DomainError> {
        if first == second {
            return Err(DomainError::SelfPairing(first.into_string()));
        }
        Ok(Self {
            session_id,
            kind,
            members: [first, second],
            started_at,
        })
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    /// The other member of the pair, or `None` if `connection_id` is not a member
    pub fn partner_of(&self, connection_id: &ConnectionId) -> Option<&ConnectionId> {
        let [a, b] = &self.members;
        if a == connection_id {
            Some(b)
        } else if b == connection_id {
            Some(a)
        } else {
            None
        }
    }

    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.to_vec()
    }
}
