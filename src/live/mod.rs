//! Process-local registry of open live-update connections, keyed by member.
//!
//! A member may hold several connections at once (tabs, devices); each is an
//! unbounded channel whose receiving half feeds that connection's SSE stream.
//! Nothing here is persisted or shared across processes: a member without an
//! open connection simply misses the push and reconciles from the
//! notification store on reconnect.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// Wire payload pushed to clients. `kind` serializes as `type`.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub program_id: Option<String>,
    pub actor_member_id: Option<String>,
    pub title: String,
    pub body: String,
    pub created_at: String,
}

struct LiveConn {
    conn_id: u64,
    tx: mpsc::UnboundedSender<NotificationPayload>,
}

/// member_id → open connections. Cheap to clone; all clones share state.
#[derive(Clone, Default)]
pub struct LiveRegistry {
    members: Arc<DashMap<String, Vec<LiveConn>>>,
    next_conn_id: Arc<AtomicU64>,
}

impl LiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a connection for the member. The returned receiver feeds the
    /// member's live stream; the id is the handle for `unregister`.
    pub fn register(&self, member_id: &str) -> (u64, mpsc::UnboundedReceiver<NotificationPayload>) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.members
            .entry(member_id.to_string())
            .or_default()
            .push(LiveConn { conn_id, tx });
        (conn_id, rx)
    }

    /// Drops one connection; the member's entry is pruned when it was the
    /// last one.
    pub fn unregister(&self, member_id: &str, conn_id: u64) {
        if let Some(mut conns) = self.members.get_mut(member_id) {
            conns.retain(|c| c.conn_id != conn_id);
            let now_empty = conns.is_empty();
            drop(conns);
            if now_empty {
                self.members.remove_if(member_id, |_, v| v.is_empty());
            }
        }
    }

    /// Best-effort fan-out to every open connection of the member. A send
    /// failure means the receiving half is gone; that connection is dropped
    /// from the set and the failure never reaches the caller.
    pub fn push(&self, member_id: &str, payload: NotificationPayload) {
        let Some(mut conns) = self.members.get_mut(member_id) else {
            return;
        };
        conns.retain(|c| {
            let delivered = c.tx.send(payload.clone()).is_ok();
            if !delivered {
                debug!(member_id, conn_id = c.conn_id, "dropping dead live connection");
            }
            delivered
        });
        let now_empty = conns.is_empty();
        drop(conns);
        if now_empty {
            self.members.remove_if(member_id, |_, v| v.is_empty());
        }
    }

    pub fn connection_count(&self, member_id: &str) -> usize {
        self.members.get(member_id).map(|c| c.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(kind: &str) -> NotificationPayload {
        NotificationPayload {
            id: "n-1".to_string(),
            kind: kind.to_string(),
            program_id: Some("p-1".to_string()),
            actor_member_id: None,
            title: "t".to_string(),
            body: "b".to_string(),
            created_at: "2026-01-01T00:00:00.000".to_string(),
        }
    }

    #[tokio::test]
    async fn push_reaches_every_connection_of_the_member() {
        let registry = LiveRegistry::new();
        let (_, mut rx_a) = registry.register("m1");
        let (_, mut rx_b) = registry.register("m1");

        registry.push("m1", payload("program.member_left"));

        assert_eq!(rx_a.recv().await.unwrap().kind, "program.member_left");
        assert_eq!(rx_b.recv().await.unwrap().kind, "program.member_left");
    }

    #[tokio::test]
    async fn push_to_unknown_member_is_a_noop() {
        let registry = LiveRegistry::new();
        registry.push("nobody", payload("program.deleted"));
        assert_eq!(registry.connection_count("nobody"), 0);
    }

    #[tokio::test]
    async fn dead_connection_is_pruned_on_push() {
        let registry = LiveRegistry::new();
        let (_, rx_dead) = registry.register("m1");
        let (_, mut rx_live) = registry.register("m1");
        drop(rx_dead);

        registry.push("m1", payload("program.role_changed"));

        assert_eq!(registry.connection_count("m1"), 1);
        assert!(rx_live.recv().await.is_some());
    }

    #[tokio::test]
    async fn last_unregister_prunes_the_member_entry() {
        let registry = LiveRegistry::new();
        let (id_a, _rx_a) = registry.register("m1");
        let (id_b, _rx_b) = registry.register("m1");

        registry.unregister("m1", id_a);
        assert_eq!(registry.connection_count("m1"), 1);

        registry.unregister("m1", id_b);
        assert_eq!(registry.connection_count("m1"), 0);
        assert!(!registry.members.contains_key("m1"));
    }

    #[tokio::test]
    async fn members_are_isolated() {
        let registry = LiveRegistry::new();
        let (_, mut rx_m1) = registry.register("m1");
        let (_, mut rx_m2) = registry.register("m2");

        registry.push("m1", payload("program.deleted"));

        assert!(rx_m1.recv().await.is_some());
        assert!(rx_m2.try_recv().is_err());
    }
}
