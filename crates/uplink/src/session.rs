//! Session identity binding.
//!
//! The simulator issues an opaque session id at creation; every later
//! message must carry it. A stale connection can deliver a late message
//! for a previous session, so anything with a foreign id is dropped
//! before it can ghost into the store.

use crate::messages::Inbound;

/// Tracks the bound session id and filters inbound messages against it.
#[derive(Debug, Default)]
pub struct SessionBinding {
    bound: Option<String>,
}

impl SessionBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to a session id (from session-created). Rebinding replaces
    /// the previous session.
    pub fn bind(&mut self, session_id: &str) {
        if let Some(prev) = &self.bound {
            if prev != session_id {
                log::info!("Rebinding session {} -> {}", prev, session_id);
            }
        }
        self.bound = Some(session_id.to_string());
    }

    pub fn id(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Clear the binding (session teardown).
    pub fn clear(&mut self) {
        self.bound = None;
    }

    /// True if `msg` belongs to the bound session. Session-created
    /// messages always pass; they establish the binding.
    pub fn accepts(&self, msg: &Inbound) -> bool {
        if matches!(msg, Inbound::SessionCreated { .. }) {
            return true;
        }
        match &self.bound {
            Some(id) => {
                let ok = msg.session_id() == id;
                if !ok {
                    log::debug!(
                        "Dropping message for foreign session {:?}",
                        msg.session_id()
                    );
                }
                ok
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_for(id: &str) -> Inbound {
        serde_json::from_str(&format!(
            r#"{{"event":"state_update","session_id":"{id}"}}"#
        ))
        .unwrap()
    }

    #[test]
    fn foreign_session_dropped() {
        let mut binding = SessionBinding::new();
        binding.bind("D1");
        assert!(binding.accepts(&update_for("D1")));
        assert!(!binding.accepts(&update_for("D2")));
    }

    #[test]
    fn unbound_drops_everything_but_creation() {
        let binding = SessionBinding::new();
        assert!(!binding.accepts(&update_for("D1")));
        let created: Inbound = serde_json::from_str(
            r#"{"event":"session_created","session_id":"D1"}"#,
        )
        .unwrap();
        assert!(binding.accepts(&created));
    }

    #[test]
    fn rebind_switches_session() {
        let mut binding = SessionBinding::new();
        binding.bind("D1");
        binding.bind("D2");
        assert!(!binding.accepts(&update_for("D1")));
        assert!(binding.accepts(&update_for("D2")));
    }

    #[test]
    fn foreign_update_never_reaches_store() {
        let mut binding = SessionBinding::new();
        binding.bind("D1");
        let mut store = console_core::Store::new();
        let before = store.state().vehicle.position;

        let msg: Inbound = serde_json::from_str(
            r#"{"event":"state_update","session_id":"D2","state":{"position":[10.0,10.0,10.0],"rotation":[0.0,0.0,0.0]}}"#,
        )
        .unwrap();
        if binding.accepts(&msg) {
            if let Inbound::StateUpdate {
                state: Some(snapshot),
                ..
            } = msg
            {
                store.apply_vehicle_update(&snapshot.into_update().unwrap());
            }
        }

        assert_eq!(store.state().vehicle.position, before);
        assert!(!store.state().pose_received);
    }
}
