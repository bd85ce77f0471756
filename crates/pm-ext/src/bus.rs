/// The real-time message bus. Broadcasts are assumed non-blocking,
/// best-effort, and may drop (§5); the core never awaits delivery
/// confirmation from a bus call before proceeding with a tick or a
/// transition.
#[async_trait::async_trait]
pub trait MessageBus: Send + Sync {
    /// Publishes `event` with `payload` (already serialized to the wire
    /// shape in §6) to every connection joined to `room`.
    async fn broadcast(&self, room: &str, event: &str, payload: serde_json::Value);
    async fn join(&self, conn: &str, room: &str);
    async fn leave(&self, conn: &str, room: &str);
}
