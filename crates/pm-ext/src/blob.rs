/// Replay/blob storage. `put` is the only operation the core needs.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads `bytes` and returns a retrievable uri.
    async fn put(&self, bytes: &[u8]) -> anyhow::Result<String>;
}
