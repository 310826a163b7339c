use async_trait::async_trait;
use tokio::task::AbortHandle;

/// Task spawned on the scope worker runtime and aborted when superseded.
#[async_trait]
pub trait AbortWorker {
    async fn run(&self);

    fn spawn(&self) -> AbortHandle
    where
        Self: Clone + Send + Sync + 'static,
    {
        let worker = self.clone();
        tokio::spawn(async move { worker.run().await }).abort_handle()
    }
}
