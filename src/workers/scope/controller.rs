use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use crossbeam::channel::{Receiver, RecvTimeoutError, Sender};
use tokio::task::{self, AbortHandle};

use crate::{
    features::scope::{
        connection::ClusterConnector,
        message::{ScopeMessage, ScopeRequest, ScopeResponse},
        provider::ScopeListProvider,
    },
    logger,
    message::Message,
    scope::ScopeQuery,
};

use super::worker::AbortWorker;

pub type SharedScopeListProvider = Arc<dyn ScopeListProvider>;

#[derive(Clone)]
struct ListWorker {
    tx: Sender<Message>,
    provider: SharedScopeListProvider,
    generation: u64,
}

#[async_trait]
impl AbortWorker for ListWorker {
    async fn run(&self) {
        let result = self.provider.fetch().await;

        if let Err(err) = self.tx.send(
            ScopeResponse::List {
                generation: self.generation,
                result,
            }
            .into(),
        ) {
            logger!(error, "Failed to send ScopeResponse::List: {}", err);
        }
    }
}

#[derive(Clone)]
struct ConnectionWorker {
    tx: Sender<Message>,
    connector: ClusterConnector,
    cluster: String,
}

#[async_trait]
impl AbortWorker for ConnectionWorker {
    async fn run(&self) {
        let result = self.connector.connect(&self.cluster).await;

        if let Err(err) = &result {
            logger!(error, "Failed to connect to {}: {:?}", self.cluster, err);
        }

        if let Err(err) = self.tx.send(
            ScopeResponse::Connection {
                cluster: self.cluster.clone(),
                result,
            }
            .into(),
        ) {
            logger!(error, "Failed to send ScopeResponse::Connection: {}", err);
        }
    }
}

pub struct ScopeController {
    tx: Sender<Message>,
    rx: Receiver<Message>,
    provider: SharedScopeListProvider,
    connector: Option<ClusterConnector>,
}

impl ScopeController {
    pub fn new(
        tx: Sender<Message>,
        rx: Receiver<Message>,
        provider: SharedScopeListProvider,
        connector: Option<ClusterConnector>,
    ) -> Self {
        Self {
            tx,
            rx,
            provider,
            connector,
        }
    }

    /// Runs until the request channel is closed.
    pub async fn run(self) -> Result<()> {
        let Self {
            tx,
            rx,
            provider,
            connector,
        } = self;

        let mut list_handler: Option<AbortHandle> = None;
        let mut connection_handler: Option<AbortHandle> = None;

        loop {
            let rx = rx.clone();

            let task = task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(1)));

            let Ok(recv) = task.await else { continue };

            match recv {
                Ok(Message::Scope(ScopeMessage::Request(req))) => match req {
                    ScopeRequest::List { generation } => {
                        if let Some(handler) = list_handler.take() {
                            handler.abort();
                        }

                        list_handler = Some(
                            ListWorker {
                                tx: tx.clone(),
                                provider: provider.clone(),
                                generation,
                            }
                            .spawn(),
                        );

                        task::yield_now().await;
                    }

                    ScopeRequest::Set(scope) => {
                        let Some(connector) = &connector else {
                            continue;
                        };

                        let query = ScopeQuery::from_selection(&scope);
                        let cluster = query.to_request_param();

                        if cluster.is_empty() {
                            logger!(info, "No single cluster selected ({}), skip connection", scope);
                            continue;
                        }

                        if let Some(handler) = connection_handler.take() {
                            handler.abort();
                        }

                        connection_handler = Some(
                            ConnectionWorker {
                                tx: tx.clone(),
                                connector: connector.clone(),
                                cluster: cluster.to_string(),
                            }
                            .spawn(),
                        );

                        task::yield_now().await;
                    }
                },

                Ok(msg) => {
                    logger!(debug, "Unhandled message {:?}", msg);
                }

                Err(RecvTimeoutError::Timeout) => {}

                Err(RecvTimeoutError::Disconnected) => {
                    for handler in [list_handler, connection_handler].into_iter().flatten() {
                        handler.abort();
                    }

                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use crossbeam::channel::unbounded;
    use pretty_assertions::assert_eq;

    use crate::features::scope::{
        connection::ClusterRegistry,
        provider::{mock::MockTestScopeListProvider, ScopeList},
    };

    use super::*;

    async fn recv(rx: &Receiver<Message>, timeout: Duration) -> Option<Message> {
        let rx = rx.clone();
        task::spawn_blocking(move || rx.recv_timeout(timeout).ok())
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_response_carries_generation() {
        let mut provider = MockTestScopeListProvider::new();
        provider
            .expect_fetch()
            .returning(|| Ok(ScopeList::new(vec!["c1".into(), "c2".into()])));

        let (tx_req, rx_req) = unbounded();
        let (tx_res, rx_res) = unbounded();

        let handle =
            tokio::spawn(ScopeController::new(tx_res, rx_req, Arc::new(provider), None).run());

        tx_req.send(ScopeRequest::List { generation: 3 }.into()).unwrap();

        let Some(Message::Scope(ScopeMessage::Response(ScopeResponse::List {
            generation,
            result,
        }))) = recv(&rx_res, Duration::from_secs(5)).await
        else {
            panic!("no list response");
        };

        assert_eq!(generation, 3);
        assert_eq!(result.unwrap().items, vec!["c1", "c2"]);

        drop(tx_req);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fetch_error_is_forwarded() {
        let mut provider = MockTestScopeListProvider::new();
        provider
            .expect_fetch()
            .returning(|| Err(anyhow!("connection refused")));

        let (tx_req, rx_req) = unbounded();
        let (tx_res, rx_res) = unbounded();

        let handle =
            tokio::spawn(ScopeController::new(tx_res, rx_req, Arc::new(provider), None).run());

        tx_req.send(ScopeRequest::List { generation: 1 }.into()).unwrap();

        let Some(Message::Scope(ScopeMessage::Response(ScopeResponse::List { result, .. }))) =
            recv(&rx_res, Duration::from_secs(5)).await
        else {
            panic!("no list response");
        };

        assert_eq!(result.unwrap_err().to_string(), "connection refused");

        drop(tx_req);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_without_connector_is_ignored() {
        let provider = MockTestScopeListProvider::new();

        let (tx_req, rx_req) = unbounded();
        let (tx_res, rx_res) = unbounded();

        let handle =
            tokio::spawn(ScopeController::new(tx_res, rx_req, Arc::new(provider), None).run());

        tx_req.send(ScopeRequest::Set("c1".into()).into()).unwrap();

        assert!(recv(&rx_res, Duration::from_millis(300)).await.is_none());

        drop(tx_req);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn all_scopes_skip_connection() {
        let provider = MockTestScopeListProvider::new();
        let connector = ClusterConnector::new(ClusterRegistry::default(), None);

        let (tx_req, rx_req) = unbounded();
        let (tx_res, rx_res) = unbounded();

        let handle = tokio::spawn(
            ScopeController::new(tx_res, rx_req, Arc::new(provider), Some(connector)).run(),
        );

        tx_req.send(ScopeRequest::Set("_all".into()).into()).unwrap();

        assert!(recv(&rx_res, Duration::from_millis(300)).await.is_none());

        drop(tx_req);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn connection_error_is_forwarded() {
        let provider = MockTestScopeListProvider::new();
        let connector = ClusterConnector::new(ClusterRegistry::default(), None);

        let (tx_req, rx_req) = unbounded();
        let (tx_res, rx_res) = unbounded();

        let handle = tokio::spawn(
            ScopeController::new(tx_res, rx_req, Arc::new(provider), Some(connector)).run(),
        );

        tx_req.send(ScopeRequest::Set("prodV4-1".into()).into()).unwrap();

        let Some(Message::Scope(ScopeMessage::Response(ScopeResponse::Connection {
            cluster,
            result,
        }))) = recv(&rx_res, Duration::from_secs(5)).await
        else {
            panic!("no connection response");
        };

        assert_eq!(cluster, "prodV4-1");
        assert_eq!(
            result.unwrap_err().to_string(),
            "KUBE_CONFIG_DIR should not be empty"
        );

        drop(tx_req);
        handle.await.unwrap().unwrap();
    }
}
