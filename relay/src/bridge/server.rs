use anyhow::Context;
use log::info;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{mpsc, Arc, PoisonError, RwLock},
    thread,
};
use sweepcore::prelude::{PublishError, SweepPublisher};
use sweepcore::telemetry::PipelineMetrics;
use sweepcore::{LatestSender, SpokeMessage, SweepEnvelope};
use tokio::runtime::Builder;
use warp::hyper::body::Bytes;
use warp::{http::StatusCode, path::Tail, Filter};

use crate::bridge::model::SweepBoard;

const MAX_SPOKE_BYTES: u64 = 1 << 20;

/// HTTP bridge accepting raw spokes and serving the latest published sweeps.
///
/// - `POST /spoke` with headers `x-message-id` and optional `x-sender-stamp`
/// - `GET /sweep/<topic>`
/// - `GET /metrics`
#[derive(Clone, Default)]
pub struct SweepBridge {
    board: Arc<RwLock<SweepBoard>>,
}

impl SweepBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(
        &self,
        spokes: LatestSender,
        metrics: Arc<PipelineMetrics>,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let board = self.board.clone();
        let board_filter = warp::any().map(move || board.clone());
        let spokes_filter = warp::any().map(move || spokes.clone());
        let metrics_filter = warp::any().map(move || metrics.clone());

        let spoke_route = warp::path("spoke")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::header::<u32>("x-message-id"))
            .and(warp::header::optional::<u32>("x-sender-stamp"))
            .and(warp::body::content_length_limit(MAX_SPOKE_BYTES))
            .and(warp::body::bytes())
            .and(spokes_filter)
            .map(
                |message_id: u32, sender_stamp: Option<u32>, body: Bytes, spokes: LatestSender| {
                    let message =
                        SpokeMessage::new(message_id, sender_stamp.unwrap_or(0), body.to_vec());
                    match spokes.offer(message) {
                        Ok(()) => warp::reply::with_status(
                            warp::reply::json(&json!({"status": "accepted"})),
                            StatusCode::ACCEPTED,
                        ),
                        Err(err) => warp::reply::with_status(
                            warp::reply::json(&json!({"status": "closed", "error": err.to_string()})),
                            StatusCode::SERVICE_UNAVAILABLE,
                        ),
                    }
                },
            );

        let sweep_route = warp::path("sweep")
            .and(warp::path::tail())
            .and(warp::get())
            .and(board_filter)
            .map(|tail: Tail, board: Arc<RwLock<SweepBoard>>| {
                let topic = tail.as_str();
                let guard = board.read().unwrap_or_else(PoisonError::into_inner);
                match guard.latest(topic) {
                    Some(envelope) => {
                        warp::reply::with_status(warp::reply::json(envelope), StatusCode::OK)
                    }
                    None => warp::reply::with_status(
                        warp::reply::json(&json!({"status": "no sweep", "topic": topic})),
                        StatusCode::NOT_FOUND,
                    ),
                }
            });

        let metrics_route = warp::path("metrics")
            .and(warp::path::end())
            .and(warp::get())
            .and(metrics_filter)
            .map(|metrics: Arc<PipelineMetrics>| warp::reply::json(&metrics.snapshot()));

        spoke_route.or(sweep_route).or(metrics_route)
    }

    /// Serves the bridge on its own thread. Returns once the listener is
    /// bound, with the bound address, or with the bind failure.
    pub fn serve(
        &self,
        bind: SocketAddr,
        spokes: LatestSender,
        metrics: Arc<PipelineMetrics>,
    ) -> anyhow::Result<SocketAddr> {
        let routes = self.routes(spokes, metrics);
        let (bound_tx, bound_rx) = mpsc::channel::<anyhow::Result<SocketAddr>>();
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = bound_tx.send(Err(err).context("building bridge runtime"));
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(routes).try_bind_ephemeral(bind) {
                    Ok((address, server)) => {
                        let _ = bound_tx.send(Ok(address));
                        server.await;
                    }
                    Err(err) => {
                        let failure = Err(err)
                            .with_context(|| format!("binding sweep bridge on {}", bind));
                        let _ = bound_tx.send(failure);
                    }
                }
            });
        });

        let address = bound_rx
            .recv()
            .context("sweep bridge thread exited before binding")??;
        info!("Sweep bridge listening on {}", address);
        Ok(address)
    }

    pub fn publisher(&self) -> BridgePublisher {
        BridgePublisher {
            board: self.board.clone(),
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> SweepBoard {
        self.board
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Publishes sweeps onto the bridge's board.
pub struct BridgePublisher {
    board: Arc<RwLock<SweepBoard>>,
}

impl SweepPublisher for BridgePublisher {
    fn publish(&mut self, topic: &str, envelope: &SweepEnvelope) -> Result<(), PublishError> {
        let mut guard = self
            .board
            .write()
            .map_err(|_| PublishError::Unavailable("sweep board lock poisoned".into()))?;
        guard.record(topic, envelope);
        Ok(())
    }
}
