use elsa_dashboard::api::{
    DataClient, GeoFeatureCollection, RawAnimationRecord, RawBarRecord, RawMapRecord,
    RawScatterRecord,
};
use elsa_dashboard::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

/// A finished download, delivered to the event loop.
#[derive(Debug)]
pub enum FetchOutcome {
    Bar(Result<Vec<RawBarRecord>>),
    Scatter(Result<Vec<RawScatterRecord>>),
    Map(Result<Vec<RawMapRecord>>),
    Geo(Result<GeoFeatureCollection>),
    Animation(Result<Vec<RawAnimationRecord>>),
}

/// Every dataset, fetched concurrently for headless runs.
#[derive(Debug)]
pub struct Datasets {
    pub bar: Result<Vec<RawBarRecord>>,
    pub scatter: Result<Vec<RawScatterRecord>>,
    pub map: Result<Vec<RawMapRecord>>,
    pub geo: Result<GeoFeatureCollection>,
    pub animation: Result<Vec<RawAnimationRecord>>,
}

#[derive(Debug, Clone)]
pub struct AppActions {
    pub client: DataClient,
}

impl AppActions {
    pub fn new(api_base: &str) -> Self {
        Self {
            client: DataClient::new(api_base),
        }
    }

    /// Starts one task per endpoint; each sends its outcome once.
    pub fn spawn_fetches(&self, tx: &UnboundedSender<FetchOutcome>) {
        spawn_fetch(tx, self.client.clone(), |client| async move {
            FetchOutcome::Bar(client.bar_chart_data().await)
        });
        spawn_fetch(tx, self.client.clone(), |client| async move {
            FetchOutcome::Scatter(client.scatter_data().await)
        });
        spawn_fetch(tx, self.client.clone(), |client| async move {
            FetchOutcome::Map(client.map_chart_data().await)
        });
        spawn_fetch(tx, self.client.clone(), |client| async move {
            FetchOutcome::Geo(client.geo().await)
        });
        spawn_fetch(tx, self.client.clone(), |client| async move {
            FetchOutcome::Animation(client.animation().await)
        });
    }

    pub async fn fetch_all(&self) -> Datasets {
        let (bar, scatter, map, geo, animation) = tokio::join!(
            self.client.bar_chart_data(),
            self.client.scatter_data(),
            self.client.map_chart_data(),
            self.client.geo(),
            self.client.animation(),
        );
        Datasets {
            bar,
            scatter,
            map,
            geo,
            animation,
        }
    }
}

fn spawn_fetch<F, Fut>(tx: &UnboundedSender<FetchOutcome>, client: DataClient, fetch: F)
where
    F: FnOnce(DataClient) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = FetchOutcome> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = fetch(client).await;
        if tx.send(outcome).is_err() {
            error!("event loop stopped before a fetch finished");
        }
    });
}
