use futures::StreamExt;
use futures::stream::FuturesUnordered;

use crate::assets::graph::AssetGraph;
use crate::assets::io::AssetReaderVariant;
use crate::errors::Result;

/// Identifies one registered load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Terrain,
    Character,
    Ambience,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub kind: AssetKind,
    pub uri: String,
}

/// Decoded asset content.
#[derive(Debug)]
pub enum Payload {
    Graph(AssetGraph),
    /// Encoded audio, handed to the host's audio engine as is.
    Audio(Vec<u8>),
}

#[derive(Debug)]
pub struct LoadResult {
    pub ticket: LoadTicket,
    pub kind: AssetKind,
    pub outcome: Result<Payload>,
}

/// Reads and decodes one request.
pub async fn fetch(reader: &AssetReaderVariant, request: LoadRequest) -> LoadResult {
    log::info!("Loading {}", reader.describe(&request.uri));
    let outcome = decode(reader, &request).await;
    LoadResult {
        ticket: request.ticket,
        kind: request.kind,
        outcome,
    }
}

async fn decode(reader: &AssetReaderVariant, request: &LoadRequest) -> Result<Payload> {
    match request.kind {
        AssetKind::Terrain | AssetKind::Character => load_model(reader, &request.uri)
            .await
            .map(Payload::Graph),
        AssetKind::Ambience => reader.read_bytes(&request.uri).await.map(Payload::Audio),
    }
}

#[cfg(feature = "gltf")]
async fn load_model(reader: &AssetReaderVariant, uri: &str) -> Result<AssetGraph> {
    crate::assets::loaders::gltf::load_gltf(reader, uri).await
}

#[cfg(not(feature = "gltf"))]
async fn load_model(_reader: &AssetReaderVariant, uri: &str) -> Result<AssetGraph> {
    Err(crate::errors::StageError::FeatureNotEnabled(format!(
        "decoding '{uri}' requires the `gltf` feature"
    )))
}

/// Fetches every request concurrently and sends each result as soon as it is ready.
///
/// Results arrive in completion order. Stops early if the receiver is gone.
pub async fn fetch_all(
    reader: AssetReaderVariant,
    requests: Vec<LoadRequest>,
    sender: flume::Sender<LoadResult>,
) {
    let mut pending: FuturesUnordered<_> = requests
        .into_iter()
        .map(|request| fetch(&reader, request))
        .collect();

    while let Some(result) = pending.next().await {
        if sender.send_async(result).await.is_err() {
            log::warn!("Load results receiver dropped, abandoning remaining loads");
            return;
        }
    }
}
