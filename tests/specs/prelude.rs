//! Shared harness for data source specs

pub use bytes::Bytes;
pub use similar_asserts::assert_eq;
pub use std::sync::Arc;
pub use std::time::Duration;
pub use wds_adapters::{ContainerMetadata, InMemoryContainerMetadata, TracedContainerMetadata};
pub use wds_core::{AttributeId, AttributeUpdate, Operation, SegmentId, SequenceNumber};
pub use wds_source::{
    DataSourceConfig, DataSourceError, ErrorInjector, FaultPoint, InMemoryDataSource, ReadBatch,
    WriterDataSource,
};

pub const TIMEOUT: Duration = Duration::from_secs(5);
pub const SHORT: Duration = Duration::from_millis(25);
pub const SEGMENT: SegmentId = SegmentId(11);

pub type Source = InMemoryDataSource<TracedContainerMetadata<InMemoryContainerMetadata>>;

/// A data source over traced in-memory metadata
pub struct Harness {
    pub source: Source,
    pub metadata: InMemoryContainerMetadata,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(DataSourceConfig::default())
    }

    pub fn with_config(config: DataSourceConfig) -> Self {
        let metadata = InMemoryContainerMetadata::new(3);
        let source = InMemoryDataSource::new(
            TracedContainerMetadata::new(metadata.clone()),
            tokio::runtime::Handle::current(),
            config,
        )
        .unwrap();
        Self { source, metadata }
    }

    /// Map `SEGMENT` with the given length
    pub fn segment(self, length: u64) -> Self {
        self.metadata.map_segment(SEGMENT, "scope/stream/0.#epoch.0");
        self.metadata.set_length(SEGMENT, length);
        self
    }

    pub fn add(&self, operation: Operation) -> SequenceNumber {
        self.source.add(operation).unwrap()
    }

    pub fn add_append(&self, offset: u64) -> SequenceNumber {
        self.add(Operation::append(SEGMENT, offset, Bytes::from_static(b"op")))
    }

    pub fn add_checkpoint(&self) -> SequenceNumber {
        self.add(Operation::checkpoint())
    }

    pub async fn ack(&self, up_to: SequenceNumber) {
        self.source.acknowledge(up_to, TIMEOUT).unwrap().await.unwrap();
    }

    /// Everything currently in the log
    pub async fn read_all(&self) -> Vec<SequenceNumber> {
        if self.source.last_sequence_number().is_none() {
            return Vec::new();
        }
        let batch = self.source.read(0, usize::MAX, TIMEOUT).unwrap().await.unwrap();
        sequences(&batch)
    }
}

pub fn sequences(batch: &ReadBatch) -> Vec<SequenceNumber> {
    batch.iter().filter_map(|op| op.sequence_number()).collect()
}
