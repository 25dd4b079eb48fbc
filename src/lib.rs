pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod reader;
pub mod stats;
pub mod table;
pub mod verify;
pub mod writer;

pub use error::{ReshapeError, Result};
pub use pipeline::{PipelineConfig, ReshapePipeline};
pub use table::{Cell, LongRecord, LongTable, WideTable};
