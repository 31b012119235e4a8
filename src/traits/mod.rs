pub mod processor;
pub mod progress;

pub use processor::{IoContract, Processor, ProcessorId};
pub use progress::{
    ChannelProgress, FnProgress, NoopProgress, ProgressEvent, ProgressSink, TracingProgress,
};
