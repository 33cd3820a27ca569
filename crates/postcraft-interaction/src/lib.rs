pub mod document_probe;
pub mod gateway;
pub mod image_file;
pub mod recorder;

pub use document_probe::{DocumentStoreProbe, ProbeOutcome, ProbeReport};
pub use gateway::HttpWebhookGateway;
pub use image_file::load_image;
#[cfg(feature = "microphone")]
pub use recorder::CpalRecorder;
