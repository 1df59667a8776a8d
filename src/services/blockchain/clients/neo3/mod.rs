mod client;
mod epoch;
mod error;

pub use client::{Neo3Client, Neo3ClientTrait};
pub use epoch::{decode_epoch_height, EPOCH_HEIGHT_STORAGE_KEY};
pub use error::Neo3ClientError;
