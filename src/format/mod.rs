//! Sample formats and rate conversion.
//!
//! - Sample adapters between f32 and 8/16/32-bit signed/unsigned PCM
//! - Native-endian byte codec and endianness swap
//! - Streaming box-filter resampling

mod convert;
mod resample;

pub use convert::{
    decode_samples, encode_samples, from_f32_slice, swap_endian, to_f32_slice, Sample,
};
pub use resample::{LinearResampler, DEFAULT_CAPACITY};
