//! Sample format conversion and byte codecs.
//!
//! The queue carries native-endian f32. Integer PCM is converted by affine
//! scaling: reads map `[-1.0, 1.0]` onto the integer range with the
//! symmetric maximum (×127, ×32767, ×2147483647, plus the midpoint offset for
//! unsigned types); writes divide by the power of two (128, 32768, 2^31).

/// A PCM sample type that can cross the pipe.
pub trait Sample: Copy + Default + Send + 'static {
    /// Width of one sample in bytes.
    const BYTES: usize;

    /// Converts a float sample in `[-1.0, 1.0]` to this type.
    ///
    /// Values outside the range saturate at the type's limits.
    fn from_f32(value: f32) -> Self;

    /// Converts this sample to a float in `[-1.0, 1.0]`.
    fn to_f32(self) -> f32;

    /// Reverses the byte order of this sample.
    #[must_use]
    fn swap_endian(self) -> Self;

    /// Writes the native-endian bytes of this sample into `out[..Self::BYTES]`.
    fn write_ne_bytes(self, out: &mut [u8]);

    /// Reads a sample from the native-endian bytes in `bytes[..Self::BYTES]`.
    fn read_ne_bytes(bytes: &[u8]) -> Self;
}

macro_rules! integer_sample {
    ($ty:ty, scale: $scale:expr, offset: $offset:expr, divisor: $divisor:expr) => {
        impl Sample for $ty {
            const BYTES: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn from_f32(value: f32) -> Self {
                (f64::from(value) * $scale + $offset) as $ty
            }

            #[inline]
            fn to_f32(self) -> f32 {
                ((self as f64 - $offset) / $divisor) as f32
            }

            #[inline]
            fn swap_endian(self) -> Self {
                self.swap_bytes()
            }

            #[inline]
            fn write_ne_bytes(self, out: &mut [u8]) {
                out[..Self::BYTES].copy_from_slice(&self.to_ne_bytes());
            }

            #[inline]
            fn read_ne_bytes(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..Self::BYTES]);
                <$ty>::from_ne_bytes(raw)
            }
        }
    };
}

integer_sample!(i8, scale: 127.0, offset: 0.0, divisor: 128.0);
integer_sample!(u8, scale: 127.0, offset: 128.0, divisor: 128.0);
integer_sample!(i16, scale: 32_767.0, offset: 0.0, divisor: 32_768.0);
integer_sample!(u16, scale: 32_767.0, offset: 32_768.0, divisor: 32_768.0);
integer_sample!(i32, scale: 2_147_483_647.0, offset: 0.0, divisor: 2_147_483_648.0);
integer_sample!(u32, scale: 2_147_483_647.0, offset: 2_147_483_648.0, divisor: 2_147_483_648.0);

impl Sample for f32 {
    const BYTES: usize = 4;

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn swap_endian(self) -> Self {
        f32::from_bits(self.to_bits().swap_bytes())
    }

    #[inline]
    fn write_ne_bytes(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_ne_bytes());
    }

    #[inline]
    fn read_ne_bytes(bytes: &[u8]) -> Self {
        f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Converts float samples into `out`, stopping at the shorter slice.
///
/// Returns the number of samples converted.
pub fn from_f32_slice<S: Sample>(input: &[f32], out: &mut [S]) -> usize {
    let n = input.len().min(out.len());
    for (dst, &src) in out[..n].iter_mut().zip(input) {
        *dst = S::from_f32(src);
    }
    n
}

/// Converts samples into floats, stopping at the shorter slice.
///
/// Returns the number of samples converted.
pub fn to_f32_slice<S: Sample>(input: &[S], out: &mut [f32]) -> usize {
    let n = input.len().min(out.len());
    for (dst, &src) in out[..n].iter_mut().zip(input) {
        *dst = src.to_f32();
    }
    n
}

/// Serializes samples as native-endian bytes.
///
/// Encodes as many whole samples as fit in `out` and returns the byte count.
pub fn encode_samples<S: Sample>(samples: &[S], out: &mut [u8]) -> usize {
    let n = samples.len().min(out.len() / S::BYTES);
    for (chunk, &sample) in out.chunks_exact_mut(S::BYTES).zip(&samples[..n]) {
        sample.write_ne_bytes(chunk);
    }
    n * S::BYTES
}

/// Deserializes native-endian bytes into samples.
///
/// Trailing bytes that do not form a whole sample are ignored. Returns the
/// number of samples decoded.
pub fn decode_samples<S: Sample>(bytes: &[u8], out: &mut [S]) -> usize {
    let mut n = 0;
    for (dst, chunk) in out.iter_mut().zip(bytes.chunks_exact(S::BYTES)) {
        *dst = S::read_ne_bytes(chunk);
        n += 1;
    }
    n
}

/// Reverses the byte order of every sample in place.
pub fn swap_endian<S: Sample>(samples: &mut [S]) {
    for sample in samples {
        *sample = sample.swap_endian();
    }
}
