//! Fixed-capacity stereo delay line with fractional reads.
//!
//! Storage is an inline array of `N` stereo frames sized at compile time, so a
//! unit that owns one never allocates. One frame is written per sample; reads
//! address frames by their distance back from the most recent write.
//!
//! # Offsets
//!
//! | Offset | Frame returned |
//! |--------|----------------|
//! | `0.0` | most recent write |
//! | `1.0` | one frame earlier |
//! | `d + f` | linear blend of `d` and `d + 1` by `f` |
//!
//! A linear read at offset `d` touches frame `d + 1`, so callers must keep
//! every offset at or below [`StereoDelayLine::MAX_READ_OFFSET`]. Units enforce
//! this with a compile-time assertion on their worst-case offset rather than
//! with per-sample checks.

/// A stereo frame: `(left, right)`.
pub type StereoFrame = (f32, f32);

/// Circular buffer of `N` stereo frames.
///
/// # Example
///
/// ```rust
/// use fourfold_core::StereoDelayLine;
///
/// let mut delay: StereoDelayLine<8> = StereoDelayLine::new();
/// delay.write((1.0, -1.0));
/// delay.write((0.0, 0.0));
///
/// let (l, r) = delay.read_frac(0.5);
/// assert!((l - 0.5).abs() < 1e-6);
/// assert!((r + 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct StereoDelayLine<const N: usize> {
    buffer: [StereoFrame; N],
    write_pos: usize,
}

impl<const N: usize> Default for StereoDelayLine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> StereoDelayLine<N> {
    /// Largest offset a linear read may use.
    pub const MAX_READ_OFFSET: usize = {
        assert!(N >= 2, "a fractional delay line needs at least two frames");
        N - 2
    };

    /// Creates a silent delay line.
    pub const fn new() -> Self {
        Self {
            buffer: [(0.0, 0.0); N],
            write_pos: 0,
        }
    }

    /// Capacity in frames.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Writes one frame and advances the cursor.
    #[inline]
    pub fn write(&mut self, frame: StereoFrame) {
        self.buffer[self.write_pos] = frame;
        self.write_pos = (self.write_pos + 1) % N;
    }

    /// Reads the frame written `offset` frames before the latest write.
    #[inline]
    pub fn read(&self, offset: usize) -> StereoFrame {
        let offset = offset.min(N - 1);
        self.buffer[(self.write_pos + N - offset - 1) % N]
    }

    /// Linearly interpolated read at a fractional `offset`.
    ///
    /// Offsets outside `[0, MAX_READ_OFFSET]` are clamped.
    #[inline]
    pub fn read_frac(&self, offset: f32) -> StereoFrame {
        let offset = offset.clamp(0.0, Self::MAX_READ_OFFSET as f32);
        let offset_int = offset as usize;
        let frac = offset - offset_int as f32;

        let read_pos = (self.write_pos + N - offset_int - 1) % N;
        let next_pos = (read_pos + N - 1) % N;
        let (al, ar) = self.buffer[read_pos];
        let (bl, br) = self.buffer[next_pos];
        (al + (bl - al) * frac, ar + (br - ar) * frac)
    }

    /// Zeroes the buffer and rewinds the cursor.
    pub fn clear(&mut self) {
        self.buffer = [(0.0, 0.0); N];
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_read() {
        let mut delay: StereoDelayLine<16> = StereoDelayLine::new();
        for i in 0..10 {
            delay.write((i as f32, -(i as f32)));
        }
        assert_eq!(delay.read(0), (9.0, -9.0));
        assert_eq!(delay.read(3), (6.0, -6.0));
    }

    #[test]
    fn test_frac_read_matches_integer_read() {
        let mut delay: StereoDelayLine<16> = StereoDelayLine::new();
        for i in 0..20 {
            delay.write((i as f32, 0.0));
        }
        for d in 0..=StereoDelayLine::<16>::MAX_READ_OFFSET {
            assert_eq!(delay.read_frac(d as f32), delay.read(d));
        }
    }

    #[test]
    fn test_frac_read_interpolates() {
        let mut delay: StereoDelayLine<8> = StereoDelayLine::new();
        delay.write((4.0, 8.0));
        delay.write((2.0, 4.0));
        let (l, r) = delay.read_frac(0.25);
        assert!((l - 2.5).abs() < 1e-6);
        assert!((r - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_wraparound() {
        let mut delay: StereoDelayLine<4> = StereoDelayLine::new();
        for i in 0..11 {
            delay.write((i as f32, 0.0));
        }
        assert_eq!(delay.read(0).0, 10.0);
        assert_eq!(delay.read(2).0, 8.0);
        let (l, _) = delay.read_frac(1.5);
        assert!((l - 8.5).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_offset_clamped() {
        let mut delay: StereoDelayLine<4> = StereoDelayLine::new();
        for i in 0..4 {
            delay.write((i as f32, 0.0));
        }
        assert_eq!(delay.read_frac(100.0), delay.read_frac(2.0));
        assert_eq!(delay.read_frac(-3.0), delay.read(0));
    }

    #[test]
    fn test_clear() {
        let mut delay: StereoDelayLine<4> = StereoDelayLine::new();
        delay.write((1.0, 1.0));
        delay.clear();
        assert_eq!(delay.read(0), (0.0, 0.0));
        assert_eq!(delay.capacity(), 4);
    }
}
