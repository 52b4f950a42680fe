//! Binary format definitions for `.cbin` LED cube animations.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::schema::{AnimationSequence, CUBE_SIZE, Frame, VoxelGrid};

// One packed byte holds a full y-line, so the cube can't be wider than a byte.
const _: () = assert!(CUBE_SIZE <= 8);

/// Size of the file header in bytes.
/// FrameCount(4) + Delay(4) + Loop(1) = 9
pub const HEADER_SIZE: usize = 9;

/// Size of one packed frame in bytes (one byte per (z, x) line).
pub const FRAME_PAYLOAD_SIZE: usize = CUBE_SIZE * CUBE_SIZE;

/// Frames allocated up front while decoding, whatever the header claims.
const PREALLOC_FRAMES: usize = 1024;

/// One packed frame.
pub type FramePayload = [u8; FRAME_PAYLOAD_SIZE];

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Input ends before the 9-byte header is complete")]
    TruncatedHeader,
    #[error("Header declares {expected} frames but input holds only {decoded}")]
    Truncated { expected: u32, decoded: u32 },
    #[error("Header declares {count} frames, limit is {max}")]
    FrameLimitExceeded { count: u32, max: u32 },
    #[error("Cannot encode {0} frames, the format holds at most u32::MAX")]
    TooManyFrames(usize),
}

impl CodecError {
    /// True for malformed input, false for failures of the underlying sink/source.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, CodecError::Io(_))
    }
}

/// Map end-of-input to a format error, pass other I/O failures through.
fn eof_as(e: io::Error, err: CodecError) -> CodecError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        err
    } else {
        CodecError::Io(e)
    }
}

/// File header for the `.cbin` format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CbinHeader {
    /// Total number of frames.
    pub frame_count: u32,
    /// Milliseconds between frames.
    pub delay: i32,
    /// Restart after the last frame.
    pub looping: bool,
}

impl CbinHeader {
    /// Header describing `sequence`.
    pub fn for_sequence(sequence: &AnimationSequence) -> Result<Self, CodecError> {
        let frame_count = u32::try_from(sequence.frames.len())
            .map_err(|_| CodecError::TooManyFrames(sequence.frames.len()))?;
        Ok(Self {
            frame_count,
            delay: sequence.delay,
            looping: sequence.looping,
        })
    }

    /// Total encoded size of a file with this header.
    pub fn file_size(&self) -> u64 {
        HEADER_SIZE as u64 + self.frame_count as u64 * FRAME_PAYLOAD_SIZE as u64
    }

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.frame_count.to_le_bytes())?;
        w.write_all(&self.delay.to_le_bytes())?;
        w.write_all(&[u8::from(self.looping)])?;
        Ok(())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, CodecError> {
        let mut buf = [0u8; HEADER_SIZE];
        r.read_exact(&mut buf)
            .map_err(|e| eof_as(e, CodecError::TruncatedHeader))?;

        Ok(Self {
            frame_count: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            delay: i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            looping: buf[8] != 0,
        })
    }
}

/// Location of one voxel inside a packed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitPosition {
    /// Plane index (z).
    pub plane: usize,
    /// Byte index within the plane.
    pub byte: usize,
    /// Bit index within the byte, 0 = LSB.
    pub bit: usize,
}

impl BitPosition {
    /// Byte offset of this position within a frame payload.
    #[inline]
    pub const fn offset(&self) -> usize {
        self.plane * CUBE_SIZE + self.byte
    }
}

/// Where voxel `(x, y, z)` lives in a packed frame.
///
/// Both x and y are mirrored to match the cube's wiring.
#[inline]
pub const fn voxel_to_bit(x: usize, y: usize, z: usize) -> BitPosition {
    BitPosition {
        plane: z,
        byte: CUBE_SIZE - 1 - x,
        bit: CUBE_SIZE - 1 - y,
    }
}

/// Inverse of [`voxel_to_bit`].
#[inline]
pub const fn bit_to_voxel(pos: BitPosition) -> (usize, usize, usize) {
    (CUBE_SIZE - 1 - pos.byte, CUBE_SIZE - 1 - pos.bit, pos.plane)
}

/// Pack one frame into its payload bytes.
pub fn pack_frame(frame: &VoxelGrid) -> FramePayload {
    let mut payload = [0u8; FRAME_PAYLOAD_SIZE];
    for (x, y, z) in frame.occupied() {
        let pos = voxel_to_bit(x, y, z);
        payload[pos.offset()] |= 1 << pos.bit;
    }
    payload
}

/// Unpack payload bytes into a fresh frame.
pub fn unpack_frame(payload: &FramePayload) -> VoxelGrid {
    let mut frame = VoxelGrid::new();
    for (offset, &byte) in payload.iter().enumerate() {
        for bit in 0..CUBE_SIZE {
            if byte & (1 << bit) != 0 {
                let (x, y, z) = bit_to_voxel(BitPosition {
                    plane: offset / CUBE_SIZE,
                    byte: offset % CUBE_SIZE,
                    bit,
                });
                frame.set(x, y, z, true);
            }
        }
    }
    frame
}

/// Encode a sequence to output.
pub fn encode<W: Write>(sequence: &AnimationSequence, mut w: W) -> Result<(), CodecError> {
    let header = CbinHeader::for_sequence(sequence)?;
    header.write_to(&mut w)?;
    for frame in &sequence.frames {
        w.write_all(&pack_frame(frame))?;
    }
    Ok(())
}

/// Encode a sequence into a new byte buffer.
pub fn encode_to_vec(sequence: &AnimationSequence) -> Result<Vec<u8>, CodecError> {
    let mut bytes = Vec::with_capacity(sequence.encoded_len());
    encode(sequence, &mut bytes)?;
    Ok(bytes)
}

/// Decode a sequence from input, accepting any frame count.
pub fn decode<R: Read>(r: R) -> Result<AnimationSequence, CodecError> {
    decode_with_limit(r, u32::MAX)
}

/// Decode a sequence from input, rejecting headers that declare more than `max_frames`.
///
/// Bytes after the last frame are left unread.
pub fn decode_with_limit<R: Read>(
    mut r: R,
    max_frames: u32,
) -> Result<AnimationSequence, CodecError> {
    let header = CbinHeader::read_from(&mut r)?;
    if header.frame_count > max_frames {
        return Err(CodecError::FrameLimitExceeded {
            count: header.frame_count,
            max: max_frames,
        });
    }

    let expected = header.frame_count as usize;
    let mut frames: Vec<Frame> = Vec::with_capacity(expected.min(PREALLOC_FRAMES));
    let mut payload = [0u8; FRAME_PAYLOAD_SIZE];
    for decoded in 0..header.frame_count {
        r.read_exact(&mut payload).map_err(|e| {
            eof_as(
                e,
                CodecError::Truncated {
                    expected: header.frame_count,
                    decoded,
                },
            )
        })?;
        frames.push(unpack_frame(&payload));
    }

    Ok(AnimationSequence::with_frames(
        frames,
        header.delay,
        header.looping,
    ))
}

/// Decode a sequence from an in-memory buffer.
pub fn decode_slice(bytes: &[u8]) -> Result<AnimationSequence, CodecError> {
    decode(bytes)
}

/// Write a sequence to a `.cbin` file, replacing any existing file.
pub fn save<P: AsRef<Path>>(path: P, sequence: &AnimationSequence) -> Result<(), CodecError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    encode(sequence, &mut writer)?;
    writer.flush()?;
    debug!(
        "Saved {} frames ({} bytes) to {}",
        sequence.frame_count(),
        sequence.encoded_len(),
        path.display()
    );
    Ok(())
}

/// Read a sequence from a `.cbin` file.
pub fn load<P: AsRef<Path>>(path: P, max_frames: u32) -> Result<AnimationSequence, CodecError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let sequence = decode_with_limit(reader, max_frames)?;
    debug!(
        "Loaded {} frames from {}",
        sequence.frame_count(),
        path.display()
    );
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn single_voxel(x: usize, y: usize, z: usize) -> VoxelGrid {
        let mut grid = VoxelGrid::new();
        grid.set(x, y, z, true);
        grid
    }

    #[test]
    fn test_header_layout() {
        let header = CbinHeader {
            frame_count: 0x0102_0304,
            delay: -2,
            looping: true,
        };

        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(buf, [0x04, 0x03, 0x02, 0x01, 0xFE, 0xFF, 0xFF, 0xFF, 0x01]);

        let decoded = CbinHeader::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_any_nonzero_loop_byte_loops() {
        let bytes = [0, 0, 0, 0, 100, 0, 0, 0, 0x7F];
        let header = CbinHeader::read_from(&mut &bytes[..]).unwrap();
        assert!(header.looping);
        assert_eq!(header.delay, 100);
    }

    #[test]
    fn test_mapping_is_inverse() {
        for x in 0..CUBE_SIZE {
            for y in 0..CUBE_SIZE {
                for z in 0..CUBE_SIZE {
                    let pos = voxel_to_bit(x, y, z);
                    assert!(pos.offset() < FRAME_PAYLOAD_SIZE);
                    assert!(pos.bit < 8);
                    assert_eq!(bit_to_voxel(pos), (x, y, z));
                }
            }
        }
    }

    #[test]
    fn test_mapping_mirrors_x_and_y() {
        assert_eq!(
            voxel_to_bit(0, 0, 0),
            BitPosition {
                plane: 0,
                byte: 7,
                bit: 7
            }
        );
        assert_eq!(
            voxel_to_bit(7, 7, 3),
            BitPosition {
                plane: 3,
                byte: 0,
                bit: 0
            }
        );
    }

    #[test]
    fn test_single_voxel_sets_one_bit() {
        let (x0, y0, z0) = (2, 5, 6);
        let sequence = AnimationSequence::with_frames(vec![single_voxel(x0, y0, z0)], 100, true);
        let bytes = encode_to_vec(&sequence).unwrap();
        let payload = &bytes[HEADER_SIZE..];

        let target = z0 * CUBE_SIZE + (CUBE_SIZE - 1 - x0);
        for (i, &byte) in payload.iter().enumerate() {
            if i == target {
                assert_eq!(byte, 1 << (CUBE_SIZE - 1 - y0));
            } else {
                assert_eq!(byte, 0, "unexpected bits in byte {}", i);
            }
        }
    }

    #[test]
    fn test_full_and_empty_frames() {
        let sequence = AnimationSequence::with_frames(
            vec![VoxelGrid::filled(), VoxelGrid::new()],
            50,
            false,
        );
        let bytes = encode_to_vec(&sequence).unwrap();
        let (full, empty) = bytes[HEADER_SIZE..].split_at(FRAME_PAYLOAD_SIZE);

        assert!(full.iter().all(|&b| b == 0xFF));
        assert!(empty.iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_empty_sequence() {
        let sequence = AnimationSequence::new(-7, true);
        let bytes = encode_to_vec(&sequence).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);

        let decoded = decode_slice(&bytes).unwrap();
        assert!(decoded.frames.is_empty());
        assert_eq!(decoded.delay, -7);
        assert!(decoded.looping);
    }

    #[test]
    fn test_truncated_payload() {
        let sequence = AnimationSequence::with_frames(vec![VoxelGrid::filled(); 5], 100, true);
        let bytes = encode_to_vec(&sequence).unwrap();
        let cut = &bytes[..HEADER_SIZE + 2 * FRAME_PAYLOAD_SIZE];

        match decode_slice(cut) {
            Err(CodecError::Truncated { expected, decoded }) => {
                assert_eq!(expected, 5);
                assert_eq!(decoded, 2);
            }
            other => panic!("expected truncation error, got {:?}", other),
        }

        // Partial frame at the end is still truncation.
        let err = decode_slice(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_truncated_header() {
        for len in 0..HEADER_SIZE {
            let bytes = vec![0u8; len];
            assert!(matches!(
                decode_slice(&bytes),
                Err(CodecError::TruncatedHeader)
            ));
        }
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let sequence = AnimationSequence::with_frames(vec![single_voxel(1, 1, 1)], 20, false);
        let mut bytes = encode_to_vec(&sequence).unwrap();
        bytes.extend_from_slice(&[0xAB; 13]);

        assert_eq!(decode_slice(&bytes).unwrap(), sequence);
    }

    #[test]
    fn test_frame_limit() {
        let sequence = AnimationSequence::with_frames(vec![VoxelGrid::new(); 4], 10, true);
        let bytes = encode_to_vec(&sequence).unwrap();

        assert!(matches!(
            decode_with_limit(bytes.as_slice(), 3),
            Err(CodecError::FrameLimitExceeded { count: 4, max: 3 })
        ));
        assert_eq!(decode_with_limit(bytes.as_slice(), 4).unwrap(), sequence);
    }

    #[test]
    fn test_huge_declared_count_fails_cleanly() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0, 1, 0, 0];
        assert!(matches!(
            decode_slice(&bytes),
            Err(CodecError::Truncated {
                expected: u32::MAX,
                decoded: 0
            })
        ));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let sequence = AnimationSequence::with_frames(vec![VoxelGrid::new()], 10, true);
        let err = encode(&sequence, FailingWriter).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
        assert!(!err.is_format_error());
    }

    /// Yields its bytes, then fails every read after them.
    struct FailingReader {
        data: Vec<u8>,
        pos: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos >= self.data.len() {
                return Err(io::Error::other("device error"));
            }
            let n = buf.len().min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_read_failure_mid_stream_is_io_error() {
        let mut data = vec![2, 0, 0, 0, 10, 0, 0, 0, 1];
        data.extend_from_slice(&[0u8; FRAME_PAYLOAD_SIZE]);

        let err = decode(FailingReader { data, pos: 0 }).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)), "got {:?}", err);
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cube.cbin");

        let sequence = AnimationSequence::with_frames(
            (0..6).map(|i| VoxelGrid::noise(0.3, i)).collect(),
            125,
            false,
        );
        save(&path, &sequence).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), (HEADER_SIZE + 6 * FRAME_PAYLOAD_SIZE) as u64);

        let loaded = load(&path, 6).unwrap();
        assert_eq!(loaded, sequence);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load(dir.path().join("missing.cbin"), 10).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }

    fn grid_strategy() -> impl Strategy<Value = VoxelGrid> {
        prop::collection::vec(any::<bool>(), CUBE_SIZE * CUBE_SIZE * CUBE_SIZE).prop_map(|bits| {
            let mut grid = VoxelGrid::new();
            for (i, on) in bits.into_iter().enumerate() {
                grid.set(
                    i / (CUBE_SIZE * CUBE_SIZE),
                    (i / CUBE_SIZE) % CUBE_SIZE,
                    i % CUBE_SIZE,
                    on,
                );
            }
            grid
        })
    }

    fn sequence_strategy() -> impl Strategy<Value = AnimationSequence> {
        (
            prop::collection::vec(grid_strategy(), 0..=100),
            any::<i32>(),
            any::<bool>(),
        )
            .prop_map(|(frames, delay, looping)| {
                AnimationSequence::with_frames(frames, delay, looping)
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_roundtrip(sequence in sequence_strategy()) {
            let bytes = encode_to_vec(&sequence).unwrap();
            prop_assert_eq!(bytes.len(), HEADER_SIZE + sequence.frames.len() * FRAME_PAYLOAD_SIZE);
            prop_assert_eq!(bytes.len(), sequence.encoded_len());

            let decoded = decode_slice(&bytes).unwrap();
            prop_assert_eq!(decoded, sequence);
        }

        #[test]
        fn prop_frame_pack_roundtrip(grid in grid_strategy()) {
            let payload = pack_frame(&grid);
            let ones: u32 = payload.iter().map(|b| b.count_ones()).sum();
            prop_assert_eq!(ones as usize, grid.count_occupied());
            prop_assert_eq!(unpack_frame(&payload), grid);
        }
    }
}
