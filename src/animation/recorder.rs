//! Streaming recorder for writing `.cbin` files one frame at a time.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use super::format::{CbinHeader, CodecError, FRAME_PAYLOAD_SIZE, HEADER_SIZE, pack_frame};
use crate::schema::Frame;

/// Configuration for animation recording.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Record every Nth frame (1 = every frame).
    pub frame_skip: u32,
    /// Maximum frames to record (0 = unlimited).
    pub max_frames: u32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            max_frames: 0,
        }
    }
}

/// Recorder that streams frames into a `.cbin` sink.
///
/// The header is written with a zero frame count and patched on finalize,
/// so the sink must be seekable.
///
/// Usage:
/// ```ignore
/// let mut recorder = CbinRecorder::create("out.cbin", 100, true, Default::default())?;
/// for frame in &frames {
///     recorder.record_frame(frame)?;
/// }
/// recorder.finalize()?;
/// ```
pub struct CbinRecorder<W: Write + Seek> {
    writer: W,
    header: CbinHeader,
    config: RecorderConfig,
    /// Stream position of the header.
    start: u64,
    step_counter: u32,
}

impl CbinRecorder<BufWriter<File>> {
    /// Create a recorder writing to a new file.
    pub fn create<P: AsRef<Path>>(
        path: P,
        delay: i32,
        looping: bool,
        config: RecorderConfig,
    ) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), delay, looping, config)
    }
}

impl<W: Write + Seek> CbinRecorder<W> {
    /// Create a recorder writing at the current position of `writer`.
    pub fn new(mut writer: W, delay: i32, looping: bool, config: RecorderConfig) -> io::Result<Self> {
        let start = writer.stream_position()?;
        let header = CbinHeader {
            frame_count: 0, // Will be updated on finalize
            delay,
            looping,
        };
        header.write_to(&mut writer)?;

        Ok(Self {
            writer,
            header,
            config,
            start,
            step_counter: 0,
        })
    }

    /// Record a frame.
    ///
    /// Returns true if frame was actually recorded (may skip frames based on config).
    pub fn record_frame(&mut self, frame: &Frame) -> Result<bool, CodecError> {
        self.step_counter += 1;

        if self.step_counter < self.config.frame_skip {
            return Ok(false);
        }
        self.step_counter = 0;

        if self.config.max_frames > 0 && self.header.frame_count >= self.config.max_frames {
            return Ok(false);
        }
        if self.header.frame_count == u32::MAX {
            return Err(CodecError::TooManyFrames(u32::MAX as usize));
        }

        self.writer.write_all(&pack_frame(frame))?;
        self.header.frame_count += 1;
        Ok(true)
    }

    /// Number of frames recorded so far.
    pub fn frames_written(&self) -> u32 {
        self.header.frame_count
    }

    /// Patch the header with the final frame count and flush.
    pub fn finalize(self) -> Result<RecordingStats, CodecError> {
        self.finalize_into_inner().map(|(_, stats)| stats)
    }

    /// Like [`finalize`](Self::finalize), but hands the sink back.
    pub fn finalize_into_inner(mut self) -> Result<(W, RecordingStats), CodecError> {
        let end = self.writer.stream_position()?;

        self.writer.seek(SeekFrom::Start(self.start))?;
        self.header.write_to(&mut self.writer)?;
        self.writer.seek(SeekFrom::Start(end))?;
        self.writer.flush()?;

        let stats = RecordingStats {
            frame_count: self.header.frame_count,
            total_bytes: self.header.file_size(),
            delay: self.header.delay,
            looping: self.header.looping,
        };
        debug!("Finalized recording: {}", stats);
        Ok((self.writer, stats))
    }
}

/// Statistics from a recording session.
#[derive(Debug, Clone)]
pub struct RecordingStats {
    /// Total frames recorded.
    pub frame_count: u32,
    /// Total bytes written, header included.
    pub total_bytes: u64,
    pub delay: i32,
    pub looping: bool,
}

impl RecordingStats {
    /// Playback length of one pass, in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        self.frame_count as i64 * self.delay.max(0) as i64
    }
}

impl std::fmt::Display for RecordingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, {} bytes total ({} header + {} bytes/frame), {} ms delay{}",
            self.frame_count,
            self.total_bytes,
            HEADER_SIZE,
            FRAME_PAYLOAD_SIZE,
            self.delay,
            if self.looping { ", looping" } else { "" }
        )
    }
}
