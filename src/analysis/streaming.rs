//! Frame-incremental analysis
//!
//! Appends each new frame to a bounded rolling window and re-runs the whole
//! pipeline over the window. No state survives between runs except the window
//! itself; frame indices in each result are relative to the window start.
//!
//! # Example
//!
//! ```
//! use stratum_swing::analysis::streaming::StreamingAnalyzer;
//! use stratum_swing::pose::synthetic::SyntheticSwing;
//! use stratum_swing::AnalysisConfig;
//!
//! let mut live = StreamingAnalyzer::new(AnalysisConfig::default());
//! for frame in SyntheticSwing::default().generate() {
//!     let analysis = live.push_frame(frame)?;
//!     assert_eq!(analysis.phases.len(), 6);
//! }
//! # Ok::<(), stratum_swing::AnalysisError>(())
//! ```

use super::result::SwingAnalysis;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::pose::landmark::{PoseFrame, LANDMARK_COUNT};
use crate::pose::window::RollingWindow;
use crate::SwingAnalyzer;

/// Rolling-window swing analyzer
pub struct StreamingAnalyzer {
    analyzer: SwingAnalyzer,
    window: RollingWindow,
    frames_seen: usize,
}

impl StreamingAnalyzer {
    /// Analyzer with the heuristic phase source and a window of
    /// `config.streaming_window_capacity` frames
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_analyzer(SwingAnalyzer::new(config))
    }

    /// Wrap a configured analyzer
    pub fn with_analyzer(analyzer: SwingAnalyzer) -> Self {
        let capacity = analyzer.config().streaming_window_capacity;
        Self {
            analyzer,
            window: RollingWindow::new(capacity),
            frames_seen: 0,
        }
    }

    /// Append a frame and analyze the current window
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FatalInput`] for a frame without 33
    /// landmarks. Such a frame is rejected before it reaches the window, so
    /// later frames analyze normally. Also fails when the window as a whole
    /// is unusable (no visible landmark anywhere).
    pub fn push_frame(&mut self, frame: PoseFrame) -> Result<SwingAnalysis, AnalysisError> {
        if frame.landmarks.len() != LANDMARK_COUNT {
            log::warn!(
                "Rejected streamed frame at {:.1} ms: {} landmarks",
                frame.timestamp_ms,
                frame.landmarks.len()
            );
            return Err(AnalysisError::FatalInput(format!(
                "Streamed frame has {} landmarks, expected {}",
                frame.landmarks.len(),
                LANDMARK_COUNT
            )));
        }

        self.frames_seen += 1;
        if let Some(evicted) = self.window.push(frame) {
            log::trace!("Window full, evicted frame at {:.1} ms", evicted.timestamp_ms);
        }
        self.analyze_window()
    }

    /// Analyze the frames currently held
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FatalInput`] for an empty or unusable window.
    pub fn analyze_window(&mut self) -> Result<SwingAnalysis, AnalysisError> {
        let frames = self.window.frames();
        log::debug!(
            "Streaming analysis over {} frames ({} seen)",
            frames.len(),
            self.frames_seen
        );
        self.analyzer.analyze(frames, None)
    }

    /// Frames currently held
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Total frames pushed since creation or the last reset
    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    /// Drop every buffered frame
    pub fn reset(&mut self) {
        self.window.clear();
        self.frames_seen = 0;
    }
}
