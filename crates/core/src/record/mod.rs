use std::{collections::VecDeque, io};

use crate::render::{Frame, RenderSurface};

/// Options for [`FrameRecorder`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSettings {
    /// Keep only the most recent frames. `None` keeps all of them.
    pub capacity: Option<usize>,
}

/// In-memory surface that keeps presented frames instead of drawing them.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    settings: RecordingSettings,
    frames: VecDeque<Frame>,
    presented: usize,
    finished: bool,
}

impl FrameRecorder {
    pub fn new(settings: RecordingSettings) -> Self {
        Self {
            settings,
            frames: VecDeque::new(),
            presented: 0,
            finished: false,
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.frames.back()
    }

    /// Total frames presented, including any dropped by the capacity limit.
    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl RenderSurface for FrameRecorder {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.presented += 1;
        if self.settings.capacity == Some(0) {
            return Ok(());
        }
        if let Some(capacity) = self.settings.capacity {
            while self.frames.len() >= capacity {
                self.frames.pop_front();
            }
        }
        self.frames.push_back(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}
