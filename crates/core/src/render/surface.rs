use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};

use super::Frame;

/// Size assumed when no terminal is attached (columns, rows).
pub const FALLBACK_TERMINAL_SIZE: (u16, u16) = (200, 84);

/// Size of the attached terminal, or [`FALLBACK_TERMINAL_SIZE`].
pub fn terminal_size() -> (u16, u16) {
    terminal::size().unwrap_or(FALLBACK_TERMINAL_SIZE)
}

/// Destination for rendered frames.
///
/// Presenting a frame replaces whatever the previous frame drew.
pub trait RenderSurface {
    fn present(&mut self, frame: &Frame) -> io::Result<()>;

    /// Called once after the last frame.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        (**self).present(frame)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

/// Draws frames from the top-left corner of a terminal.
#[derive(Debug)]
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(0, 0),
            Clear(ClearType::FromCursorDown),
            Print(frame)
        )?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        queue!(self.out, Print("\n"))?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FrameRenderer, Hsv};

    #[test]
    fn clears_before_drawing_each_frame() {
        let frame = FrameRenderer::new(1).render(&[1], Hsv::cycling(0.0), "la");
        let mut surface = TerminalSurface::new(Vec::new());
        surface.present(&frame).unwrap();
        surface.present(&frame).unwrap();
        surface.finish().unwrap();

        let written = String::from_utf8(surface.into_inner()).unwrap();
        let home_and_clear = "\x1b[1;1H\x1b[J";
        assert!(written.starts_with(home_and_clear));
        assert_eq!(written.matches(home_and_clear).count(), 2);
        assert!(written.contains(&frame.to_string()));
        assert!(written.ends_with('\n'));
    }
}
