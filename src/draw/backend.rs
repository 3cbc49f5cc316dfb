use crate::draw::composite::RgbaBuffer;
use crate::draw::messages::CanvasEvent;
use crate::error::{Error, Result};
use std::collections::VecDeque;

/// A surface that can show finished frames and report user input.
pub trait Backend {
    /// Creates the visible surface. Called once, before any other method.
    fn open(&mut self, width: u32, height: u32, title: &str) -> Result<()>;

    /// Makes `frame` visible.
    fn present(&mut self, frame: &RgbaBuffer) -> Result<()>;

    /// Drains the input that arrived since the previous poll.
    fn poll_events(&mut self) -> Result<Vec<CanvasEvent>>;
}

/// A backend with no window: frames are kept in memory and events are queued
/// by the caller, either for the next poll or for a later one.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    size: Option<(u32, u32)>,
    title: String,
    pending: VecDeque<CanvasEvent>,
    /// Events held back until the poll with the given number.
    scheduled: Vec<(usize, CanvasEvent)>,
    last_frame: Option<RgbaBuffer>,
    frames_presented: usize,
    polls: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_event(&mut self, event: CanvasEvent) {
        self.pending.push_back(event);
    }

    /// Delivers `event` on the `poll`-th call to `poll_events` (counting from
    /// 1), as if it arrived while the caller was busy.
    pub fn push_event_at_poll(&mut self, poll: usize, event: CanvasEvent) {
        self.scheduled.push((poll, event));
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn last_frame(&self) -> Option<&RgbaBuffer> {
        self.last_frame.as_ref()
    }

    pub fn frames_presented(&self) -> usize {
        self.frames_presented
    }

    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl Backend for HeadlessBackend {
    fn open(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        if self.size.is_some() {
            return Err(Error::Backend("headless surface already open".into()));
        }
        self.size = Some((width, height));
        self.title = title.to_string();
        Ok(())
    }

    fn present(&mut self, frame: &RgbaBuffer) -> Result<()> {
        if self.size.is_none() {
            return Err(Error::Backend("present called before open".into()));
        }
        match self.last_frame.as_mut() {
            Some(last) => last.copy_from(frame),
            None => self.last_frame = Some(frame.clone()),
        }
        self.frames_presented += 1;
        Ok(())
    }

    fn poll_events(&mut self) -> Result<Vec<CanvasEvent>> {
        self.polls += 1;
        let polls = self.polls;
        let (due, later): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|(at, _)| *at <= polls);
        self.scheduled = later;
        self.pending.extend(due.into_iter().map(|(_, event)| event));
        Ok(self.pending.drain(..).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Backend, HeadlessBackend};
    use crate::draw::messages::CanvasEvent;

    #[test]
    fn scheduled_events_wait_for_their_poll() {
        let mut backend = HeadlessBackend::new();
        backend.push_event(CanvasEvent::KeyDown('a'));
        backend.push_event_at_poll(3, CanvasEvent::KeyDown('c'));
        backend.push_event_at_poll(2, CanvasEvent::KeyDown('b'));

        assert_eq!(backend.poll_events().expect("poll 1"), vec![CanvasEvent::KeyDown('a')]);
        assert_eq!(backend.poll_events().expect("poll 2"), vec![CanvasEvent::KeyDown('b')]);
        assert_eq!(backend.poll_events().expect("poll 3"), vec![CanvasEvent::KeyDown('c')]);
        assert!(backend.poll_events().expect("poll 4").is_empty());
    }
}
