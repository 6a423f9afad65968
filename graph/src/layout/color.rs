use std::collections::VecDeque;

/// Hands out lane colors from a bounded palette.
///
/// Colors are dequeued in palette order; once the queue runs dry it is
/// refilled with the whole palette, so colors are shared between lanes when
/// more lanes are open than the palette has entries. Recycled colors go to
/// the back of the queue, which keeps reuse as far apart as possible.
#[derive(Debug, Clone)]
pub struct ColorPicker {
    palette_size: usize,
    queue: VecDeque<usize>,
}

impl ColorPicker {
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette_size: palette_size.max(1),
            queue: VecDeque::with_capacity(palette_size),
        }
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    /// Take the next color
    pub fn next(&mut self) -> usize {
        if self.queue.is_empty() {
            self.queue.extend(0..self.palette_size);
        }
        self.queue.pop_front().unwrap_or(0)
    }

    /// Give a color back once its lane is closed
    pub fn recycle(&mut self, color: usize) {
        if color < self.palette_size && !self.queue.contains(&color) {
            self.queue.push_back(color);
        }
    }
}
