/// Position within the ordered list of sections.
///
/// The index is always within `[0, count - 1]`, or `0` when there are no
/// sections at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCursor {
    index: usize,
    count: usize,
}

impl SectionCursor {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Move to `index`, clamped into range. Returns the selected index.
    pub fn jump(&mut self, index: usize) -> usize {
        self.index = index.min(self.count.saturating_sub(1));
        self.index
    }

    pub fn next(&mut self) -> usize {
        self.jump(self.index.saturating_add(1))
    }

    pub fn previous(&mut self) -> usize {
        self.jump(self.index.saturating_sub(1))
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }

    /// One-based position for display ("Section 2 of 5").
    #[must_use]
    pub fn position(&self) -> usize {
        self.index + 1
    }
}
