use shared::domain::ChapterIndex;

/// Story-mode chapter carousel. Moves clamp at either end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryState {
    chapters: u16,
    current: u16,
}

impl StoryState {
    pub fn new(chapters: u16) -> Self {
        Self {
            chapters: chapters.max(1),
            current: 1,
        }
    }

    pub fn current(&self) -> ChapterIndex {
        ChapterIndex(self.current)
    }

    pub fn chapters(&self) -> u16 {
        self.chapters
    }

    /// Returns whether the chapter changed.
    pub fn next(&mut self) -> bool {
        if self.current >= self.chapters {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current <= 1 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn progress_percent(&self) -> f32 {
        f32::from(self.current) / f32::from(self.chapters) * 100.0
    }
}
