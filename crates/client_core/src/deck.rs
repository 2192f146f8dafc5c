use shared::domain::{SlideIndex, SlideRequest};

/// Slide carousel inside the detail view.
///
/// `current` is always within `[1, len]` while the deck has slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDeck {
    len: u16,
    current: u16,
}

/// Position widgets rendered next to the deck.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideIndicators {
    pub dots: Vec<bool>,
    pub counter: String,
    pub progress_percent: f32,
}

impl SlideDeck {
    pub fn new(len: u16) -> Self {
        Self { len, current: 1 }
    }

    pub fn len(&self) -> u16 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> SlideIndex {
        SlideIndex(self.current)
    }

    /// Replaces the deck length once the real slide count is known.
    pub fn resize(&mut self, len: u16) {
        self.len = len;
        self.current = self.current.clamp(1, len.max(1));
    }

    /// Next and previous wrap around; explicit targets clamp into the deck.
    pub fn resolve(&self, request: SlideRequest) -> SlideIndex {
        let last = self.len.max(1);
        let index = match request {
            SlideRequest::Next if self.current >= last => 1,
            SlideRequest::Next => self.current + 1,
            SlideRequest::Previous if self.current <= 1 => last,
            SlideRequest::Previous => self.current - 1,
            SlideRequest::To(target) => target.clamp(1, last),
        };
        SlideIndex(index)
    }

    pub fn show(&mut self, index: SlideIndex) {
        self.current = index.get().clamp(1, self.len.max(1));
    }

    pub fn indicators(&self) -> SlideIndicators {
        let dots = (1..=self.len).map(|i| i == self.current).collect();
        let counter = format!("{:02} / {:02}", self.current, self.len);
        let progress_percent = if self.len == 0 {
            0.0
        } else {
            f32::from(self.current) / f32::from(self.len) * 100.0
        };
        SlideIndicators {
            dots,
            counter,
            progress_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_moves_wrap_at_both_ends() {
        let mut deck = SlideDeck::new(10);
        assert_eq!(deck.resolve(SlideRequest::Previous), SlideIndex(10));
        deck.show(SlideIndex(10));
        assert_eq!(deck.resolve(SlideRequest::Next), SlideIndex(1));
    }

    #[test]
    fn explicit_targets_clamp_instead_of_wrapping() {
        let deck = SlideDeck::new(7);
        assert_eq!(deck.resolve(SlideRequest::To(0)), SlideIndex(1));
        assert_eq!(deck.resolve(SlideRequest::To(8)), SlideIndex(7));
        assert_eq!(deck.resolve(SlideRequest::To(4)), SlideIndex(4));
    }

    #[test]
    fn full_cycle_of_next_returns_to_start() {
        for len in 1..=12u16 {
            for start in 1..=len {
                let mut deck = SlideDeck::new(len);
                deck.show(SlideIndex(start));
                for _ in 0..len {
                    let next = deck.resolve(SlideRequest::Next);
                    deck.show(next);
                }
                assert_eq!(deck.current(), SlideIndex(start), "len={len} start={start}");
            }
        }
    }

    #[test]
    fn indicators_reflect_position() {
        let mut deck = SlideDeck::new(4);
        deck.show(SlideIndex(2));
        let indicators = deck.indicators();
        assert_eq!(indicators.dots, vec![false, true, false, false]);
        assert_eq!(indicators.counter, "02 / 04");
        assert!((indicators.progress_percent - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn resize_keeps_current_in_range() {
        let mut deck = SlideDeck::new(10);
        deck.show(SlideIndex(9));
        deck.resize(5);
        assert_eq!(deck.current(), SlideIndex(5));
    }
}
