/// Cursor over the challenge cards on the home screen.
///
/// Movement clamps at both ends; there is always exactly one active dot unless
/// the carousel is empty.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) {
        if self.index + 1 < self.len {
            self.index += 1;
        }
    }

    pub fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Jump to a dot; indices past the end are ignored.
    pub fn go_to(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    /// One flag per dot, `true` for the active one.
    pub fn dots(&self) -> Vec<bool> {
        (0..self.len).map(|idx| idx == self.index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_at_both_ends() {
        let mut carousel = Carousel::new(3);
        carousel.previous();
        assert_eq!(carousel.index(), 0);
        carousel.next();
        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 2);
        assert_eq!(carousel.dots(), vec![false, false, true]);
    }

    #[test]
    fn go_to_ignores_out_of_range() {
        let mut carousel = Carousel::new(3);
        carousel.go_to(1);
        carousel.go_to(7);
        assert_eq!(carousel.index(), 1);

        let mut empty = Carousel::new(0);
        empty.next();
        assert_eq!(empty.index(), 0);
        assert!(empty.dots().is_empty());
    }
}
