//! Data region tracking
//!
//! The region is entered on the line crossing the start boundary and left on
//! the line crossing the end boundary. Both checks run against each line
//! before membership is decided, so a line crossing both boundaries enters
//! and leaves within the same line and is not part of the region.

use crate::config::Boundary;

/// Single-pass "inside the data region" flag
#[derive(Debug)]
pub struct DataRegion<'a> {
    start: &'a Boundary,
    end: &'a Boundary,
    active: bool,
}

impl<'a> DataRegion<'a> {
    pub fn new(start: &'a Boundary, end: &'a Boundary) -> Self {
        Self {
            start,
            end,
            active: false,
        }
    }

    /// Feed the next line and report whether it lies inside the region
    pub fn advance(&mut self, line_number: usize, line: &str) -> bool {
        if self.start.is_crossed_by(line_number, line) {
            self.active = true;
        }
        if self.end.is_crossed_by(line_number, line) {
            self.active = false;
        }
        self.active
    }
}
