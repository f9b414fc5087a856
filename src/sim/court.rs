//! Court geometry
//!
//! The court is an axis-aligned rectangle with its origin at the far-left
//! corner. Throwing boxes occupy the strip between the throw line and the
//! near edge, split into equal-width lanes numbered from 1.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Horizontal extent of one throwing box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxSpan {
    pub x_start: f64,
    pub x_end: f64,
}

impl BoxSpan {
    #[inline]
    pub fn center_x(&self) -> f64 {
        (self.x_start + self.x_end) / 2.0
    }
}

/// Fixed court dimensions and markings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub width: f64,
    pub height: f64,
    /// Throws must start at or below this line
    pub throw_line_y: f64,
    /// A valid jack stops strictly above this line
    pub v_line_y: f64,
    pub box_width: f64,
    pub box_count: u8,
    /// Re-spot position for a jack that leaves the court
    pub cross: DVec2,
}

impl Default for Court {
    fn default() -> Self {
        Self {
            width: COURT_WIDTH,
            height: COURT_HEIGHT,
            throw_line_y: THROW_LINE_Y,
            v_line_y: V_LINE_Y,
            box_width: THROWING_BOX_WIDTH,
            box_count: THROWING_BOX_COUNT,
            cross: DVec2::new(CROSS_X, CROSS_Y),
        }
    }
}

impl Court {
    /// Whether `index` names a throwing box (1-based)
    #[inline]
    pub fn is_valid_box(&self, index: u8) -> bool {
        (1..=self.box_count).contains(&index)
    }

    /// Span of a throwing box, `None` for an out-of-range index
    pub fn box_span(&self, index: u8) -> Option<BoxSpan> {
        if !self.is_valid_box(index) {
            return None;
        }
        let x_start = f64::from(index - 1) * self.box_width;
        Some(BoxSpan {
            x_start,
            x_end: x_start + self.box_width,
        })
    }

    /// Whether a throw may start at `point` from the given box
    ///
    /// Both box edges are inclusive, as is the throw line itself.
    pub fn is_valid_throw_origin(&self, index: u8, point: DVec2) -> bool {
        match self.box_span(index) {
            Some(span) => {
                point.x >= span.x_start && point.x <= span.x_end && point.y >= self.throw_line_y
            }
            None => false,
        }
    }

    /// Where the next ball is previewed for the selected box
    pub fn preview_position(&self, index: u8) -> Option<DVec2> {
        self.box_span(index)
            .map(|span| DVec2::new(span.center_x(), self.throw_line_y + PREVIEW_OFFSET_Y))
    }

    /// Box whose lane contains `x`, clamped to the outermost boxes
    pub fn box_for_x(&self, x: f64) -> u8 {
        let last = f64::from(self.box_count.saturating_sub(1));
        let lane = (x / self.box_width).floor().clamp(0.0, last);
        lane as u8 + 1
    }

    /// True when any part of the circle crosses a court edge
    pub fn circle_out_of_bounds(&self, center: DVec2, radius: f64) -> bool {
        center.x - radius < 0.0
            || center.x + radius > self.width
            || center.y - radius < 0.0
            || center.y + radius > self.height
    }

    /// Whether a stopped jack at `pos` counts as a legal throw
    #[inline]
    pub fn is_past_v_line(&self, pos: DVec2) -> bool {
        pos.y < self.v_line_y
    }
}
