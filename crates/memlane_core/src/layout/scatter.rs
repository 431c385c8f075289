//! Scattered "wall of cards" placement for the all-memories view.
//!
//! # Responsibility
//! - Assign each card a horizontal offset and tilt once per snapshot.
//! - Combine stored positions with selection state into final placements.
//!
//! # Invariants
//! - The first card sits at the origin with no tilt.
//! - Adjacent offsets differ by at least `MIN_STAGGER` (subject to the draw cap).
//! - From the third card on, tilt direction alternates.
//! - Offsets stay within `[-MAX_X_OFFSET, MAX_X_OFFSET]`.

use crate::layout::selection::CardSelection;
use crate::model::memory::{MemoryId, MemoryRecord};
use log::debug;
use rand::Rng;
use std::collections::HashMap;

pub const MAX_X_OFFSET: f64 = 60.0;
pub const MIN_STAGGER: f64 = MAX_X_OFFSET * 0.4;
pub const MIN_ROTATION_DEGREES: f64 = 3.0;
pub const MAX_ROTATION_DEGREES: f64 = 8.0;
pub const ROTATION_BOOST_PROBABILITY: f64 = 0.3;
pub const ROTATION_BOOST_FACTOR: f64 = 1.5;
/// Rejection-sampling cap; the last draw is accepted once reached.
pub const MAX_OFFSET_DRAWS: usize = 100;

pub const TOP_PADDING: f64 = 100.0;
pub const CARD_GAP: f64 = 280.0;
pub const PINNED_Z_INDEX: i32 = 50;
pub const PINNED_SCALE: f64 = 1.05;

/// Stored offset and tilt of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPosition {
    pub x_offset: f64,
    pub rotation_degrees: f64,
}

impl ScatterPosition {
    pub const ORIGIN: Self = Self {
        x_offset: 0.0,
        rotation_degrees: 0.0,
    };
}

/// Final render placement of one card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardPlacement {
    pub x_offset: f64,
    pub rotation_degrees: f64,
    pub top: f64,
    pub z_index: i32,
    pub scale: f64,
}

/// Position map for one snapshot of the all-memories list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScatterLayout {
    order: Vec<MemoryId>,
    positions: HashMap<MemoryId, ScatterPosition>,
}

impl ScatterLayout {
    /// Computes positions using the thread-local RNG.
    pub fn compute<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self::compute_with_rng(ids, &mut rand::thread_rng())
    }

    /// Computes positions for records in display order.
    pub fn for_records(records: &[MemoryRecord]) -> Self {
        Self::compute(records.iter().map(|record| record.id.as_str()))
    }

    /// Computes positions with a caller-supplied RNG.
    pub fn compute_with_rng<I, R>(ids: I, rng: &mut R) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut layout = Self::default();
        let mut previous = ScatterPosition::ORIGIN;

        for (index, id) in ids.into_iter().enumerate() {
            let id = id.as_ref().to_string();
            let position = if index == 0 {
                ScatterPosition::ORIGIN
            } else {
                let x_offset = draw_offset(rng, previous.x_offset);
                let magnitude = draw_rotation_magnitude(rng);
                let clockwise = if index == 1 {
                    rng.gen_bool(0.5)
                } else {
                    previous.rotation_degrees < 0.0
                };
                ScatterPosition {
                    x_offset,
                    rotation_degrees: if clockwise { magnitude } else { -magnitude },
                }
            };

            previous = position;
            layout.positions.insert(id.clone(), position);
            layout.order.push(id);
        }

        debug!(
            "event=scatter_compute module=layout status=ok card_count={}",
            layout.order.len()
        );
        layout
    }

    pub fn position(&self, id: &str) -> Option<ScatterPosition> {
        self.positions.get(id).copied()
    }

    /// Ids in layout order.
    pub fn ids(&self) -> &[MemoryId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ScatterPosition)> + '_ {
        self.order.iter().map(|id| {
            let position = self
                .positions
                .get(id)
                .copied()
                .unwrap_or(ScatterPosition::ORIGIN);
            (id.as_str(), position)
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Resolves where card `index` with `id` is drawn given the selection.
    ///
    /// The first card and the pinned card are drawn at the origin; the pinned
    /// card is also raised and enlarged. Unknown ids fall back to the origin.
    pub fn placement(&self, index: usize, id: &str, selection: &CardSelection) -> CardPlacement {
        let pinned = selection.is_pinned(id);
        let position = if index == 0 || pinned {
            ScatterPosition::ORIGIN
        } else {
            self.position(id).unwrap_or(ScatterPosition::ORIGIN)
        };
        CardPlacement {
            x_offset: position.x_offset,
            rotation_degrees: position.rotation_degrees,
            top: card_top(index),
            z_index: if pinned { PINNED_Z_INDEX } else { 0 },
            scale: if pinned { PINNED_SCALE } else { 1.0 },
        }
    }

    /// Scrollable height needed to show every card.
    pub fn content_height(&self) -> f64 {
        card_top(self.order.len())
    }
}

/// Vertical position of card `index`.
pub fn card_top(index: usize) -> f64 {
    TOP_PADDING + index as f64 * CARD_GAP
}

fn draw_offset<R: Rng + ?Sized>(rng: &mut R, previous: f64) -> f64 {
    let mut candidate = rng.gen_range(-MAX_X_OFFSET..=MAX_X_OFFSET);
    for _ in 1..MAX_OFFSET_DRAWS {
        if (candidate - previous).abs() >= MIN_STAGGER {
            return candidate;
        }
        candidate = rng.gen_range(-MAX_X_OFFSET..=MAX_X_OFFSET);
    }
    if (candidate - previous).abs() < MIN_STAGGER {
        debug!("event=scatter_draw module=layout status=capped attempts={MAX_OFFSET_DRAWS}");
    }
    candidate
}

fn draw_rotation_magnitude<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let base = rng.gen_range(MIN_ROTATION_DEGREES..=MAX_ROTATION_DEGREES);
    if rng.gen_bool(ROTATION_BOOST_PROBABILITY) {
        base * ROTATION_BOOST_FACTOR
    } else {
        base
    }
}
