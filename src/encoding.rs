use crate::color::{validate_colors, DEFAULT_PALETTE};
use crate::error::ChartError;
use crate::normalize::SeriesKey;
use plotters::style::RGBColor;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerShape {
    Circle,
    Square,
    TriangleUp,
    Diamond,
    Cross,
    TriangleDown,
    Plus,
}

/// Candidate markers, in assignment order
pub const MARKERS: &[MarkerShape] = &[
    MarkerShape::Circle,
    MarkerShape::Square,
    MarkerShape::TriangleUp,
    MarkerShape::Diamond,
    MarkerShape::Cross,
    MarkerShape::TriangleDown,
    MarkerShape::Plus,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// (on, off) lengths in pixels, `None` for a continuous line
    pub fn dash_pattern(&self) -> Option<(f64, f64)> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some((8.0, 5.0)),
            LineStyle::Dotted => Some((2.0, 3.0)),
        }
    }
}

pub const LINE_STYLES: &[LineStyle] = &[LineStyle::Solid, LineStyle::Dashed, LineStyle::Dotted];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoding {
    pub color: RGBColor,
    pub marker: Option<MarkerShape>,
    pub line_style: LineStyle,
}

/// Hands out encodings in series order. Build a fresh one per chart.
#[derive(Debug)]
pub struct EncodingAssigner {
    colors: Vec<RGBColor>,
    markers_enabled: bool,
    used: HashSet<(usize, usize)>,
    next: usize,
}

impl EncodingAssigner {
    pub fn new(color_overrides: &[String], markers_enabled: bool) -> Result<Self, ChartError> {
        let colors = if color_overrides.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            validate_colors(color_overrides)?
        };

        Ok(Self {
            colors,
            markers_enabled,
            used: HashSet::new(),
            next: 0,
        })
    }

    /// Number of distinct (color, marker) pairs before wraparound
    pub fn capacity(&self) -> usize {
        self.colors.len() * MARKERS.len()
    }

    pub fn next_encoding(&mut self) -> Encoding {
        let i = self.next;
        self.next += 1;

        let color_idx = i % self.colors.len();
        let mut marker_idx = i % MARKERS.len();

        if self.used.len() < self.capacity() {
            while self.used.contains(&(color_idx, marker_idx)) {
                marker_idx = (marker_idx + 1) % MARKERS.len();
            }
            self.used.insert((color_idx, marker_idx));
        }

        Encoding {
            color: self.colors[color_idx],
            marker: self.markers_enabled.then(|| MARKERS[marker_idx]),
            line_style: LINE_STYLES[(i / self.colors.len()) % LINE_STYLES.len()],
        }
    }
}

/// Series identity -> encoding, in draw order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodingAssignment {
    entries: Vec<(SeriesKey, Encoding)>,
}

impl EncodingAssignment {
    pub fn get(&self, key: &SeriesKey) -> Option<&Encoding> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(SeriesKey, Encoding)> {
        self.entries.iter()
    }
}

/// Assign an encoding to every distinct key, in the given order.
pub fn assign(
    keys: &[SeriesKey],
    color_overrides: &[String],
    markers_enabled: bool,
) -> Result<EncodingAssignment, ChartError> {
    let mut assigner = EncodingAssigner::new(color_overrides, markers_enabled)?;
    let mut entries: Vec<(SeriesKey, Encoding)> = Vec::with_capacity(keys.len());

    for key in keys {
        if entries.iter().any(|(k, _)| k == key) {
            continue;
        }
        entries.push((key.clone(), assigner.next_encoding()));
    }

    Ok(EncodingAssignment { entries })
}
