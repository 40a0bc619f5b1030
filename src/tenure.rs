use std::collections::HashMap;
use std::ops::Range;

/// Plotly's default qualitative palette.
pub const PALETTE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// A maximal run of consecutive rows played for one club.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub club: String,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits `rows` into maximal same-club runs, keeping row order. A club the
/// player returns to after playing elsewhere starts a new segment.
pub fn segment_by_club<T>(rows: &[T], club_of: impl Fn(&T) -> &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let Some(first) = rows.first() else {
        return segments;
    };

    let mut start = 0usize;
    let mut current = club_of(first);
    for (idx, row) in rows.iter().enumerate().skip(1) {
        let club = club_of(row);
        if club != current {
            segments.push(Segment {
                club: current.to_string(),
                start,
                end: idx,
            });
            start = idx;
            current = club;
        }
    }
    segments.push(Segment {
        club: current.to_string(),
        start,
        end: rows.len(),
    });
    segments
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Every tenure at a club shares the club's color.
    ByClub,
    /// Each segment takes the next palette color in scan order.
    PerSegment,
}

impl ColorMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "club" | "by_club" | "stable" => Some(ColorMode::ByClub),
            "segment" | "per_segment" | "first_seen" => Some(ColorMode::PerSegment),
            _ => None,
        }
    }
}

/// Color assignment for one chart. Build a fresh one per player.
#[derive(Debug, Clone)]
pub struct ClubColors {
    mode: ColorMode,
    assigned: HashMap<String, &'static str>,
    next: usize,
}

impl ClubColors {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            assigned: HashMap::new(),
            next: 0,
        }
    }

    pub fn color_for(&mut self, segment: &Segment) -> &'static str {
        match self.mode {
            ColorMode::PerSegment => self.take_next(),
            ColorMode::ByClub => self.club_color(&segment.club),
        }
    }

    /// Stable color for a club regardless of mode; used by per-club summaries.
    pub fn club_color(&mut self, club: &str) -> &'static str {
        if let Some(color) = self.assigned.get(club).copied() {
            return color;
        }
        let color = self.take_next();
        self.assigned.insert(club.to_string(), color);
        color
    }

    fn take_next(&mut self) -> &'static str {
        let color = PALETTE[self.next % PALETTE.len()];
        self.next += 1;
        color
    }
}
