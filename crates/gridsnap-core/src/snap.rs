//! Snap targets: grid, alignment guides, and provider composition.
//!
//! Providers refine a proposed move so that the moved rectangle aligns to
//! the nearest snap target. All snap computation happens in device units.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default grid spacing in device units (matches the visual grid).
pub const GRID_SPACING: f64 = 20.0;

/// Distance within which a guide attracts an edge, in device units.
pub const GUIDE_SNAP_THRESHOLD: f64 = 8.0;

/// Which axes a snap query may refine.
///
/// `horizontal` allows refinement of the x component of the delta,
/// `vertical` the y component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapAxes {
    pub horizontal: bool,
    pub vertical: bool,
}

impl SnapAxes {
    /// Refine both axes.
    pub const BOTH: SnapAxes = SnapAxes {
        horizontal: true,
        vertical: true,
    };
    /// Refine only the x component.
    pub const HORIZONTAL: SnapAxes = SnapAxes {
        horizontal: true,
        vertical: false,
    };
    /// Refine only the y component.
    pub const VERTICAL: SnapAxes = SnapAxes {
        horizontal: false,
        vertical: true,
    };
}

/// A proposed move to be refined against snap targets.
///
/// `rect` is the absolute device-space rectangle of the moved element,
/// already translated by `delta`. Requests are built fresh per query and
/// never persisted.
#[derive(Debug, Clone, Copy)]
pub struct SnapRequest {
    /// The rectangle being moved, translated by the proposed delta.
    pub rect: Rect,
    /// The proposed translation, device units, sub-pixel precision.
    pub delta: Vec2,
    /// Axes the provider may refine.
    pub axes: SnapAxes,
}

/// A provider's reply: the refined delta plus which axes actually snapped.
///
/// Axes without a reachable target keep the proposed delta component
/// unchanged.
#[derive(Debug, Clone, Copy)]
pub struct SnapOutcome {
    /// The refined translation, device units.
    pub delta: Vec2,
    /// Whether the x component was snapped.
    pub snapped_x: bool,
    /// Whether the y component was snapped.
    pub snapped_y: bool,
}

impl SnapOutcome {
    /// An outcome that leaves the proposed delta unchanged.
    pub fn unchanged(delta: Vec2) -> Self {
        Self {
            delta,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any axis snapped.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// A source of snap targets for moved rectangles.
///
/// Implementations are pure: the reply is the only effect of a query.
pub trait SnapProvider {
    /// Refine a proposed move against this provider's targets.
    fn snap(&self, request: &SnapRequest) -> SnapOutcome;
}

/// Grid configuration for a diagram, device units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GridSettings {
    /// Distance between grid lines.
    pub spacing: f64,
    /// Origin the grid is anchored at.
    pub origin: Point,
    /// Whether grid snapping is active.
    pub enabled: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            spacing: GRID_SPACING,
            origin: Point::ZERO,
            enabled: true,
        }
    }
}

/// Snaps the north-west corner of the moved rectangle to the nearest grid
/// intersection. Always snaps while the grid is enabled (no threshold).
#[derive(Debug, Clone, Copy)]
pub struct GridSnap {
    settings: GridSettings,
}

impl GridSnap {
    /// Create a grid provider from the diagram's grid settings.
    pub fn new(settings: GridSettings) -> Self {
        Self { settings }
    }
}

impl SnapProvider for GridSnap {
    fn snap(&self, request: &SnapRequest) -> SnapOutcome {
        let mut outcome = SnapOutcome::unchanged(request.delta);
        let GridSettings {
            spacing,
            origin,
            enabled,
        } = self.settings;
        if !enabled || spacing <= 0.0 {
            return outcome;
        }

        let nw = request.rect.origin();
        if request.axes.horizontal {
            let snapped = ((nw.x - origin.x) / spacing).round() * spacing + origin.x;
            outcome.delta.x += snapped - nw.x;
            outcome.snapped_x = true;
        }
        if request.axes.vertical {
            let snapped = ((nw.y - origin.y) / spacing).round() * spacing + origin.y;
            outcome.delta.y += snapped - nw.y;
            outcome.snapped_y = true;
        }
        outcome
    }
}

/// Alignment guides for a diagram, device units.
///
/// `horizontal` holds the y coordinates of horizontal guide lines,
/// `vertical` the x coordinates of vertical guide lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideSet {
    pub horizontal: Vec<f64>,
    pub vertical: Vec<f64>,
}

impl GuideSet {
    /// Add a horizontal guide line at the given y coordinate.
    pub fn add_horizontal(&mut self, y: f64) {
        self.horizontal.push(y);
    }

    /// Add a vertical guide line at the given x coordinate.
    pub fn add_vertical(&mut self, x: f64) {
        self.vertical.push(x);
    }

    /// Check if no guides are defined.
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }
}

/// Snaps rectangle edges (and center) to the nearest guide within a
/// distance threshold. Axes with no guide in range are left unchanged.
#[derive(Debug, Clone)]
pub struct GuideSnap {
    guides: GuideSet,
    threshold: f64,
}

impl GuideSnap {
    /// Create a guide provider from the diagram's guides.
    pub fn new(guides: GuideSet) -> Self {
        Self {
            guides,
            threshold: GUIDE_SNAP_THRESHOLD,
        }
    }

    /// Override the attraction threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Smallest correction that moves one of `edges` onto one of `guides`,
/// if any pair is within `threshold`.
fn nearest_correction(guides: &[f64], edges: &[f64], threshold: f64) -> Option<f64> {
    let mut best: Option<f64> = None;
    for &guide in guides {
        for &edge in edges {
            let correction = guide - edge;
            if correction.abs() <= threshold
                && best.is_none_or(|b: f64| correction.abs() < b.abs())
            {
                best = Some(correction);
            }
        }
    }
    best
}

impl SnapProvider for GuideSnap {
    fn snap(&self, request: &SnapRequest) -> SnapOutcome {
        let mut outcome = SnapOutcome::unchanged(request.delta);
        let rect = request.rect;

        if request.axes.horizontal {
            let edges = [rect.x0, rect.center().x, rect.x1];
            if let Some(correction) =
                nearest_correction(&self.guides.vertical, &edges, self.threshold)
            {
                outcome.delta.x += correction;
                outcome.snapped_x = true;
            }
        }
        if request.axes.vertical {
            let edges = [rect.y0, rect.center().y, rect.y1];
            if let Some(correction) =
                nearest_correction(&self.guides.horizontal, &edges, self.threshold)
            {
                outcome.delta.y += correction;
                outcome.snapped_y = true;
            }
        }
        outcome
    }
}

/// Chains providers in order; the first provider to snap an axis wins that
/// axis. Later providers are only asked about axes still unsnapped.
pub struct CompoundSnap {
    providers: Vec<Box<dyn SnapProvider>>,
}

impl CompoundSnap {
    /// Create a compound provider from an ordered list of providers.
    pub fn new(providers: Vec<Box<dyn SnapProvider>>) -> Self {
        Self { providers }
    }
}

impl SnapProvider for CompoundSnap {
    fn snap(&self, request: &SnapRequest) -> SnapOutcome {
        let mut outcome = SnapOutcome::unchanged(request.delta);
        for provider in &self.providers {
            let remaining = SnapAxes {
                horizontal: request.axes.horizontal && !outcome.snapped_x,
                vertical: request.axes.vertical && !outcome.snapped_y,
            };
            if !remaining.horizontal && !remaining.vertical {
                break;
            }
            let sub = provider.snap(&SnapRequest {
                rect: request.rect,
                delta: request.delta,
                axes: remaining,
            });
            if sub.snapped_x {
                outcome.delta.x = sub.delta.x;
                outcome.snapped_x = true;
            }
            if sub.snapped_y {
                outcome.delta.y = sub.delta.y;
                outcome.snapped_y = true;
            }
        }
        outcome
    }
}
