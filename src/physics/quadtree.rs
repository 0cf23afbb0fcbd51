use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
    min: Vec2,
    side: f32,
}

impl QuadBounds {
    fn cover(points: &[Vec2]) -> Option<Self> {
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), point| (min.min(*point), max.max(*point)),
        );
        if !(min.is_finite() && max.is_finite()) {
            return None;
        }

        let span = max - min;
        let side = span.x.max(span.y).max(1.0) + 2.0;
        let center = (min + max) * 0.5;
        Some(Self {
            min: center - Vec2::splat(side * 0.5),
            side,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let max = self.min + Vec2::splat(self.side);
        (self.min.x..=max.x).contains(&point.x) && (self.min.y..=max.y).contains(&point.y)
    }

    pub(super) fn side_length(self) -> f32 {
        self.side
    }

    /// Quadrant index: bit 0 is the right half, bit 1 the lower half.
    fn quadrant_for(self, point: Vec2) -> usize {
        let mid = self.min + Vec2::splat(self.side * 0.5);
        usize::from(point.x >= mid.x) | (usize::from(point.y >= mid.y) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let half = self.side * 0.5;
        let offset = vec2((quadrant & 1) as f32 * half, (quadrant >> 1) as f32 * half);
        Self {
            min: self.min + offset,
            side: half,
        }
    }
}

/// Barnes-Hut cell: every node counts as unit mass.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) center_of_mass: Vec2,
    pub(super) mass: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2]) -> Option<Self> {
        let bounds = QuadBounds::cover(positions)?;
        Some(Self::subdivide(bounds, (0..positions.len()).collect(), positions, 0))
    }

    fn subdivide(bounds: QuadBounds, indices: Vec<usize>, positions: &[Vec2], depth: usize) -> Self {
        let mass = indices.len() as f32;
        let center_of_mass = if indices.is_empty() {
            Vec2::ZERO
        } else {
            indices
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + positions[index])
                / mass
        };

        let mut cell = Self {
            bounds,
            center_of_mass,
            mass,
            indices,
            children: Default::default(),
        };
        if depth >= MAX_DEPTH || cell.indices.len() <= LEAF_CAPACITY {
            return cell;
        }

        let mut buckets: [Vec<usize>; 4] = Default::default();
        for &index in &cell.indices {
            buckets[bounds.quadrant_for(positions[index])].push(index);
        }
        // Coincident points would split forever.
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return cell;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                let child = Self::subdivide(bounds.child(quadrant), bucket, positions, depth + 1);
                cell.children[quadrant] = Some(Box::new(child));
            }
        }
        cell.indices.clear();
        cell
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}
