use glam::Vec3;

/// A decoded point cloud with positions, colors, and normals.
///
/// Positions, colors and normals are flat sequences of per-point triples in
/// point order. Colors and normals are only present when the source data
/// carried them; a cloud without colors is expected to be drawn with a single
/// uniform color by the consumer.
#[derive(Debug, Clone)]
pub struct PointCloud {
    // Display name supplied by the caller, never derived from content.
    name: String,
    // Number of point records decoded from the source.
    num_points: usize,
    // The positions of the points, empty when the source had no x/y/z fields.
    positions: Vec<[f32; 3]>,
    // The colors of the points in [0, 1].
    colors: Option<Vec<[f32; 3]>>,
    // The normals of the points.
    normals: Option<Vec<[f32; 3]>>,
}

impl PointCloud {
    /// Create a new point cloud from positions, colors (optional), and normals (optional).
    pub fn new(
        name: impl Into<String>,
        num_points: usize,
        positions: Vec<[f32; 3]>,
        colors: Option<Vec<[f32; 3]>>,
        normals: Option<Vec<[f32; 3]>>,
    ) -> Self {
        Self {
            name: name.into(),
            num_points,
            positions,
            colors,
            normals,
        }
    }

    /// Get the display name of the point cloud.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of points in the point cloud.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_points
    }

    /// Check if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Get as reference the positions of the points in the point cloud.
    pub fn positions(&self) -> &Vec<[f32; 3]> {
        &self.positions
    }

    /// Get as reference the colors of the points in the point cloud.
    pub fn colors(&self) -> Option<&Vec<[f32; 3]>> {
        self.colors.as_ref()
    }

    /// Get as reference the normals of the points in the point cloud.
    pub fn normals(&self) -> Option<&Vec<[f32; 3]>> {
        self.normals.as_ref()
    }

    /// Get the minimum bound of the point cloud.
    pub fn get_min_bound(&self) -> Vec3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        self.positions
            .iter()
            .map(|&point| Vec3::from(point))
            .fold(Vec3::from(self.positions[0]), |a, b| a.min(b))
    }

    /// Get the maximum bound of the point cloud.
    pub fn get_max_bound(&self) -> Vec3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        self.positions
            .iter()
            .map(|&point| Vec3::from(point))
            .fold(Vec3::from(self.positions[0]), |a, b| a.max(b))
    }

    /// Get a bounding sphere (center, radius) enclosing all points.
    ///
    /// The center is the midpoint of the axis-aligned bounds and the radius
    /// the largest distance from that center to any point.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        if self.positions.is_empty() {
            return (Vec3::ZERO, 0.0);
        }
        let center = (self.get_min_bound() + self.get_max_bound()) * 0.5;
        let radius = self
            .positions
            .iter()
            .map(|&point| (Vec3::from(point) - center).length())
            .fold(0.0f32, f32::max);
        (center, radius)
    }
}
