//! Constructive solid geometry.
//!
//! Every solid reports where a ray enters and leaves it as a sorted list of
//! [`IntervalBoundary`] values. Boolean nodes merge their children's lists
//! and keep only the boundaries where the combined inside/outside status
//! flips, so arbitrarily deep trees reduce to the same representation.

use crate::{Cylinder, DoubleCone, GeometryError, HitRecord, MaterialId, Plane, Ray, Sphere};
use lumen_math::{Aabb, Interval, Mat3, Mat4, Mat4Ext, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Entering,
    Exiting,
}

/// Point where a ray crosses the surface of a solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalBoundary {
    /// Ray parameter, ±∞ for the far ends of unbounded solids
    pub t: f32,
    pub kind: BoundaryKind,
    /// Outward normal of the solid at the crossing
    pub normal: Vec3,
    pub material: MaterialId,
    pub u: f32,
    pub v: f32,
}

impl IntervalBoundary {
    pub fn new(t: f32, kind: BoundaryKind, normal: Vec3, material: MaterialId) -> Self {
        Self {
            t,
            kind,
            normal,
            material,
            u: 0.0,
            v: 0.0,
        }
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.u = u;
        self.v = v;
        self
    }
}

/// Texture coordinates around the Z axis: `u` is the azimuth in turns,
/// `v` the height wrapped into `[0, 1)`.
pub(crate) fn axial_uv(p: Vec3) -> (f32, f32) {
    let turns = p.y.atan2(p.x) / (2.0 * std::f32::consts::PI);
    (wrap_unit(turns), wrap_unit(p.z))
}

fn wrap_unit(x: f32) -> f32 {
    // rem_euclid rounds tiny negatives up to exactly 1.
    let w = x.rem_euclid(1.0);
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// Solve `a t² + b t + c <= 0` and return the parameter spans where it
/// holds, in ascending order.
pub(crate) fn quadric_spans(a: f32, b: f32, c: f32) -> Vec<(f32, f32)> {
    const INF: f32 = f32::INFINITY;

    if a.is_nan() || b.is_nan() || c.is_nan() {
        return Vec::new();
    }

    if a == 0.0 {
        if b == 0.0 {
            return if c <= 0.0 { vec![(-INF, INF)] } else { Vec::new() };
        }
        let root = -c / b;
        return if b > 0.0 {
            vec![(-INF, root)]
        } else {
            vec![(root, INF)]
        };
    }

    let disc = b * b - 4.0 * a * c;
    // Overflow for far-away origins; treated as a miss.
    if !disc.is_finite() {
        return Vec::new();
    }
    if disc < 0.0 {
        return if a > 0.0 { Vec::new() } else { vec![(-INF, INF)] };
    }

    // Numerically stable form: avoid subtracting nearly equal values.
    let sq = disc.sqrt();
    let q = if b >= 0.0 { -0.5 * (b + sq) } else { -0.5 * (b - sq) };
    let (r1, r2) = if q == 0.0 { (0.0, 0.0) } else { (q / a, c / q) };
    let (lo, hi) = (r1.min(r2), r1.max(r2));
    if !(lo.is_finite() && hi.is_finite()) {
        return Vec::new();
    }

    if a > 0.0 {
        vec![(lo, hi)]
    } else if lo < hi {
        vec![(-INF, lo), (hi, INF)]
    } else {
        vec![(-INF, INF)]
    }
}

/// Turn spans into alternating boundaries. `surface` gives the outward
/// normal and uv at a finite parameter.
pub(crate) fn spans_to_boundaries(
    spans: &[(f32, f32)],
    material: MaterialId,
    surface: impl Fn(f32) -> (Vec3, (f32, f32)),
) -> Vec<IntervalBoundary> {
    let boundary = |t: f32, kind| {
        if t.is_finite() {
            let (normal, (u, v)) = surface(t);
            IntervalBoundary::new(t, kind, normal, material).with_uv(u, v)
        } else {
            IntervalBoundary::new(t, kind, Vec3::Z, material)
        }
    };

    spans
        .iter()
        .flat_map(|&(t0, t1)| {
            [
                boundary(t0, BoundaryKind::Entering),
                boundary(t1, BoundaryKind::Exiting),
            ]
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    /// Left minus right
    Difference,
}

impl BooleanOp {
    fn apply(self, in_left: bool, in_right: bool) -> bool {
        match self {
            BooleanOp::Union => in_left || in_right,
            BooleanOp::Intersection => in_left && in_right,
            BooleanOp::Difference => in_left && !in_right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Merge two sorted boundary lists under `op`.
///
/// Boundaries that share a parameter are applied together and a boundary
/// is emitted only when the combined status differs before and after the
/// group, so no zero-length intervals come out.
pub fn combine(
    op: BooleanOp,
    left: &[IntervalBoundary],
    right: &[IntervalBoundary],
) -> Vec<IntervalBoundary> {
    let mut events = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() || j < right.len() {
        let take_left = j >= right.len() || (i < left.len() && left[i].t <= right[j].t);
        if take_left {
            events.push((Side::Left, left[i]));
            i += 1;
        } else {
            events.push((Side::Right, right[j]));
            j += 1;
        }
    }

    let mut result = Vec::new();
    let (mut in_left, mut in_right) = (false, false);
    let mut inside = op.apply(in_left, in_right);

    let mut start = 0;
    while start < events.len() {
        let t = events[start].1.t;
        let (was_left, was_right) = (in_left, in_right);
        // A group always holds at least its first event.
        let mut end = start + 1;
        while end < events.len() && events[end].1.t == t {
            end += 1;
        }
        for (side, boundary) in &events[start..end] {
            let entering = boundary.kind == BoundaryKind::Entering;
            match side {
                Side::Left => in_left = entering,
                Side::Right => in_right = entering,
            }
        }

        let now = op.apply(in_left, in_right);
        if now != inside {
            // Prefer a boundary from a child whose status actually changed.
            let group = &events[start..end];
            let (side, source) = group
                .iter()
                .find(|(side, _)| match side {
                    Side::Left => in_left != was_left,
                    Side::Right => in_right != was_right,
                })
                .unwrap_or(&group[0]);

            let normal = if op == BooleanOp::Difference && *side == Side::Right {
                -source.normal
            } else {
                source.normal
            };
            result.push(IntervalBoundary {
                kind: if now {
                    BoundaryKind::Entering
                } else {
                    BoundaryKind::Exiting
                },
                normal,
                ..*source
            });
            inside = now;
        }
        start = end;
    }
    result
}

/// A closed set of points that rays can enter and leave.
#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    HalfSpace(Plane),
    Sphere(Sphere),
    DoubleCone(DoubleCone),
    Cylinder(Cylinder),
    Node(Box<CsgNode>),
    Instance(Box<CsgInstance>),
}

/// Boolean combination of two solids.
#[derive(Debug, Clone, PartialEq)]
pub struct CsgNode {
    op: BooleanOp,
    left: Solid,
    right: Solid,
    bbox: Aabb,
}

impl CsgNode {
    pub fn new(op: BooleanOp, left: Solid, right: Solid) -> Self {
        let (a, b) = (left.bounding_box(), right.bounding_box());
        let bbox = match op {
            BooleanOp::Union => Aabb::surrounding(&a, &b),
            BooleanOp::Intersection => Aabb::overlap(&a, &b),
            BooleanOp::Difference => a,
        };
        Self {
            op,
            left,
            right,
            bbox,
        }
    }

    /// Replace the derived box with a tighter one known to the caller. The
    /// box must still contain the whole solid.
    pub fn with_bounds(mut self, bbox: Aabb) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn op(&self) -> BooleanOp {
        self.op
    }

    fn interval_boundaries(&self, ray: &Ray) -> Vec<IntervalBoundary> {
        if self.bbox.hit(ray.origin(), ray.direction(), Interval::UNIVERSE).is_none() {
            return Vec::new();
        }

        let left = self.left.interval_boundaries(ray);
        if left.is_empty() && self.op != BooleanOp::Union {
            return left;
        }
        let right = self.right.interval_boundaries(ray);
        combine(self.op, &left, &right)
    }
}

/// A solid placed by an affine transform.
#[derive(Debug, Clone, PartialEq)]
pub struct CsgInstance {
    solid: Solid,
    inverse: Mat4,
    normal_matrix: Mat3,
    bbox: Aabb,
}

impl CsgInstance {
    pub fn new(solid: Solid, transform: Mat4) -> Result<Self, GeometryError> {
        if !transform.is_invertible() {
            return Err(GeometryError::SingularTransform);
        }
        let bbox = transform.transform_aabb(&solid.bounding_box());
        Ok(Self {
            solid,
            inverse: transform.inverse(),
            normal_matrix: transform.normal_matrix(),
            bbox,
        })
    }

    fn interval_boundaries(&self, ray: &Ray) -> Vec<IntervalBoundary> {
        // The object-space direction is left unnormalized so t carries over.
        let local = Ray::new(
            self.inverse.transform_point3(ray.origin()),
            self.inverse.transform_vector3(ray.direction()),
            ray.time(),
        );
        let mut bounds = self.solid.interval_boundaries(&local);
        for b in &mut bounds {
            b.normal = (self.normal_matrix * b.normal).normalize_or_zero();
        }
        bounds
    }
}

/// Golden ratio, for the dodecahedron's face normals.
const PHI: f32 = 1.618_034;

impl Solid {
    pub fn union(a: Solid, b: Solid) -> Solid {
        Solid::Node(Box::new(CsgNode::new(BooleanOp::Union, a, b)))
    }

    pub fn intersection(a: Solid, b: Solid) -> Solid {
        Solid::Node(Box::new(CsgNode::new(BooleanOp::Intersection, a, b)))
    }

    pub fn difference(a: Solid, b: Solid) -> Solid {
        Solid::Node(Box::new(CsgNode::new(BooleanOp::Difference, a, b)))
    }

    /// Place this solid with an affine transform.
    pub fn transformed(self, transform: Mat4) -> Result<Solid, GeometryError> {
        Ok(Solid::Instance(Box::new(CsgInstance::new(self, transform)?)))
    }

    /// Cone with its apex at the origin and its base of radius 1 at z = -1.
    pub fn unit_cone(material: MaterialId) -> Solid {
        let top = Solid::HalfSpace(Plane::new(Vec3::new(0.0, 0.0, -1.0), -1.0, material));
        let bottom = Solid::HalfSpace(Plane::new(Vec3::Z, 0.0, material));
        let cone = Solid::DoubleCone(DoubleCone::new(material));

        let node = CsgNode::new(
            BooleanOp::Intersection,
            Solid::intersection(top, cone),
            bottom,
        )
        .with_bounds(Aabb::from_points(Vec3::splat(-1.0), Vec3::ONE));
        Solid::Node(Box::new(node))
    }

    /// Cylinder of the given radius around Z, capped at z = ±half_height.
    pub fn capped_cylinder(radius: f32, half_height: f32, material: MaterialId) -> Solid {
        let side = Solid::Cylinder(Cylinder::new(radius, material));
        let top = Solid::HalfSpace(Plane::new(Vec3::Z, -half_height, material));
        let bottom = Solid::HalfSpace(Plane::new(-Vec3::Z, -half_height, material));
        Solid::intersection(Solid::intersection(side, top), bottom)
    }

    /// Axis-aligned cube of half-extent `half` centred at the origin.
    pub fn cube(half: f32, material: MaterialId) -> Solid {
        let face = |n: Vec3| Solid::HalfSpace(Plane::new(n, -half, material));
        [-Vec3::X, Vec3::Y, -Vec3::Y, Vec3::Z, -Vec3::Z]
            .into_iter()
            .map(face)
            .fold(face(Vec3::X), Solid::intersection)
    }

    /// Regular dodecahedron with inradius 1 centred at the origin.
    pub fn dodecahedron(material: MaterialId) -> Solid {
        let normals = [
            Vec3::new(0.0, 1.0, PHI),
            Vec3::new(0.0, 1.0, -PHI),
            Vec3::new(0.0, -1.0, PHI),
            Vec3::new(0.0, -1.0, -PHI),
            Vec3::new(1.0, PHI, 0.0),
            Vec3::new(1.0, -PHI, 0.0),
            Vec3::new(-1.0, PHI, 0.0),
            Vec3::new(-1.0, -PHI, 0.0),
            Vec3::new(PHI, 0.0, 1.0),
            Vec3::new(PHI, 0.0, -1.0),
            Vec3::new(-PHI, 0.0, 1.0),
            Vec3::new(-PHI, 0.0, -1.0),
        ];
        let face = |n: Vec3| Solid::HalfSpace(Plane::new(n, -n.length(), material));
        let first_eleven = normals[1..11]
            .iter()
            .map(|&n| face(n))
            .fold(face(normals[0]), Solid::intersection);

        // Circumradius of a dodecahedron with inradius 1 is about 1.258.
        let node = CsgNode::new(BooleanOp::Intersection, first_eleven, face(normals[11]))
            .with_bounds(Aabb::from_points(Vec3::splat(-1.3), Vec3::splat(1.3)));
        Solid::Node(Box::new(node))
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            Solid::HalfSpace(plane) => plane.half_space_bounds(),
            Solid::Sphere(sphere) => sphere.bounding_box(),
            Solid::DoubleCone(_) => Aabb::UNIVERSE,
            Solid::Cylinder(cylinder) => cylinder.bounding_box(),
            Solid::Node(node) => node.bbox,
            Solid::Instance(instance) => instance.bbox,
        }
    }

    /// Sorted, alternating entry/exit boundaries of the solid along the
    /// whole line of the ray, negative parameters included.
    pub fn interval_boundaries(&self, ray: &Ray) -> Vec<IntervalBoundary> {
        match self {
            Solid::HalfSpace(plane) => plane.interval_boundaries(ray),
            Solid::Sphere(sphere) => sphere.interval_boundaries(ray),
            Solid::DoubleCone(cone) => cone.interval_boundaries(ray),
            Solid::Cylinder(cylinder) => cylinder.interval_boundaries(ray),
            Solid::Node(node) => node.interval_boundaries(ray),
            Solid::Instance(instance) => instance.interval_boundaries(ray),
        }
    }

    /// First finite boundary inside `ray_t`. For a ray that starts inside
    /// the solid this is an exit, and its normal faces away from the ray.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.interval_boundaries(ray)
            .into_iter()
            .find(|b| b.t.is_finite() && ray_t.surrounds(b.t))
            .map(|b| HitRecord::from_ray(ray, b.t, b.normal, b.material, b.u, b.v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_alternating(bounds: &[IntervalBoundary]) {
        assert_eq!(bounds.len() % 2, 0, "odd boundary count: {bounds:?}");
        for (i, b) in bounds.iter().enumerate() {
            let expected = if i % 2 == 0 {
                BoundaryKind::Entering
            } else {
                BoundaryKind::Exiting
            };
            assert_eq!(b.kind, expected, "bad kind at {i}: {bounds:?}");
        }
        for pair in bounds.windows(2) {
            assert!(pair[0].t <= pair[1].t, "unsorted: {bounds:?}");
        }
    }

    fn random_ray(rng: &mut StdRng) -> Ray {
        let mut v = || Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let origin = v() * 4.0;
        let direction = v();
        Ray::new(origin, direction, 0.0)
    }

    fn sample_solids() -> Vec<Solid> {
        let m = MaterialId::default();
        let sphere = Solid::Sphere(Sphere::new(Vec3::new(0.3, 0.0, 0.0), 1.2, m));
        vec![
            Solid::HalfSpace(Plane::new(Vec3::new(1.0, 2.0, -0.5), 0.3, m)),
            sphere.clone(),
            Solid::DoubleCone(DoubleCone::new(m)),
            Solid::Cylinder(Cylinder::new(0.7, m)),
            Solid::unit_cone(m),
            Solid::capped_cylinder(0.5, 1.0, m),
            Solid::cube(1.0, m),
            Solid::dodecahedron(m),
            Solid::difference(Solid::cube(1.0, m), sphere.clone()),
            Solid::union(Solid::cube(0.5, m), Solid::Cylinder(Cylinder::new(0.25, m))),
            Solid::cube(1.0, m)
                .transformed(Mat4::from_scale(Vec3::new(2.0, 0.5, 1.0)))
                .unwrap(),
        ]
    }

    #[test]
    fn test_alternation_for_random_rays() {
        let mut rng = StdRng::seed_from_u64(7);
        let solids = sample_solids();
        for _ in 0..500 {
            let ray = random_ray(&mut rng);
            for solid in &solids {
                assert_alternating(&solid.interval_boundaries(&ray));
            }
        }
    }

    #[test]
    fn test_sphere_intersect_half_space() {
        let m = MaterialId::default();
        let sphere = Solid::Sphere(Sphere::unit(m));
        // x <= 0
        let half = Solid::HalfSpace(Plane::new(Vec3::X, 0.0, m));
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 0.0);

        let inter = Solid::intersection(sphere.clone(), half.clone()).interval_boundaries(&ray);
        assert_eq!(inter.len(), 2);
        assert!((inter[0].t - 4.0).abs() < 1e-5);
        assert!((inter[1].t - 5.0).abs() < 1e-5);
        assert!((inter[1].normal - Vec3::X).length() < 1e-5);

        // The half-space already contains the ray origin, so the union is
        // entered at −∞ and left where the sphere ends.
        let union = Solid::union(sphere, half).interval_boundaries(&ray);
        assert_eq!(union.len(), 2);
        assert_eq!(union[0].t, f32::NEG_INFINITY);
        assert!((union[1].t - 6.0).abs() < 1e-5);
        assert_eq!(union[1].kind, BoundaryKind::Exiting);
    }

    #[test]
    fn test_difference_negates_subtrahend_normals() {
        let m = MaterialId::default();
        let outer = Solid::Sphere(Sphere::new(Vec3::ZERO, 2.0, m));
        let inner = Solid::Sphere(Sphere::unit(m));
        let shell = Solid::difference(outer, inner);
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 0.0);

        let bounds = shell.interval_boundaries(&ray);
        let ts: Vec<f32> = bounds.iter().map(|b| b.t).collect();
        assert_eq!(bounds.len(), 4);
        for (t, expected) in ts.iter().zip([3.0, 4.0, 6.0, 7.0]) {
            assert!((t - expected).abs() < 1e-5);
        }
        // Leaving the shell into the hole: the normal points toward the centre.
        assert!((bounds[1].normal - Vec3::X).length() < 1e-5);
        assert!((bounds[2].normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_coincident_faces_leave_no_zero_length_interval() {
        let m = MaterialId::default();
        let a = Solid::cube(1.0, m);
        let b = Solid::cube(1.0, m);
        let ray = Ray::new(Vec3::new(-5.0, 0.2, 0.1), Vec3::X, 0.0);

        assert!(Solid::difference(a.clone(), b.clone()).interval_boundaries(&ray).is_empty());
        let union = Solid::union(a, b).interval_boundaries(&ray);
        assert_eq!(union.len(), 2);
    }

    #[test]
    fn test_far_origin_does_not_hang() {
        let m = MaterialId::default();
        let ray = Ray::new(Vec3::new(-1e20, 0.0, 0.0), Vec3::X, 0.0);

        assert!(quadric_spans(1.0, -2e20, f32::INFINITY).is_empty());
        assert!(Solid::Sphere(Sphere::unit(m)).interval_boundaries(&ray).is_empty());

        let union = Solid::union(Solid::Sphere(Sphere::unit(m)), Solid::cube(0.5, m));
        let bounds = union.interval_boundaries(&ray);
        assert!(bounds.iter().all(|b| !b.t.is_nan()));
        assert_alternating(&bounds);
    }

    #[test]
    fn test_empty_child_means_never_inside() {
        let m = MaterialId::default();
        let sphere = Solid::Sphere(Sphere::unit(m));
        let far = Solid::Sphere(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 1.0, m));
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 0.0);

        assert!(Solid::intersection(sphere.clone(), far.clone()).interval_boundaries(&ray).is_empty());
        assert_eq!(Solid::difference(sphere.clone(), far.clone()).interval_boundaries(&ray).len(), 2);
        assert_eq!(Solid::union(far, sphere).interval_boundaries(&ray).len(), 2);
    }

    #[test]
    fn test_intersect_returns_first_entry_or_exit_from_inside() {
        let m = MaterialId::default();
        let sphere = Solid::Sphere(Sphere::unit(m));
        let range = Interval::from_min(1e-4);

        let outside = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let hit = sphere.intersect(&outside, range).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!(hit.is_front_face());

        let inside = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let hit = sphere.intersect(&inside, range).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
        assert!(!hit.is_front_face());

        assert!(sphere.intersect(&outside, Interval::new(1e-4, 3.0)).is_none());
    }

    #[test]
    fn test_unit_cone_hits() {
        let m = MaterialId::default();
        let cone = Solid::unit_cone(m);

        // Straight up through the base at z = -1.
        let up = Ray::new(Vec3::new(0.2, 0.0, -5.0), Vec3::Z, 0.0);
        let hit = cone.intersect(&up, Interval::from_min(1e-4)).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!((hit.normal + Vec3::Z).length() < 1e-5);

        // The upper nappe is clipped away.
        let above = Ray::new(Vec3::new(-5.0, 0.0, 0.5), Vec3::X, 0.0);
        assert!(cone.intersect(&above, Interval::from_min(1e-4)).is_none());
    }

    #[test]
    fn test_instance_preserves_t_and_maps_normals() {
        let m = MaterialId::default();
        let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)) * Mat4::from_scale(Vec3::new(1.0, 1.0, 2.0));
        let solid = Solid::Sphere(Sphere::unit(m)).transformed(transform).unwrap();

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let hit = solid.intersect(&ray, Interval::from_min(1e-4)).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-5);
        assert!((hit.position - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert!((hit.normal - Vec3::Z).length() < 1e-5);

        let bbox = solid.bounding_box();
        assert!(bbox.contains_point(hit.position, 1e-4));
    }

    #[test]
    fn test_singular_transform_rejected() {
        let solid = Solid::Sphere(Sphere::unit(MaterialId::default()));
        let flat = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(matches!(solid.transformed(flat), Err(GeometryError::SingularTransform)));
    }

    #[test]
    fn test_hits_lie_in_bounding_box() {
        let mut rng = StdRng::seed_from_u64(11);
        let solids = sample_solids();
        for _ in 0..300 {
            let ray = random_ray(&mut rng);
            for solid in &solids {
                let bbox = solid.bounding_box();
                if let Some(hit) = solid.intersect(&ray, Interval::from_min(1e-4)) {
                    assert!(bbox.contains_point(hit.position, 1e-3), "{bbox:?} misses {:?}", hit.position);
                }
            }
        }
    }

    #[test]
    fn test_dodecahedron_inradius() {
        let solid = Solid::dodecahedron(MaterialId::default());
        // Along a face normal the surface is at distance 1.
        let n = Vec3::new(0.0, 1.0, PHI).normalize();
        let ray = Ray::new(n * 5.0, -n, 0.0);
        let hit = solid.intersect(&ray, Interval::from_min(1e-4)).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-4);
        assert!((hit.normal - n).length() < 1e-4);
    }
}
