use voxel_painter::engine_state::camera_state::camera::{Camera, Projection};
use voxel_painter::engine_state::math::{Mat4, Vec3};
use voxel_painter::engine_state::rendering::pipeline::clip::{clip_against_plane, ClipResult, Plane};
use voxel_painter::engine_state::rendering::{GeometryPipeline, Surface, Triangle, Viewport};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

fn pipeline() -> GeometryPipeline {
    let viewport = Viewport::new(WIDTH, HEIGHT);
    GeometryPipeline::new(
        Mat4::perspective(90.0, viewport.aspect(), 0.1, 1000.0),
        viewport,
        0.1,
    )
}

fn random_point(rng: &mut fastrand::Rng, range: f32) -> Vec3 {
    let mut coord = || (rng.f32() * 2.0 - 1.0) * range;
    Vec3::new(coord(), coord(), coord())
}

fn textured(points: [Vec3; 3]) -> Triangle {
    Triangle::new(
        points,
        Surface::Textured {
            uvs: [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            brightness: 0.8,
        },
    )
}

/// Every vertex the clipper emits lies in the kept half-space, and the number of
/// output triangles follows the number of vertices that were inside.
#[test]
fn clipping_keeps_only_the_inside() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    for _ in 0..500 {
        let plane = Plane::new(random_point(&mut rng, 2.0), random_point(&mut rng, 1.0));
        let tri = textured([
            random_point(&mut rng, 10.0),
            random_point(&mut rng, 10.0),
            random_point(&mut rng, 10.0),
        ]);
        let inside = tri
            .points
            .iter()
            .filter(|p| plane.signed_distance(**p) >= 0.0)
            .count();

        let result = clip_against_plane(&plane, &tri);
        let expected = match inside {
            0 => 0,
            1 | 3 => 1,
            _ => 2,
        };
        assert_eq!(result.len(), expected);

        for piece in result {
            for p in piece.points {
                assert!(plane.signed_distance(p) >= -1e-3, "{p:?} outside {plane:?}");
            }
            for uv in piece.surface.uvs() {
                assert!(uv.iter().all(|c| (-1e-4..=1.0 + 1e-4).contains(c)));
            }
        }
    }
}

#[test]
fn fully_inside_is_unchanged_and_fully_outside_is_discarded() {
    let plane = Plane::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
    let front = textured([
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(1.0, 0.0, 2.0),
        Vec3::new(0.0, 1.0, 3.0),
    ]);
    assert_eq!(clip_against_plane(&plane, &front), ClipResult::One(front));

    let behind = textured(front.points.map(|p| Vec3::new(p.x, p.y, -p.z)));
    assert_eq!(clip_against_plane(&plane, &behind), ClipResult::Discarded);
}

/// Of a triangle and its mirror winding, exactly one faces the camera.
#[test]
fn exactly_one_winding_survives_culling() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut pipeline = pipeline();
    for _ in 0..200 {
        let points = [0; 3].map(|_| {
            let p = random_point(&mut rng, 3.0);
            Vec3::new(p.x, p.y, p.z + 6.0)
        });
        let tri = Triangle::flat(points, [1.0; 3]);
        let mut reversed = tri;
        reversed.points.swap(1, 2);

        pipeline.render(&[tri, reversed], Vec3::ZERO, &Mat4::identity());
        assert_eq!(pipeline.stats().culled, 1);
    }
}

/// Moving the camera across a triangle's plane flips whether it is culled.
#[test]
fn culling_follows_the_camera_side() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut pipeline = pipeline();
    for _ in 0..100 {
        let tri = Triangle::flat([0; 3].map(|_| random_point(&mut rng, 3.0)), [1.0; 3]);
        let Some(normal) = tri.normal().try_normalize() else {
            continue;
        };
        let p0 = tri.points[0];

        pipeline.render(&[tri], p0 + normal * 5.0, &Mat4::identity());
        assert_eq!(pipeline.stats().culled, 0);
        pipeline.render(&[tri], p0 - normal * 5.0, &Mat4::identity());
        assert_eq!(pipeline.stats().culled, 1);
    }
}

/// Area of the part of a triangle in the `z = 0` plane that lies inside `plane`,
/// found by cutting its outline edge by edge and applying the shoelace formula.
fn inside_area(points: &[Vec3; 3], plane: &Plane) -> f32 {
    let mut outline = Vec::with_capacity(4);
    for i in 0..3 {
        let (p, q) = (points[i], points[(i + 1) % 3]);
        let (dp, dq) = (plane.signed_distance(p), plane.signed_distance(q));
        if dp >= 0.0 {
            outline.push(p);
        }
        if (dp >= 0.0) != (dq >= 0.0) {
            outline.push(p.lerp(q, dp / (dp - dq)));
        }
    }
    let twice: f32 = (0..outline.len())
        .map(|i| {
            let (a, b) = (outline[i], outline[(i + 1) % outline.len()]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() * 0.5
}

/// The pieces of a clipped triangle cover exactly its inside part.
#[test]
fn clipping_conserves_the_inside_area() {
    let mut rng = fastrand::Rng::with_seed(0xa7ea);
    let flat = |p: Vec3| Vec3::new(p.x, p.y, 0.0);
    for _ in 0..1000 {
        let direction = flat(random_point(&mut rng, 1.0));
        if direction.length() < 1e-2 {
            continue;
        }
        let plane = Plane::new(flat(random_point(&mut rng, 2.0)), direction);
        let points = [0; 3].map(|_| flat(random_point(&mut rng, 10.0)));

        let expected = inside_area(&points, &plane);
        let clipped: f32 = clip_against_plane(&plane, &textured(points))
            .into_iter()
            .map(|piece| piece.screen_area())
            .sum();
        assert!(
            (clipped - expected).abs() <= 1e-3 * expected.max(1.0),
            "clipped area {clipped}, inside area {expected}"
        );
    }
}

#[test]
fn far_triangles_are_drawn_first() {
    let mut pipeline = pipeline();
    let small = |x: f32, depth: f32, color: [f32; 3]| {
        Triangle::flat(
            [
                Vec3::new(x - 0.2, -0.2, depth),
                Vec3::new(x, 0.2, depth),
                Vec3::new(x + 0.2, -0.2, depth),
            ],
            color,
        )
    };
    let near = small(-0.5, 3.0, [1.0, 0.0, 0.0]);
    let middle = small(0.0, 6.0, [0.0, 1.0, 0.0]);
    let far = small(0.5, 12.0, [0.0, 0.0, 1.0]);

    let list = pipeline.render(&[near, far, middle], Vec3::ZERO, &Mat4::identity());
    assert_eq!(
        list.colors,
        vec![[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]]
    );
}

#[test]
fn look_target_lands_in_the_screen_center() {
    let camera = Camera::new(Vec3::new(12.0, 40.0, -7.0), cgmath::Rad(0.9), cgmath::Rad(0.4));
    let projection = Projection::new(WIDTH, HEIGHT, 70.0, 0.1, 500.0);
    let mut pipeline = GeometryPipeline::new(
        projection.calc_matrix(),
        Viewport::new(WIDTH, HEIGHT),
        projection.znear(),
    );

    // A view-space triangle with one corner on the view axis, placed in the world.
    let target = camera.position + camera.look_direction() * 10.0;
    let to_world = Mat4::look_at(camera.position, target, Vec3::UP);
    let tri = Triangle::flat(
        [
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(-1.0, 1.0, 10.0),
            Vec3::new(1.0, 1.0, 10.0),
        ]
        .map(|p| to_world.transform(p)),
        [1.0; 3],
    );

    let list = pipeline.render(&[tri], camera.position, &camera.view_matrix());
    assert_eq!(list.triangle_count(), 1);
    let corners = list.triangle(0).expect("one triangle");
    assert!(corners
        .iter()
        .any(|[x, y]| x.abs() < 1e-3 && y.abs() < 1e-3));
}

#[test]
fn empty_input_is_a_no_op() {
    let mut pipeline = pipeline();
    let list = pipeline.render(&[], Vec3::ZERO, &Mat4::identity());
    assert!(list.is_empty());
    assert!(list.positions.is_empty());
    assert_eq!(pipeline.stats(), Default::default());
}
