use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use carver::bench::{clip_to_view_volume, Polygon, Renderer};
use carver::clipping::{ClipPlaneRenderer, Plane};
use carver::math::{Mat4, Vec3, Vec4};
use carver::tools::{ToolCapabilities, ToolEvent, ToolId, ToolLifecycleManager};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn triangle() -> Polygon<Vec3> {
    Polygon::from_triangle(
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    )
}

/// `count` planes through the origin, fanned around the Z axis.
fn planes(count: usize) -> Vec<Plane> {
    (0..count)
        .map(|i| {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            Plane::new(Vec3::new(angle.cos(), angle.sin(), 0.0), -0.5)
        })
        .collect()
}

/// Tool pose whose local up axis and origin reproduce `plane`.
fn pose_for(plane: &Plane) -> Mat4 {
    let angle = plane.normal.y.atan2(plane.normal.x);
    Mat4::translation(plane.normal * plane.offset)
        * Mat4::rotation_z(angle - std::f32::consts::FRAC_PI_2)
}

/// A manager with `active` held locators out of `capacity` slots.
fn manager(capacity: usize, active: usize) -> ToolLifecycleManager {
    let mut manager = ToolLifecycleManager::new(capacity);
    for (i, plane) in planes(active).iter().enumerate() {
        let tool = ToolId(i as u32);
        manager.handle(ToolEvent::Created {
            tool,
            capabilities: ToolCapabilities::LOCATOR,
        });
        manager.handle(ToolEvent::ButtonPress { tool });
        manager.handle(ToolEvent::Motion {
            tool,
            transform: pose_for(plane),
        });
    }
    manager
}

fn benchmark_user_planes(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip_against_user_planes");

    for count in [1, 3, 6] {
        let planes = planes(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &planes, |b, planes| {
            b.iter(|| {
                black_box(triangle().clip_all(
                    planes
                        .iter()
                        .map(|plane| move |p: &Vec3| plane.signed_distance(*p)),
                ))
            })
        });
    }

    group.finish();
}

fn benchmark_view_volume(c: &mut Criterion) {
    let straddling = Polygon::from_triangle(
        Vec4::new(-2.0, -0.5, 0.0, 1.0),
        Vec4::new(2.0, -0.5, 0.0, 1.0),
        Vec4::new(0.0, 2.0, 0.0, 1.0),
    );

    c.bench_function("clip_to_view_volume", |b| {
        b.iter(|| black_box(clip_to_view_volume(straddling.clone())))
    });
}

fn benchmark_clip_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("clip_unit_mapping");

    for active in [0, 6, 32] {
        let manager = manager(32, active);
        let mut renderer = Renderer::new(BUFFER_WIDTH, BUFFER_HEIGHT, 6);
        let mut clip_renderer = ClipPlaneRenderer::new();

        group.bench_function(BenchmarkId::from_parameter(active), |b| {
            b.iter(|| {
                black_box(clip_renderer.draw(manager.pool(), &mut renderer, |_| {}));
            })
        });
    }

    group.finish();
}

fn benchmark_clipped_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("draw_clipped_triangle");
    let vertices = [
        Vec3::new(-0.9, -0.9, 0.0),
        Vec3::new(0.9, -0.9, 0.0),
        Vec3::new(0.0, 0.9, 0.0),
    ];

    for active in [0, 3, 6] {
        let manager = manager(6, active);
        let mut renderer = Renderer::new(BUFFER_WIDTH, BUFFER_HEIGHT, 6);
        let mut clip_renderer = ClipPlaneRenderer::new();

        group.bench_function(BenchmarkId::from_parameter(active), |b| {
            b.iter(|| {
                renderer.clear_depth();
                clip_renderer.draw(manager.pool(), &mut renderer, |renderer| {
                    renderer.draw_triangle(black_box(vertices), Some(0xFFFF0000), None);
                })
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_user_planes,
    benchmark_view_volume,
    benchmark_clip_mapping,
    benchmark_clipped_triangle
);
criterion_main!(benches);
