//! Render one of the built-in demo scenes to a PNG.
//!
//! Usage: `cargo run --release --example render_scene -- <scene> [output.png]`
//! where `<scene>` is one of `csg`, `glass`, `fog` or `mesh`.

use anyhow::{bail, Context, Result};
use lumen_renderer::{
    render, AreaLight, AreaLightMaterial, BoxFilterFilm, CancelToken, Dielectric, Diffuse,
    Geometry, IntegratorKind, Mat4, MediumSettings, Materials, Mirror, PinholeCamera, Plane,
    PointLight, PointLightMaterial, Rectangle, RenderConfig, SamplerKind, Scene, ShapeId, Solid,
    Spectrum, Sphere, TileOrder, Vec3,
};
use std::str::FromStr;

const WIDTH: u32 = 512;
const HEIGHT: u32 = 384;

#[derive(Debug, Clone, Copy)]
enum DemoScene {
    /// Boolean solids on a floor
    Csg,
    /// Glass and mirror balls
    Glass,
    /// CSG solids in noisy fog
    Fog,
    /// Instanced triangle mesh under an area light
    Mesh,
}

impl FromStr for DemoScene {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "csg" => DemoScene::Csg,
            "glass" => DemoScene::Glass,
            "fog" => DemoScene::Fog,
            "mesh" => DemoScene::Mesh,
            other => bail!("unknown scene '{other}', expected csg, glass, fog or mesh"),
        })
    }
}

fn camera() -> Box<PinholeCamera> {
    Box::new(PinholeCamera::new(WIDTH, HEIGHT).with_position(
        Vec3::new(0.0, 1.5, 6.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::Y,
    ))
}

/// Floor at y = -1 and a back wall at z = -4.
fn room(materials: &mut Materials, geometry: &mut Geometry) -> Vec<ShapeId> {
    let floor = materials.add(Diffuse::new(Spectrum::new(0.8, 0.8, 0.7)));
    let wall = materials.add(Diffuse::new(Spectrum::new(0.6, 0.6, 0.8)));
    vec![
        geometry.add(Plane::new(Vec3::Y, 1.0, floor)),
        geometry.add(Plane::new(Vec3::Z, 4.0, wall)),
    ]
}

/// Cone, rounded cube, cut cylinder and a dodecahedron.
fn csg_solids(materials: &mut Materials, geometry: &mut Geometry) -> Result<Vec<ShapeId>> {
    let red = materials.add(Diffuse::new(Spectrum::new(0.8, 0.2, 0.2)));
    let green = materials.add(Diffuse::new(Spectrum::new(0.2, 0.8, 0.3)));
    let blue = materials.add(Diffuse::new(Spectrum::new(0.2, 0.3, 0.8)));
    let gold = materials.add(Diffuse::new(Spectrum::new(0.9, 0.7, 0.2)));

    // The unit cone opens along z; stand it up.
    let cone = Solid::unit_cone(red).transformed(
        Mat4::from_translation(Vec3::new(-2.2, 0.0, 0.0))
            * Mat4::from_scale(Vec3::new(0.6, 1.0, 0.6))
            * Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2),
    )?;

    let rounded_cube = Solid::intersection(
        Solid::cube(0.7, green),
        Solid::Sphere(Sphere::new(Vec3::ZERO, 0.95, green)),
    )
    .transformed(
        Mat4::from_translation(Vec3::new(-0.7, -0.3, 0.5)) * Mat4::from_rotation_y(0.6),
    )?;

    let cut_cylinder = Solid::difference(
        Solid::capped_cylinder(0.6, 0.6, blue),
        Solid::Sphere(Sphere::new(Vec3::new(0.0, 0.0, 0.6), 0.45, blue)),
    )
    .transformed(
        Mat4::from_translation(Vec3::new(0.8, -0.4, 0.3)) * Mat4::from_rotation_x(-1.2),
    )?;

    let dodecahedron = Solid::dodecahedron(gold).transformed(
        Mat4::from_translation(Vec3::new(2.2, -0.3, -0.2)) * Mat4::from_scale(Vec3::splat(0.6)),
    )?;

    Ok([cone, rounded_cube, cut_cylinder, dodecahedron]
        .into_iter()
        .map(|solid| geometry.add(solid))
        .collect())
}

fn build_scene(which: DemoScene) -> Result<Scene> {
    let mut materials = Materials::new();
    let mut geometry = Geometry::new();
    let lamp = materials.add(PointLightMaterial::new(Spectrum::splat(30.0)));
    let lamp_position = Vec3::new(1.0, 4.0, 4.0);

    let walls = room(&mut materials, &mut geometry);
    let mut shapes = Vec::new();

    let integrator = match which {
        DemoScene::Csg => {
            shapes.extend(csg_solids(&mut materials, &mut geometry)?);
            IntegratorKind::default()
        }
        DemoScene::Glass => {
            let glass = materials.add(Dielectric::new(1.5));
            let mirror = materials.add(Mirror::new(Spectrum::splat(0.9)));
            let matte = materials.add(Diffuse::new(Spectrum::new(0.7, 0.3, 0.7)));
            for (center, radius, material) in [
                (Vec3::new(-1.5, 0.0, 0.5), 1.0, glass),
                (Vec3::new(0.5, 0.0, -0.5), 1.0, mirror),
                (Vec3::new(2.0, -0.4, 1.0), 0.6, matte),
            ] {
                let ball = Solid::Sphere(Sphere::new(center, radius, material));
                shapes.push(geometry.add(ball));
            }
            IntegratorKind::Whitted { max_depth: 8 }
        }
        DemoScene::Fog => {
            shapes.extend(csg_solids(&mut materials, &mut geometry)?);
            IntegratorKind::Volumetric(MediumSettings::default().with_volume_emission(0.02))
        }
        DemoScene::Mesh => {
            let clay = materials.add(Diffuse::new(Spectrum::new(0.7, 0.6, 0.5)));
            let tetrahedron = geometry.add_mesh(
                &[
                    Vec3::new(1.0, 1.0, 1.0),
                    Vec3::new(-1.0, -1.0, 1.0),
                    Vec3::new(-1.0, 1.0, -1.0),
                    Vec3::new(1.0, -1.0, -1.0),
                ],
                None,
                &[[0, 1, 3], [0, 2, 1], [0, 3, 2], [1, 2, 3]],
                clay,
            )?;
            for k in 0..5 {
                let x = -2.4 + 1.2 * k as f32;
                let transform = Mat4::from_translation(Vec3::new(x, -0.55, 0.0))
                    * Mat4::from_rotation_y(0.5 * k as f32)
                    * Mat4::from_scale(Vec3::splat(0.45));
                shapes.push(geometry.add_instance(tetrahedron, transform)?);
            }
            IntegratorKind::Direct
        }
    };

    let objects = geometry.add_bvh(&shapes)?;
    let root = geometry.add_aggregate(&[walls[0], walls[1], objects])?;
    let mut scene = Scene::new(geometry, root, materials, camera(), WIDTH, HEIGHT)
        .with_spp(4)
        .with_sampler(SamplerKind::Stratified)
        .with_integrator(integrator);

    scene = match which {
        DemoScene::Mesh => {
            let panel = scene.materials.add(AreaLightMaterial::new(Spectrum::splat(12.0)));
            let rect = Rectangle::new(
                Vec3::new(-1.0, 3.0, -1.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 2.0),
                panel,
            );
            let panel_shape = scene.geometry.add(rect);
            let old_root = scene.root;
            scene.root = scene.geometry.add_aggregate(&[old_root, panel_shape])?;
            scene.with_light(AreaLight::new(rect))
        }
        _ => scene.with_light(PointLight::new(lamp_position, lamp)),
    };
    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let which: DemoScene = args.next().as_deref().unwrap_or("csg").parse()?;
    let output = args.next().unwrap_or_else(|| "render.png".to_string());

    let scene = build_scene(which)?;
    let film = BoxFilterFilm::new(scene.width, scene.height);
    let config = RenderConfig::default().with_tile_order(TileOrder::Spiral);

    let stats = render(&scene, &film, &config, &CancelToken::new())?;
    log::info!(
        "{:?}: {} samples, {} rays in {:.2?}",
        which,
        stats.samples,
        stats.rays_traced,
        stats.elapsed
    );

    film.save_png(&output)
        .with_context(|| format!("failed to write {output}"))?;
    println!("Saved {output}");
    Ok(())
}
