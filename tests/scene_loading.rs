//! Integration tests for loading scene graphs into both backends.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use raytracer::backend::gpu::build_gpu_data;
use raytracer::prelude::*;
use raytracer::scene::{vertex_normal, vertex_uv};
use raytracer::util::Vec3;
use scene_graph::{Attribute, Mesh, Node, NodeId, SceneDescription};

const BOXES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/scenes/boxes.json");

fn load_graph() -> NodeGraph {
    NodeGraph::load(BOXES_PATH).expect("Failed to load boxes.json")
}

#[test]
fn test_boxes_cpu() {
    let graph = load_graph();
    let scene = CpuScene::from_graph::<cpu::SceneTraits, _>(&graph, &mut StdRng::seed_from_u64(1)).unwrap();
    let stats = scene.stats();
    println!("{stats}");

    assert_eq!(stats.cameras, 1);
    assert_eq!(stats.lights, 1);
    assert_eq!(stats.objects, 3);
    // Floor quad, six cube faces, wedge with three quads and two triangles
    assert_eq!(stats.triangles, 2 + 12 + 8);

    let floor = &scene.objects[0];
    assert_eq!(floor.bounding_box.min, Vec3::new(-6.0, 0.0, -6.0));
    assert_eq!(floor.bounding_box.max, Vec3::new(6.0, 0.0, 6.0));

    let light = scene.lights[0].params();
    assert!((light.position - Vec3::new(2.0, 6.0, 3.0)).length() < 1e-5);
    assert_eq!(light.subdivs, 10);

    let camera = scene.cameras[0].params();
    assert_eq!(camera.origin, Vec3::new(0.0, 3.0, 9.0));
    assert!((camera.horizontal_fov - 50f32.to_radians()).abs() < 1e-6);
}

#[test]
fn test_backends_agree() {
    let graph = load_graph();
    let cpu_scene = CpuScene::from_graph::<cpu::SceneTraits, _>(&graph, &mut StdRng::seed_from_u64(9)).unwrap();
    let gpu_scene = GpuScene::from_graph::<gpu::SceneTraits, _>(&graph, &mut StdRng::seed_from_u64(9)).unwrap();

    assert_eq!(cpu_scene.objects.len(), gpu_scene.objects.len());
    for (c, g) in cpu_scene.objects.iter().zip(&gpu_scene.objects) {
        assert_eq!(c.triangle_count(), g.triangle_count());
        assert_eq!(SceneObject::bounding_box(c), g.bounding_box());

        // Same seed, same draw order: same colors.
        let rgb = c.color.to_vec3();
        assert_eq!(g.color, [rgb.x, rgb.y, rgb.z, 1.0]);
    }

    assert_eq!(cpu_scene.cameras[0].params(), gpu_scene.cameras[0].params());
    assert_eq!(cpu_scene.lights[0].params(), gpu_scene.lights[0].params());

    let mut cpu_stats = cpu_scene.stats();
    let gpu_stats = gpu_scene.stats();
    cpu_stats.backend = gpu_stats.backend;
    assert_eq!(cpu_stats, gpu_stats);
}

#[test]
fn test_pack_boxes() {
    let graph = load_graph();
    let scene = GpuScene::from_graph::<gpu::SceneTraits, _>(&graph, &mut StdRng::seed_from_u64(0)).unwrap();
    let data = build_gpu_data(&scene);

    assert_eq!(data.header.triangle_count, 22);
    assert_eq!(data.objects.last().unwrap().first_triangle, 14);
    assert_eq!(data.triangles_bytes().len(), 22 * 48);
}

#[test]
fn test_cube_normals() {
    let graph = load_graph();
    let cube = graph.find("cube").expect("cube node");
    let mesh = cube.mesh().expect("cube mesh");

    // Polygon 3 is the top face.
    for vertex in 0..4 {
        assert_eq!(vertex_normal(mesh, 3, vertex).unwrap(), Some(Vec3::Y));
    }
    assert_eq!(vertex_uv(mesh, 0, 0).unwrap(), None);
}

#[test]
fn test_unknown_parent_fails() {
    let json = r#"{ "nodes": [ { "name": "orphan", "parent": "nobody" } ] }"#;
    let result = SceneDescription::from_json(json).and_then(|d| d.to_graph());
    assert!(matches!(result, Err(scene_graph::Error::UnknownParent { .. })));
}

#[test]
fn test_missing_file() {
    let err = NodeGraph::load("does/not/exist.json").unwrap_err();
    let err: Error = err.into();
    assert!(err.to_string().contains("exist.json"));
}

#[test]
fn test_top_down_camera_loads() {
    let json = r#"{ "nodes": [
        { "name": "top", "attribute": { "type": "camera", "position": [0, 10, 0], "target": [0, 0, 0] } },
        { "name": "tri", "attribute": { "type": "mesh",
          "points": [[0, 0, 0], [1, 0, 0], [0, 0, 1]], "polygons": [[0, 1, 2]] } }
    ] }"#;
    let graph = SceneDescription::from_json(json).unwrap().to_graph().unwrap();
    let scene = CpuScene::from_graph::<cpu::SceneTraits, _>(&graph, &mut StdRng::seed_from_u64(0)).unwrap();

    assert_eq!(scene.objects.len(), 1);
    let camera = scene.cameras[0].params();
    assert_eq!(camera.direction, Vec3::NEG_Y);
    assert!(camera.up.dot(camera.direction).abs() < 1e-6);
}

#[test]
fn test_zero_aspect_camera_fails() {
    let json = r#"{ "nodes": [
        { "name": "cam", "attribute": { "type": "camera", "position": [0, 0, 5], "target": [0, 0, 0], "aspect": 0 } }
    ] }"#;
    let graph = SceneDescription::from_json(json).unwrap().to_graph().unwrap();
    let result = CpuScene::from_graph::<cpu::SceneTraits, _>(&graph, &mut StdRng::seed_from_u64(0));
    assert!(matches!(result, Err(Error::InvalidCamera { .. })));
}

fn point() -> impl Strategy<Value = Vec3> {
    (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn mesh_strategy() -> impl Strategy<Value = Mesh> {
    prop::collection::vec(point(), 3..24).prop_flat_map(|points| {
        let n = points.len() as u32;
        prop::collection::vec(prop::collection::vec(0..n, 3..6), 0..16)
            .prop_map(move |polygons| Mesh::new(points.clone(), &polygons))
    })
}

proptest! {
    #[test]
    fn object_bounds_contain_every_vertex(
        mesh in mesh_strategy(),
        translation in point(),
        rotation in point(),
        scale in 0.1f32..4.0
    ) {
        let mut graph = NodeGraph::new();
        let group = graph.add(NodeId::ROOT, Node::new("group").with_rotation(rotation));
        graph.add(
            group,
            Node::new("mesh")
                .with_translation(translation)
                .with_scaling(Vec3::splat(scale))
                .with_attribute(Attribute::Mesh(mesh)),
        );

        let scene = CpuScene::from_graph::<cpu::SceneTraits, _>(&graph, &mut StdRng::seed_from_u64(0)).unwrap();
        let object = &scene.objects[0];
        for triangle in &object.triangles {
            for v in triangle.vertices() {
                prop_assert!(object.bounding_box.contains(v));
            }
        }
    }
}
