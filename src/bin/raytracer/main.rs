//! Raytracer CLI - Render a JSON scene with the CPU backend or pack it for the GPU.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use raytracer::backend::gpu::build_gpu_data;
use raytracer::prelude::*;

/// Command-line overrides on top of the settings file.
#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    backend: Option<Backend>,
    width: Option<u32>,
    height: Option<u32>,
    adjust_aspect: Option<f32>,
    disable_bounding_boxes: bool,
    seed: Option<u64>,
    help: bool,
}

impl CliArgs {
    fn parse(args: &[&str]) -> anyhow::Result<Self> {
        let mut cli = CliArgs::default();
        let mut iter = args.iter().copied();

        while let Some(arg) = iter.next() {
            let mut value = |flag: &str| {
                iter.next()
                    .with_context(|| format!("missing value for {flag}"))
            };
            match arg {
                "-c" | "--config" => cli.config = Some(PathBuf::from(value(arg)?)),
                "-i" | "--input" => cli.input = Some(PathBuf::from(value(arg)?)),
                "-o" | "--output" => cli.output = Some(PathBuf::from(value(arg)?)),
                "-m" | "--mode" => cli.backend = Some(value(arg)?.parse()?),
                "-w" | "--width" => cli.width = Some(parse_number(arg, value(arg)?)?),
                "-h" | "--height" => cli.height = Some(parse_number(arg, value(arg)?)?),
                "-a" | "--adjust-aspect" => cli.adjust_aspect = Some(parse_number(arg, value(arg)?)?),
                "-s" | "--seed" => cli.seed = Some(parse_number(arg, value(arg)?)?),
                "-b" | "--disable-bounding-boxes" => cli.disable_bounding_boxes = true,
                "--help" | "help" => cli.help = true,
                other if !other.starts_with('-') && cli.input.is_none() => {
                    cli.input = Some(PathBuf::from(other));
                }
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(cli)
    }

    fn apply(self, settings: &mut RenderSettings) {
        if let Some(input) = self.input {
            settings.input = Some(input);
        }
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(backend) = self.backend {
            settings.backend = backend;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(adjust_aspect) = self.adjust_aspect {
            settings.adjust_aspect = adjust_aspect;
        }
        if self.disable_bounding_boxes {
            settings.disable_bounding_boxes = true;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value for {flag}: {value}"))
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = None;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = Some("debug"),
            "-vv" | "--trace" => level = Some("trace"),
            "-q" | "--quiet" => level = Some("warn"),
            _ => filtered_args.push(arg),
        }
    }
    init_tracing(level);

    if filtered_args.is_empty() {
        print_help();
        return Ok(());
    }

    let cli = CliArgs::parse(&filtered_args)?;
    if cli.help {
        print_help();
        return Ok(());
    }

    let mut settings = match &cli.config {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?,
        None => RenderSettings::default(),
    };
    cli.apply(&mut settings);
    settings.validate()?;

    let input = settings.input.clone().context("no input scene given")?;
    let graph = NodeGraph::load(&input)
        .with_context(|| format!("failed to load scene {}", input.display()))?;
    tracing::info!(path = %input.display(), nodes = graph.len(), "scene graph loaded");

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    match settings.backend {
        Backend::Cpu => run_cpu(&graph, &settings, &mut rng),
        Backend::Gpu => run_gpu(&graph, &mut rng),
    }
}

fn run_cpu(graph: &NodeGraph, settings: &RenderSettings, rng: &mut StdRng) -> anyhow::Result<()> {
    let scene = CpuScene::from_graph::<cpu::SceneTraits, _>(graph, rng)?;
    let image = cpu::render(&scene, settings)?;
    save(&image, &settings.output)
}

fn save(image: &image::RgbImage, path: &Path) -> anyhow::Result<()> {
    cpu::save_png(image, path).with_context(|| format!("failed to write {}", path.display()))
}

fn run_gpu(graph: &NodeGraph, rng: &mut StdRng) -> anyhow::Result<()> {
    let scene = GpuScene::from_graph::<gpu::SceneTraits, _>(graph, rng)?;
    let data = build_gpu_data(&scene);

    tracing::info!(
        cameras = data.cameras_bytes().len(),
        lights = data.lights_bytes().len(),
        objects = data.objects_bytes().len(),
        triangles = data.triangles_bytes().len(),
        total = data.total_bytes(),
        "gpu buffers ready (bytes)"
    );
    Ok(())
}

fn print_help() {
    println!("raytracer - Offline ray tracer");
    println!();
    println!("USAGE:");
    println!("    raytracer [OPTIONS] <scene.json>");
    println!();
    println!("OPTIONS:");
    println!("    -i, --input <file>               Scene description (JSON)");
    println!("    -o, --output <file>              Output image (PNG, default render.png)");
    println!("    -m, --mode <cpu|gpu>             Backend (default cpu)");
    println!("    -w, --width <px>                 Image width (default 640)");
    println!("    -h, --height <px>                Image height (default 480)");
    println!("    -a, --adjust-aspect <factor>     Multiply the camera aspect ratio");
    println!("    -b, --disable-bounding-boxes     Intersect every triangle");
    println!("    -s, --seed <n>                   Seed for object colors");
    println!("    -c, --config <file>              Load settings from JSON first");
    println!("    -v, --verbose                    Debug output");
    println!("    -vv, --trace                     Trace output");
    println!("    -q, --quiet                      Warnings only");
    println!("        --help                       Show this help");
}
