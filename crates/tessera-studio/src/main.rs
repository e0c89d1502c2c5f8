use anyhow::{bail, Context, Result};
use tessera_engine::batch::{
    BatchKind, GlyphItem, Glyphs, LineItem, Lines, ShapeItem, Shapes, TextureItem, Textures,
};
use tessera_engine::coords::{CornerRadii, Rect, Vec2};
use tessera_engine::gpu::{GraphicsInvoker, GpuInit, RecordingInvoker, WgpuInvoker};
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::paint::{Color, Gradient};
use tessera_engine::{BatchConfig, RenderHub};

const WIDTH: u32 = 820;
const HEIGHT: u32 = 560;

struct Options {
    dry_run: bool,
    frames: u32,
    trace_uploads: bool,
}

impl Options {
    fn parse() -> Result<Self> {
        let mut opts = Options { dry_run: false, frames: 3, trace_uploads: false };
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--dry-run" => opts.dry_run = true,
                "--trace-uploads" => opts.trace_uploads = true,
                "--frames" => {
                    let n = args.next().context("--frames needs a value")?;
                    opts.frames = n.parse().with_context(|| format!("invalid frame count: {n}"))?;
                }
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(opts)
    }
}

fn main() -> Result<()> {
    let opts = Options::parse()?;
    init_logging(LoggingConfig { trace_uploads: opts.trace_uploads, ..Default::default() });

    let config = BatchConfig::uniform(64).with(BatchKind::Glyph, 256);

    if opts.dry_run {
        log::info!("dry run: recording GPU calls in memory");
        let hub = run(RecordingInvoker::new(), config, opts.frames)?;
        let gl = hub.invoker();
        log::info!(
            "{} calls recorded, {} live GPU objects, {} debug groups left open",
            gl.calls().len(),
            gl.live_objects(),
            gl.open_debug_groups()
        );
    } else {
        let gl = WgpuInvoker::headless(&GpuInit::default())?;
        run(gl, config, opts.frames)?;
    }
    Ok(())
}

fn run<G: GraphicsInvoker>(gl: G, config: BatchConfig, frames: u32) -> Result<RenderHub<G>> {
    let mut hub = RenderHub::new(gl, config);
    hub.set_clear_color(Color::from_rgba8(12, 14, 22, 255));
    hub.resize_viewport(WIDTH, HEIGHT)?;
    hub.context_ready()?;

    for kind in BatchKind::ALL {
        log::info!("{kind} batch holds {} items", hub.buffers().batch_size(kind));
    }

    for frame in 0..frames {
        hub.begin()?;
        hub.clear()?;
        let uploaded = draw_scene(&mut hub, frame)?;
        hub.end()?;
        log::info!("frame {frame}: {uploaded} items uploaded");
    }

    hub.dispose();
    Ok(hub)
}

/// Uploads a small dashboard: panels, a sparkline, an icon and a caption.
fn draw_scene<G: GraphicsInvoker>(hub: &mut RenderHub<G>, frame: u32) -> Result<u32> {
    let mut count = 0;
    let t = frame as f32;

    hub.prepare::<Shapes>()?;
    let panel_fill = Color::from_rgba8(30, 34, 48, 255);
    let panel = ShapeItem::solid(Vec2::new(410.0, 60.0), Vec2::new(780.0, 80.0), panel_fill)
        .with_corner_radius(CornerRadii::all(12.0));
    let gauge = ShapeItem::solid(Vec2::new(200.0, 300.0), Vec2::new(300.0, 40.0), Color::WHITE)
        .with_gradient(
            Gradient::Horizontal,
            Color::from_rgba8(40, 200, 120, 255),
            Color::from_rgba8(220, 60, 60, 255),
        );
    let frame_box = ShapeItem::solid(Vec2::new(600.0, 300.0), Vec2::new(260.0, 260.0), Color::WHITE)
        .with_border(2.0);
    for (i, shape) in [panel, gauge, frame_box].iter().enumerate() {
        hub.upload::<Shapes>(shape, i as u32)?;
        count += 1;
    }

    hub.prepare::<Lines>()?;
    let points: Vec<Vec2> = (0..16)
        .map(|i| {
            let x = 480.0 + i as f32 * 15.0;
            Vec2::new(x, 300.0 + ((i as f32 + t) * 0.7).sin() * 80.0)
        })
        .collect();
    let spark_color = Color::from_rgba8(90, 160, 255, 255);
    for (i, pair) in points.windows(2).enumerate() {
        let segment = LineItem::new(pair[0], pair[1], spark_color, 2.0);
        hub.upload::<Lines>(&segment, i as u32)?;
        count += 1;
    }

    hub.prepare::<Textures>()?;
    let icon = TextureItem {
        angle: t * 15.0,
        ..TextureItem::new(1, Vec2::new(48.0, 48.0), Vec2::new(60.0, 60.0))
    };
    hub.upload::<Textures>(&icon, 0)?;
    count += 1;

    hub.prepare::<Glyphs>()?;
    let caption = "TESSERA";
    for (i, ch) in caption.chars().enumerate() {
        let cell = (ch as u32 - ' ' as u32) as f32;
        let glyph = GlyphItem {
            glyph: ch,
            texture_id: 2,
            atlas_size: Vec2::new(512.0, 512.0),
            glyph_bounds: Rect::new((cell % 32.0) * 16.0, (cell / 32.0).floor() * 16.0, 16.0, 16.0),
            position: Vec2::new(120.0 + i as f32 * 18.0, 60.0),
            scale: 1.0,
            angle: 0.0,
            tint: Color::WHITE,
        };
        hub.upload::<Glyphs>(&glyph, i as u32)?;
        count += 1;
    }

    Ok(count)
}
