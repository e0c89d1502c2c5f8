use std::cell::RefCell;
use std::rc::Rc;

use tessera_engine::batch::{
    BatchKind, GlyphItem, Glyphs, LineItem, Lines, ShapeItem, Shapes, TextureItem, Textures,
};
use tessera_engine::bus::Notification;
use tessera_engine::coords::{Rect, Vec2};
use tessera_engine::gpu::{BufferId, GlCall, RecordingInvoker};
use tessera_engine::paint::Color;
use tessera_engine::{BatchConfig, BatchError, RenderHub};

fn ready_hub(config: BatchConfig) -> RenderHub<RecordingInvoker> {
    let mut hub = RenderHub::new(RecordingInvoker::new(), config);
    hub.context_ready().unwrap();
    hub.resize_viewport(200, 100).unwrap();
    hub
}

fn floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

fn vbo(hub: &RenderHub<RecordingInvoker>, kind: BatchKind) -> BufferId {
    let buffers = hub.buffers();
    let handles = match kind {
        BatchKind::Shape => buffers.shape.handles(),
        BatchKind::Texture => buffers.texture.handles(),
        BatchKind::Line => buffers.line.handles(),
        BatchKind::Glyph => buffers.glyph.handles(),
    };
    handles.unwrap().vbo
}

#[test]
fn one_frame_of_every_primitive() {
    let mut hub = ready_hub(BatchConfig::uniform(8));

    hub.begin().unwrap();
    hub.clear().unwrap();

    let shape = ShapeItem::solid(Vec2::new(100.0, 50.0), Vec2::new(100.0, 50.0), Color::WHITE);
    let texture = TextureItem::new(1, Vec2::new(32.0, 32.0), Vec2::new(40.0, 40.0));
    let line = LineItem::new(Vec2::new(0.0, 0.0), Vec2::new(200.0, 100.0), Color::BLACK, 2.0);
    let glyph = GlyphItem {
        glyph: 'a',
        texture_id: 2,
        atlas_size: Vec2::new(256.0, 256.0),
        glyph_bounds: Rect::new(16.0, 0.0, 8.0, 12.0),
        position: Vec2::new(10.0, 10.0),
        scale: 1.0,
        angle: 0.0,
        tint: Color::WHITE,
    };

    hub.prepare::<Shapes>().unwrap();
    hub.upload::<Shapes>(&shape, 3).unwrap();
    hub.prepare::<Textures>().unwrap();
    hub.upload::<Textures>(&texture, 0).unwrap();
    hub.prepare::<Lines>().unwrap();
    hub.upload::<Lines>(&line, 7).unwrap();
    hub.prepare::<Glyphs>().unwrap();
    hub.upload::<Glyphs>(&glyph, 1).unwrap();

    hub.end().unwrap();

    // The GPU copy of every buffer matches its CPU mirror.
    let gl = hub.invoker();
    let pairs = [
        (BatchKind::Shape, hub.buffers().shape.generate_data()),
        (BatchKind::Texture, hub.buffers().texture.generate_data()),
        (BatchKind::Line, hub.buffers().line.generate_data()),
        (BatchKind::Glyph, hub.buffers().glyph.generate_data()),
    ];
    for (kind, mirror) in pairs {
        let stored = floats(gl.buffer_contents(vbo(&hub, kind)).unwrap());
        assert_eq!(stored, mirror, "{kind} buffer diverged");
    }

    // Shape slot 3 starts with the top-left corner: (50, 25) in a 200x100 viewport.
    let shape_data = hub.buffers().shape.generate_data();
    let slot = 3 * 4 * 16;
    assert_eq!(&shape_data[slot..slot + 2], &[-0.5, 0.5]);

    assert_eq!(gl.open_debug_groups(), 0);
    assert!(!hub.frame().in_frame());
}

#[test]
fn partial_uploads_touch_one_slot() {
    let mut hub = ready_hub(BatchConfig::uniform(4));
    let vbo = vbo(&hub, BatchKind::Line);
    hub.invoker_mut().clear_calls();

    let line = LineItem::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0), Color::WHITE, 1.0);
    hub.upload::<Lines>(&line, 2).unwrap();

    let writes: Vec<_> = hub
        .invoker()
        .calls()
        .iter()
        .filter_map(|c| match c {
            GlCall::BufferSubData { buffer, offset, len, .. } => Some((*buffer, *offset, *len)),
            _ => None,
        })
        .collect();
    // 4 vertices * 6 floats * 4 bytes per item.
    assert_eq!(writes, vec![(vbo, 2 * 96, 96)]);
}

#[test]
fn capacity_changes_reallocate_and_bound_uploads() {
    let mut hub = ready_hub(BatchConfig::default());
    assert_eq!(hub.buffers().batch_size(BatchKind::Line), BatchConfig::DEFAULT_CAPACITY);

    hub.set_batch_capacity(BatchKind::Line, 2).unwrap();
    assert_eq!(hub.buffers().batch_size(BatchKind::Line), 2);
    assert_eq!(hub.buffers().batch_size(BatchKind::Shape), BatchConfig::DEFAULT_CAPACITY);
    assert_eq!(hub.buffers().line.generate_indices(), vec![0, 1, 2, 2, 1, 3, 4, 5, 6, 6, 5, 7]);

    let stored = hub.invoker().buffer_contents(vbo(&hub, BatchKind::Line)).unwrap();
    assert_eq!(stored.len(), 2 * 96);

    let line = LineItem::new(Vec2::ZERO, Vec2::new(1.0, 1.0), Color::WHITE, 1.0);
    assert_eq!(
        hub.upload::<Lines>(&line, 2),
        Err(BatchError::BatchIndexOutOfRange { kind: BatchKind::Line, index: 2, capacity: 2 })
    );
}

#[test]
fn clear_color_set_early_is_applied_on_ready() {
    let mut hub = RenderHub::new(RecordingInvoker::new(), BatchConfig::uniform(1));
    let teal = Color::new(0.0, 0.5, 0.5, 1.0);
    hub.set_clear_color(teal);
    assert_eq!(hub.clear_color(), teal);
    assert!(hub.invoker().calls().is_empty());

    hub.context_ready().unwrap();

    let calls = hub.invoker().calls();
    let blend = calls.iter().position(|c| matches!(c, GlCall::EnableBlend(_))).unwrap();
    let clear = calls.iter().position(|c| *c == GlCall::SetClearColor(teal)).unwrap();
    assert!(blend < clear);
    assert_eq!(hub.clear_color(), teal);
}

#[test]
fn subscribers_observe_startup_in_order() {
    let mut hub = RenderHub::new(RecordingInvoker::new(), BatchConfig::uniform(5));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    hub.subscribe(move |n| sink.borrow_mut().push(*n));

    hub.context_ready().unwrap();
    hub.resize_viewport(10, 20).unwrap();

    let mut expected = vec![Notification::GraphicsContextReady];
    expected.extend(
        BatchKind::ALL.map(|kind| Notification::BatchCapacityChanged { kind, size: 5 }),
    );
    expected.push(Notification::ViewportResized { width: 10, height: 20 });
    assert_eq!(*seen.borrow(), expected);
}
