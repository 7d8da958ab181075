use anyhow::{Context, Result};
use glam::Vec2;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use ventura_engine::core::{App, AppControl, FrameCtx};
use ventura_engine::device::GpuInit;
use ventura_engine::logging::{init_logging, LoggingConfig};
use ventura_engine::paint::Color;
use ventura_engine::render::{
    Camera2d, ColorVertex, SceneRenderer, SpriteRenderer, SpriteShading, SpriteTexture,
};
use ventura_engine::scene::{DrawList, ZIndex};
use ventura_engine::window::{Runtime, RuntimeConfig};
use ventura_engine::Transform;

const CLEAR: Color = Color::new(0.01, 0.01, 0.01, 1.0);

/// Radians per second.
const SPIN_SPEED: f32 = 1.5;

const SPRITE_POSITIONS: [Vec2; 3] = [
    Vec2::new(20.0, 20.0),
    Vec2::new(100.0, 20.0),
    Vec2::new(300.0, 20.0),
];

struct Demo {
    camera: Camera2d,
    draw_list: DrawList,
    scene: SceneRenderer,
    spin: f32,
}

impl Demo {
    fn new(sprites: SpriteRenderer) -> Self {
        Self {
            camera: Camera2d::default(),
            draw_list: DrawList::new(),
            scene: SceneRenderer::new(sprites),
            spin: 0.0,
        }
    }

    fn advance(&mut self, dt: f32) {
        self.spin = (self.spin + SPIN_SPEED * dt) % std::f32::consts::TAU;
    }

    fn build_scene(&mut self) {
        let dl = &mut self.draw_list;
        dl.clear();

        dl.push_triangle(
            ZIndex(0),
            [
                ColorVertex::new(Vec2::new(-200.0, -150.0), Color::RED),
                ColorVertex::new(Vec2::new(-40.0, -150.0), Color::GREEN),
                ColorVertex::new(Vec2::new(-120.0, -30.0), Color::BLUE),
            ],
        );
        dl.push_solid_rect(
            ZIndex(0),
            Vec2::new(160.0, -120.0),
            Vec2::new(120.0, 60.0),
            Color::rgb(0.2, 0.4, 0.8),
        );

        for (i, pos) in SPRITE_POSITIONS.iter().enumerate() {
            let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
            dl.push_sprite(
                ZIndex(1),
                Transform::from_translation(pos.x, pos.y).with_rotation(self.spin * dir),
            );
        }
    }
}

impl App for Demo {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.advance(ctx.time.dt);
        self.build_scene();

        if ctx.time.frame_index % 600 == 0 {
            log::debug!("frame {} dt {:.4}s", ctx.time.frame_index, ctx.time.dt);
        }

        let camera = self.camera;
        let dl = &mut self.draw_list;
        let scene = &mut self.scene;

        ctx.render(CLEAR, &camera, |rctx, target| scene.render(rctx, target, dl))
    }
}

/// `ventura-demo [image]`: with an image path, sprites sample it instead of the red placeholder.
fn sprite_renderer(image: Option<String>) -> Result<SpriteRenderer> {
    let Some(path) = image else {
        return Ok(SpriteRenderer::new());
    };

    let bytes =
        std::fs::read(&path).with_context(|| format!("failed to read sprite image {path}"))?;
    log::info!("texturing sprites with {path}");

    Ok(SpriteRenderer::new()
        .with_shading(SpriteShading::Textured)
        .with_texture(SpriteTexture::Encoded(bytes)))
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let sprites = sprite_renderer(std::env::args().nth(1))?;

    let config = RuntimeConfig {
        title: "ventura".to_string(),
        initial_size: LogicalSize::new(800.0, 600.0),
    };

    Runtime::run(config, GpuInit::default(), Demo::new(sprites))
}
