use std::error::Error;
use std::time::Duration;

use cgmath::{Vector2, Vector3, Vector4};
use engine::{ApplicationContext, EngineBuilder, EngineConfig, HeadlessPlatform, Scene};
use input::{Event, Key};
use log::{info, LevelFilter};
use renderer_2d::{Camera, Entity, EntityHandle, Renderer, ShaderSource, Spritesheet, Stage};

const VIEWPORT_WIDTH: f32 = 800.0;
const VIEWPORT_HEIGHT: f32 = 600.0;
const FRAME_COUNT: u64 = 300;

const GRID_SIZE: u32 = 50;
const CELL_SIZE: f32 = 10.0;

const SHEET_SIZE: u32 = 64;
const SPRITE_SIZE: u32 = 16;

const CAMERA_SPEED: f32 = 120.0;

fn main() -> Result<(), Box<dyn Error>> {
    // initialize logger
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    // hold D for a second, then W for a second
    let mut platform = HeadlessPlatform::new()
        .with_frame_limit(FRAME_COUNT)
        .with_event(60, Event::key_press(Key::D))
        .with_event(120, Event::key_release(Key::D))
        .with_event(120, Event::key_press(Key::W))
        .with_event(180, Event::key_release(Key::W));

    let mut engine = EngineBuilder::new()
        .with_config(Some(EngineConfig::default().with_fps_log_throttle_ms(500)))
        .build()?;

    engine.run(&mut platform, Box::new(Sandbox::default()))?;

    let ctx = platform.context();
    info!(
        "sandbox: {} frames, {} draw calls, {} vertex uploads",
        platform.frames_presented(),
        ctx.draw_calls().len(),
        ctx.upload_count()
    );
    Ok(())
}

#[derive(Default)]
struct Sandbox {
    stage: Option<Stage>,
    sheet: Option<Spritesheet>,
    sprites: Vec<EntityHandle>,
    markers: Vec<EntityHandle>,
    elapsed: f32,
}

impl Scene for Sandbox {
    fn create(&mut self, ctx: &mut ApplicationContext) -> engine::Result<()> {
        let shader = ctx.load_shader("quad", &ShaderSource::quad())?;
        let pixels = checkerboard(SHEET_SIZE, SPRITE_SIZE);
        let texture = ctx.load_texture("checkerboard", SHEET_SIZE, SHEET_SIZE, &pixels)?;
        let cells = (SHEET_SIZE / SPRITE_SIZE).pow(2) as usize;
        let sheet = Spritesheet::new(texture, SPRITE_SIZE, SPRITE_SIZE, cells, 0);

        let mut stage = Stage::new(
            Renderer::new(shader),
            Camera::with_viewport(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        );

        // background grid of colored quads
        for x in 0..=GRID_SIZE {
            for y in 0..=GRID_SIZE {
                let color = Vector4::new(
                    x as f32 / GRID_SIZE as f32,
                    y as f32 / GRID_SIZE as f32,
                    0.7,
                    1.0,
                );
                let entity = Entity::new(0)
                    .with_position(Vector2::new(x as f32 * CELL_SIZE, y as f32 * CELL_SIZE))
                    .with_scale(Vector2::new(CELL_SIZE * 0.8, CELL_SIZE * 0.8))
                    .with_color(color);
                stage.add_entity(ctx.graphics(), entity)?;
            }
        }

        // one sprite per spritesheet cell
        for (i, sprite) in sheet.sprites().iter().enumerate() {
            let entity = Entity::new(1)
                .with_position(Vector2::new(100.0 + i as f32 * 40.0, 300.0))
                .with_scale(Vector2::new(32.0, 32.0))
                .with_sprite(*sprite);
            self.sprites.push(stage.add_entity(ctx.graphics(), entity)?);
        }

        // translucent markers on top
        for i in 0..4 {
            let entity = Entity::new(2)
                .with_position(Vector2::new(i as f32 * 200.0, 0.0))
                .with_scale(Vector2::new(20.0, VIEWPORT_HEIGHT))
                .with_color(Vector4::new(1.0, 1.0, 1.0, 0.25));
            self.markers.push(stage.add_entity(ctx.graphics(), entity)?);
        }

        info!(
            "sandbox: {} entities in {} batches",
            stage.renderer().entity_count(),
            stage.renderer().batches().len()
        );
        self.stage = Some(stage);
        self.sheet = Some(sheet);
        Ok(())
    }

    fn update(
        &mut self,
        ctx: &mut ApplicationContext,
        delta_time: Duration,
    ) -> engine::Result<()> {
        let (Some(stage), Some(sheet)) = (self.stage.as_mut(), self.sheet.as_ref()) else {
            return Ok(());
        };
        let dt = delta_time.as_secs_f32();
        self.elapsed += dt;

        // move camera
        let input = ctx.input();
        let mut direction = Vector3::new(0.0, 0.0, 0.0);
        if input.is_key_pressed(Key::W) {
            direction.y += 1.0;
        }
        if input.is_key_pressed(Key::S) {
            direction.y -= 1.0;
        }
        if input.is_key_pressed(Key::D) {
            direction.x += 1.0;
        }
        if input.is_key_pressed(Key::A) {
            direction.x -= 1.0;
        }
        stage.camera_mut().translate(direction * CAMERA_SPEED * dt);

        // cycle sprites through the sheet, four cells per second
        let offset = (self.elapsed * 4.0) as usize;
        for (i, handle) in self.sprites.iter().enumerate() {
            if let Some(sprite) = sheet.sprite((i + offset) % sheet.len()) {
                stage.entity_mut(*handle)?.set_sprite(*sprite);
            }
        }

        // sweep markers across the viewport
        for (i, handle) in self.markers.iter().enumerate() {
            let x = (i as f32 * 200.0 + self.elapsed * 50.0) % VIEWPORT_WIDTH;
            stage.entity_mut(*handle)?.set_position(Vector2::new(x, 0.0));
        }
        Ok(())
    }

    fn render(&mut self, ctx: &mut ApplicationContext) -> engine::Result<()> {
        if let Some(stage) = self.stage.as_mut() {
            stage.render(ctx.graphics())?;
        }
        Ok(())
    }

    fn destroy(&mut self, ctx: &mut ApplicationContext) {
        if let Some(mut stage) = self.stage.take() {
            info!("sandbox: camera ended at {:?}", stage.camera().position());
            stage.destroy(ctx.graphics());
        }
    }
}

/// RGBA8 checkerboard alternating light and dark cells of `cell` pixels.
fn checkerboard(size: u32, cell: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = (x / cell + y / cell) % 2 == 0;
            let shade = if light { 230 } else { 40 };
            pixels.extend_from_slice(&[shade, shade, (x * 255 / size) as u8, 255]);
        }
    }
    pixels
}
