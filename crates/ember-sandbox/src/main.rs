use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ember_engine::compositor::{Compositor, CompositorConfig};
use ember_engine::coords::{Aabb2, Rgba, Vec2};
use ember_engine::device::{Gpu, GpuInit, WgpuDevice};
use ember_engine::logging::{init_logging, LoggingConfig};
use ember_engine::particles::{
    DefinitionLibrary, FloatRange, ParticleEmitterDefinition, ParticleSystemDefinition,
    ParticleSystemKind, SpawnAnchor, TrackedPosition, Vec2Range,
};
use ember_engine::scene::{BarGraph, Renderable, RenderableKind, Sprite, SpriteResource};
use ember_engine::time::FrameClock;

const SCREEN_W: u32 = 1280;
const SCREEN_H: u32 = 720;
const FRAMES: u64 = 180;

const BACKDROP_LAYER: i32 = -1;
const WORLD_LAYER: i32 = 0;
const FX_LAYER: i32 = 1;
const HUD_LAYER: i32 = 10;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = pollster::block_on(Gpu::headless(GpuInit::default()))?;
    let info = gpu.adapter_info();
    log::info!("sandbox running headless on {} ({:?})", info.name, info.backend);

    let mut device = WgpuDevice::new(&gpu, SCREEN_W, SCREEN_H)?;
    let checker = device
        .create_sprite_material("checker", &checker_pixels(), 2, 2)
        .context("uploading checker texture")?;
    let vignette = device
        .create_effect("vignette", include_str!("../shaders/vignette.wgsl"))
        .context("building vignette effect")?;

    let config = CompositorConfig {
        clear_color: Rgba::from_u8(18, 20, 28, 255),
        screen_width: SCREEN_W,
        screen_height: SCREEN_H,
        virtual_size: 12.0,
        world_bounds: Aabb2::new(Vec2::new(-40.0, -20.0), Vec2::new(40.0, 20.0)),
        seed: Some(0x5eed),
        ..CompositorConfig::default()
    };
    let mut compositor = Compositor::new(device, config)?;

    // ── scene ─────────────────────────────────────────────────────────────

    let tile = Arc::new(SpriteResource::new("tile", checker, Vec2::ONE));
    for y in -15..=15 {
        for x in -35..=35 {
            if (x + y) % 3 != 0 {
                continue;
            }
            let mut sprite = Sprite::new(Arc::clone(&tile)).at(Vec2::new(x as f32, y as f32));
            sprite.rotation_degrees = (x * 7 + y * 13) as f32;
            compositor.register_renderable(Renderable::sprite(WORLD_LAYER, sprite));
        }
    }

    let hud_bounds = Aabb2::new(Vec2::new(-10.0, 5.0), Vec2::new(-2.0, 5.5));
    let health = compositor.register_renderable(Renderable::bar_graph(
        HUD_LAYER,
        BarGraph::new(hud_bounds, Rgba::new(0.9, 0.2, 0.2, 1.0)).animated(0.5),
    ));

    // Backdrop layer is viewed at twice the virtual size.
    let backdrop = Arc::new(SpriteResource::new("backdrop", checker, Vec2::splat(6.0)));
    for x in -6..=6 {
        let mut sprite = Sprite::new(Arc::clone(&backdrop)).at(Vec2::new(x as f32 * 12.0, 0.0));
        sprite.tint = Rgba::new(0.3, 0.3, 0.4, 1.0);
        compositor.register_renderable(Renderable::sprite(BACKDROP_LAYER, sprite));
    }
    compositor.set_layer_virtual_scale(BACKDROP_LAYER, 2.0);
    compositor.add_effect_to_layer(vignette, WORLD_LAYER);

    let library = particle_library(&tile);
    let player = TrackedPosition::new(Vec2::ZERO);
    let trail = compositor.spawn_particle_system(
        &library,
        "trail",
        FX_LAYER,
        SpawnAnchor::Follow(player.follower()),
    )?;

    // ── frame loop ────────────────────────────────────────────────────────

    let mut clock = FrameClock::fixed(Duration::from_micros(16_667));
    while clock.frame_index() < FRAMES {
        let ft = clock.tick();
        let t = ft.frame_index as f32 / 60.0;

        player.set(Vec2::new(30.0 * (t * 0.7).sin(), 12.0 * (t * 1.3).cos()));
        compositor.set_camera_position(player.get(), 0);

        match ft.frame_index {
            30 => {
                compositor.play_one_shot(&library, "burst", FX_LAYER, SpawnAnchor::fixed(player.get(), 0.0))?;
            }
            60 => {
                compositor.set_split_screen(2);
                compositor.set_camera_position(Vec2::new(-30.0, 0.0), 1);
            }
            120 => {
                compositor.destroy_particle_system(trail);
            }
            _ => {}
        }

        if let Some(bar) = compositor.renderable_mut(health).and_then(bar_graph_mut) {
            bar.set_fill(1.0 - ft.frame_index as f32 / FRAMES as f32);
        }

        compositor.update(ft.dt);
        compositor.render();

        if ft.frame_index % 30 == 0 {
            let particles: usize = compositor
                .particle_system(trail)
                .map_or(0, |s| s.particle_count());
            log::info!(
                "frame {:>3}: camera {:?}, {} systems, {} trail particles",
                ft.frame_index,
                compositor.camera_position(),
                compositor.particle_system_count(),
                particles
            );
        }
    }

    log::info!("sandbox finished after {FRAMES} frames");
    Ok(())
}

fn bar_graph_mut(r: &mut Renderable) -> Option<&mut BarGraph> {
    match r.kind_mut() {
        RenderableKind::BarGraph(bar) => Some(bar),
        _ => None,
    }
}

fn particle_library(sprite: &Arc<SpriteResource>) -> DefinitionLibrary {
    let spark = ParticleEmitterDefinition::new(Arc::clone(sprite))
        .with_velocity(Vec2Range::new(Vec2::new(-4.0, -4.0), Vec2::new(4.0, 4.0)))
        .with_scale(Vec2Range::new(Vec2::splat(0.1), Vec2::splat(0.3)))
        .with_rotation(FloatRange::new(0.0, 360.0))
        .with_lifetime(FloatRange::new(0.4, 0.9))
        .with_tint(Rgba::new(1.0, 0.8, 0.3, 1.0));

    let mut library = DefinitionLibrary::new();
    library.insert(
        ParticleSystemDefinition::new("burst", ParticleSystemKind::OneShot)
            .with_emitter(spark.clone().with_initial_spawn(64)),
    );
    library.insert(
        ParticleSystemDefinition::new("trail", ParticleSystemKind::Looping).with_emitter(
            spark
                .with_rate(40.0)
                .with_acceleration(Vec2Range::constant(Vec2::new(0.0, -6.0)))
                .with_tint(Rgba::new(0.4, 0.7, 1.0, 1.0)),
        ),
    );
    library
}

/// 2x2 straight-alpha RGBA checker.
fn checker_pixels() -> [u8; 16] {
    [
        255, 255, 255, 255, 90, 90, 110, 255, //
        90, 90, 110, 255, 255, 255, 255, 255,
    ]
}
