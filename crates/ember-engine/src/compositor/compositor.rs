use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::coords::{Aabb2, PixelRect, Rgba, Vec2};
use crate::device::{MaterialId, RenderDevice, UniformValue};
use crate::particles::{
    DefinitionSource, ParticleError, ParticleSystem, ParticleSystemKind, SpawnAnchor,
};
use crate::render::MeshBuilder;
use crate::scene::{LayerId, Renderable, Ring, RingHandle, SpriteLayer};

use super::{
    split_screen, CompositorConfig, CompositorError, PingPongTargets, VirtualCamera,
    ViewportDefinition,
};

/// Handle to a renderable registered with a [`Compositor`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RenderableHandle {
    layer: LayerId,
    slot: RingHandle,
}

impl RenderableHandle {
    #[inline]
    pub fn layer(self) -> LayerId {
        self.layer
    }
}

/// Handle to a particle system registered with a [`Compositor`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ParticleSystemHandle(RingHandle);

/// Per-frame orchestrator of layers, particle systems, viewports and effects.
///
/// Frame contract: one [`update`](Self::update) (all mutation) followed by one
/// [`render`](Self::render) (reads scene state, drives the device).
pub struct Compositor<D: RenderDevice> {
    device: D,
    clear_color: Rgba,
    import_size: u32,
    screen: (u32, u32),
    camera: VirtualCamera,
    viewports: Vec<ViewportDefinition>,
    layers: BTreeMap<LayerId, SpriteLayer>,
    particle_systems: Ring<ParticleSystem>,
    targets: PingPongTargets,
    batch: MeshBuilder,
    rng: StdRng,
    time: f32,
}

impl<D: RenderDevice> Compositor<D> {
    /// Allocates the ping-pong targets at screen size.
    pub fn new(mut device: D, config: CompositorConfig) -> Result<Self, CompositorError> {
        let (w, h) = (config.screen_width, config.screen_height);
        if w == 0 || h == 0 {
            return Err(CompositorError::InvalidResolution { width: w, height: h });
        }
        let targets = create_targets(&mut device, w, h)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        log::debug!(
            "compositor created: {w}x{h}, virtual size {}, {} view(s)",
            config.virtual_size,
            config.split_screen_views
        );

        Ok(Self {
            device,
            clear_color: config.clear_color,
            import_size: config.import_size,
            screen: (w, h),
            camera: VirtualCamera::new(w, h, config.virtual_size, config.world_bounds),
            viewports: split_screen(w, h, config.split_screen_views),
            layers: BTreeMap::new(),
            particle_systems: Ring::new(),
            targets,
            batch: MeshBuilder::new(),
            rng,
            time: 0.0,
        })
    }

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Seconds of simulated time; drives effect `gTime`.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn import_size(&self) -> u32 {
        self.import_size
    }

    #[inline]
    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Advances renderables and particle systems, then reclaims the dead.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;

        let mut cleaned = 0;
        for layer in self.layers.values_mut() {
            layer.update(dt);
            cleaned += layer.clean_up_dead(false);
        }

        self.particle_systems.for_each_mut(|_, system| system.update(dt));
        let reclaimed = self.particle_systems.retain(|system| {
            if system.is_dead() {
                log::debug!("particle system `{}` finished, reclaiming", system.name());
            }
            !system.is_dead()
        });

        log::trace!(
            "update dt={dt:.4}: {cleaned} renderables cleaned, {reclaimed} systems reclaimed, {} live systems",
            self.particle_systems.len()
        );
    }

    /// Renders every viewport in order.
    pub fn render(&mut self) {
        for i in 0..self.viewports.len() {
            let viewport = self.viewports[i];
            self.render_view(&viewport);
        }
    }

    /// Composes all layers into the primary target and blits it to `viewport`.
    pub fn render_view(&mut self, viewport: &ViewportDefinition) {
        self.device.bind_target(self.targets.primary());
        self.device
            .set_viewport(PixelRect::new(0, 0, viewport.rect.width, viewport.rect.height));
        self.device.clear_color(self.clear_color);

        let ids: Vec<LayerId> = self.layers.keys().copied().collect();
        for id in ids {
            self.render_layer(id, viewport);
        }

        self.device.blit(self.targets.primary(), viewport.rect);
        self.device.unbind();
    }

    /// Draws one layer into the bound target, then runs its effect chain.
    ///
    /// Unknown or disabled layers still update the camera for this viewport.
    pub fn render_layer(&mut self, id: LayerId, viewport: &ViewportDefinition) {
        let scale = self.layers.get(&id).map_or(1.0, SpriteLayer::virtual_scale);
        self.camera.recalculate_frame(viewport.aspect_ratio, scale);
        self.camera.clamp_to_world(viewport.camera_position, scale);
        let frame = self.camera.bounds_around_camera();

        let Some(layer) = self.layers.get(&id) else {
            return;
        };
        if !layer.is_enabled() {
            return;
        }

        self.device
            .begin_orthographic(self.camera.frame_size(), self.camera.position());

        let mut drawn = 0;
        for (_, renderable) in layer.renderables().iter() {
            if renderable.is_dead() {
                continue;
            }
            if renderable.is_cullable() && !frame.intersects(renderable.bounds()) {
                continue;
            }
            self.batch.clear();
            renderable.render(&mut self.batch);
            draw_batch(&mut self.device, &self.batch, renderable.material());
            drawn += 1;
        }

        for (_, system) in self.particle_systems.iter() {
            if system.layer() != id {
                continue;
            }
            for (material, mesh) in system.meshes() {
                draw_batch(&mut self.device, mesh, material);
                drawn += 1;
            }
        }

        self.device.end_orthographic();
        log::trace!("layer {id:?}: {drawn} draws of {} renderables", layer.len());

        for effect in layer.effects() {
            self.device.bind_target(self.targets.secondary());
            self.device
                .set_effect_input(effect.material, self.targets.primary());
            self.device
                .set_uniform(effect.material, "gTime", UniformValue::Float(self.time));
            self.device.draw_fullscreen(effect.material);
            self.targets.swap();
            self.device.clear_depth();
        }
    }

    // ── layers ────────────────────────────────────────────────────────────

    /// Returns the layer for `id`, creating it on first reference.
    pub fn layer_mut(&mut self, id: impl Into<LayerId>) -> &mut SpriteLayer {
        let id = id.into();
        self.layers.entry(id).or_insert_with(|| {
            log::debug!("layer {id:?} created");
            SpriteLayer::new(id)
        })
    }

    #[inline]
    pub fn layer(&self, id: impl Into<LayerId>) -> Option<&SpriteLayer> {
        self.layers.get(&id.into())
    }

    /// Layers in ascending draw order.
    pub fn layers(&self) -> impl Iterator<Item = &SpriteLayer> {
        self.layers.values()
    }

    pub fn enable_layer(&mut self, id: impl Into<LayerId>) {
        self.layer_mut(id).set_enabled(true);
    }

    pub fn disable_layer(&mut self, id: impl Into<LayerId>) {
        self.layer_mut(id).set_enabled(false);
    }

    pub fn toggle_layer(&mut self, id: impl Into<LayerId>) {
        let layer = self.layer_mut(id);
        layer.set_enabled(!layer.is_enabled());
        log::debug!("layer {:?} enabled={}", layer.id(), layer.is_enabled());
    }

    pub fn set_layer_virtual_scale(&mut self, id: impl Into<LayerId>, scale: f32) {
        self.layer_mut(id).set_virtual_scale(scale);
    }

    // ── renderables ───────────────────────────────────────────────────────

    /// Adds `renderable` to the layer named by its own layer id.
    pub fn register_renderable(&mut self, renderable: Renderable) -> RenderableHandle {
        let layer = renderable.layer();
        let slot = self.layer_mut(layer).add(renderable);
        RenderableHandle { layer, slot }
    }

    /// Removes and returns the renderable; `None` if it was already reclaimed.
    pub fn unregister_renderable(&mut self, handle: RenderableHandle) -> Option<Renderable> {
        self.layers.get_mut(&handle.layer)?.remove(handle.slot)
    }

    pub fn renderable(&self, handle: RenderableHandle) -> Option<&Renderable> {
        self.layers.get(&handle.layer)?.get(handle.slot)
    }

    pub fn renderable_mut(&mut self, handle: RenderableHandle) -> Option<&mut Renderable> {
        self.layers.get_mut(&handle.layer)?.get_mut(handle.slot)
    }

    /// Flags the renderable dead; it is removed at the end of the next update.
    pub fn kill(&mut self, handle: RenderableHandle) -> bool {
        match self.renderable_mut(handle) {
            Some(r) => {
                r.kill();
                true
            }
            None => false,
        }
    }

    // ── effects ───────────────────────────────────────────────────────────

    /// Appends `material` to the layer's effect chain and stamps `gStartTime`.
    pub fn add_effect_to_layer(&mut self, material: MaterialId, id: impl Into<LayerId>) {
        let id = id.into();
        let now = self.time;
        self.layer_mut(id).add_effect(material, now);
        self.device
            .set_uniform(material, "gStartTime", UniformValue::Float(now));
        log::debug!("effect {material:?} added to layer {id:?}");
    }

    pub fn remove_effect_from_layer(&mut self, material: MaterialId, id: impl Into<LayerId>) -> bool {
        let id = id.into();
        let removed = self
            .layers
            .get_mut(&id)
            .is_some_and(|layer| layer.remove_effect(material));
        if removed {
            log::debug!("effect {material:?} removed from layer {id:?}");
        }
        removed
    }

    // ── particles ─────────────────────────────────────────────────────────

    /// Builds and registers a particle system from a named definition.
    ///
    /// Nothing is registered when the definition cannot be resolved.
    pub fn spawn_particle_system(
        &mut self,
        source: &dyn DefinitionSource,
        name: &str,
        layer: impl Into<LayerId>,
        anchor: SpawnAnchor,
    ) -> Result<ParticleSystemHandle, ParticleError> {
        let layer = layer.into();
        let system = ParticleSystem::from_source(source, name, layer, anchor, &mut self.rng)
            .inspect_err(|e| log::warn!("particle system not spawned: {e}"))?;
        Ok(self.register_particle_system(system))
    }

    /// Plays a one-shot definition; the system is reclaimed once it finishes.
    ///
    /// # Panics
    /// If `name` resolves to a looping definition.
    pub fn play_one_shot(
        &mut self,
        source: &dyn DefinitionSource,
        name: &str,
        layer: impl Into<LayerId>,
        anchor: SpawnAnchor,
    ) -> Result<ParticleSystemHandle, ParticleError> {
        let layer = layer.into();
        let system = ParticleSystem::from_source(source, name, layer, anchor, &mut self.rng)
            .inspect_err(|e| log::warn!("one-shot not played: {e}"))?;
        assert_eq!(
            system.kind(),
            ParticleSystemKind::OneShot,
            "play_one_shot called with looping particle system `{name}`"
        );
        Ok(self.register_particle_system(system))
    }

    /// Registers an already built system; its layer is created if needed.
    pub fn register_particle_system(&mut self, system: ParticleSystem) -> ParticleSystemHandle {
        self.layer_mut(system.layer());
        log::debug!(
            "particle system `{}` registered on layer {:?} ({} particles)",
            system.name(),
            system.layer(),
            system.particle_count()
        );
        ParticleSystemHandle(self.particle_systems.insert(system))
    }

    /// Stops emission; the system is reclaimed once its particles expire.
    pub fn destroy_particle_system(&mut self, handle: ParticleSystemHandle) -> bool {
        match self.particle_systems.get_mut(handle.0) {
            Some(system) => {
                system.destroy_gracefully();
                true
            }
            None => false,
        }
    }

    /// Unregisters and drops the system now.
    pub fn destroy_particle_system_immediately(&mut self, handle: ParticleSystemHandle) -> bool {
        match self.particle_systems.remove(handle.0) {
            Some(system) => {
                log::debug!("particle system `{}` destroyed immediately", system.name());
                true
            }
            None => {
                log::warn!("destroy_particle_system_immediately: stale handle {:?}", handle.0);
                false
            }
        }
    }

    pub fn particle_system(&self, handle: ParticleSystemHandle) -> Option<&ParticleSystem> {
        self.particle_systems.get(handle.0)
    }

    #[inline]
    pub fn particle_system_count(&self) -> usize {
        self.particle_systems.len()
    }

    // ── viewports / camera ────────────────────────────────────────────────

    /// Re-tiles the screen into `views` side-by-side viewports, cameras at origin.
    pub fn set_split_screen(&mut self, views: u32) {
        let (w, h) = self.screen;
        if views == 0 {
            log::warn!("split screen needs at least one view; using 1");
        } else if views > w {
            log::warn!("{views} views do not fit a {w}px wide screen; using {w}");
        }
        self.viewports = split_screen(w, h, views);
        log::debug!("split screen set to {} view(s)", self.viewports.len());
    }

    #[inline]
    pub fn viewports(&self) -> &[ViewportDefinition] {
        &self.viewports
    }

    /// Requests a camera centre for one viewport; clamped when rendered.
    pub fn set_camera_position(&mut self, position: Vec2, viewport: usize) -> bool {
        match self.viewports.get_mut(viewport) {
            Some(vp) => {
                vp.camera_position = position;
                true
            }
            None => {
                log::warn!(
                    "set_camera_position: viewport {viewport} out of range ({} views)",
                    self.viewports.len()
                );
                false
            }
        }
    }

    /// Clamped camera centre used by the most recently rendered layer.
    #[inline]
    pub fn camera_position(&self) -> Vec2 {
        self.camera.position()
    }

    #[inline]
    pub fn camera(&self) -> &VirtualCamera {
        &self.camera
    }

    pub fn virtual_bounds_around_camera_center(&self) -> Aabb2 {
        self.camera.bounds_around_camera()
    }

    pub fn virtual_bounds_around_world_center(&self) -> Aabb2 {
        self.camera.bounds_around_world_center()
    }

    /// Strict containment in the world bounds.
    pub fn is_inside_world_bounds(&self, position: Vec2) -> bool {
        self.camera.world_bounds().contains_point_strict(position)
    }

    #[inline]
    pub fn pixels_per_virtual_unit(&self) -> f32 {
        self.camera.pixels_per_virtual_unit()
    }

    #[inline]
    pub fn virtual_units_per_pixel(&self) -> f32 {
        self.camera.virtual_units_per_pixel()
    }

    pub fn set_virtual_size(&mut self, virtual_size: f32) {
        self.camera.set_virtual_size(virtual_size);
    }

    pub fn set_world_bounds(&mut self, bounds: Aabb2) {
        self.camera.set_world_bounds(bounds);
    }

    /// Resizes the off-screen targets and re-tiles the viewports, keeping
    /// each surviving viewport's camera request.
    pub fn update_screen_resolution(&mut self, width: u32, height: u32) -> Result<(), CompositorError> {
        if width == 0 || height == 0 {
            return Err(CompositorError::InvalidResolution { width, height });
        }
        let targets = create_targets(&mut self.device, width, height)?;
        for old in self.targets.both() {
            self.device.release_target(old);
        }
        self.targets = targets;

        self.screen = (width, height);
        self.camera.set_screen_resolution(width, height);

        let cameras: Vec<Vec2> = self.viewports.iter().map(|v| v.camera_position).collect();
        self.viewports = split_screen(width, height, cameras.len() as u32);
        for (vp, camera) in self.viewports.iter_mut().zip(cameras) {
            vp.camera_position = camera;
        }

        log::debug!("screen resolution changed to {width}x{height}");
        Ok(())
    }
}

impl<D: RenderDevice> Drop for Compositor<D> {
    fn drop(&mut self) {
        for target in self.targets.both() {
            self.device.release_target(target);
        }
        log::debug!(
            "compositor dropped with {} layers, {} particle systems",
            self.layers.len(),
            self.particle_systems.len()
        );
    }
}

fn create_targets<D: RenderDevice>(device: &mut D, width: u32, height: u32) -> Result<PingPongTargets, CompositorError> {
    let a = device.create_target(width, height)?;
    let b = match device.create_target(width, height) {
        Ok(b) => b,
        Err(e) => {
            device.release_target(a);
            return Err(e.into());
        }
    };
    Ok(PingPongTargets::new(a, b))
}

/// Uploads, draws and releases one batch. Empty batches are skipped.
fn draw_batch<D: RenderDevice>(device: &mut D, batch: &MeshBuilder, material: MaterialId) {
    if batch.is_empty() {
        return;
    }
    let mesh = device.upload_mesh(batch.vertices(), batch.indices());
    device.draw_mesh(mesh, material);
    device.release_mesh(mesh);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::device::{DeviceCommand, RecordingDevice, TargetId};
    use crate::particles::{
        DefinitionLibrary, FloatRange, ParticleEmitterDefinition, ParticleSystemDefinition,
    };
    use crate::scene::{BarGraph, Sprite, SpriteResource};

    const SPRITE_MAT: MaterialId = MaterialId(7);
    const SPARK_MAT: MaterialId = MaterialId(8);

    /// 1600x800 at virtual size 10: the camera frame is 20x10 units.
    fn compositor() -> Compositor<RecordingDevice> {
        let config = CompositorConfig {
            screen_width: 1600,
            screen_height: 800,
            virtual_size: 10.0,
            seed: Some(3),
            ..CompositorConfig::default()
        };
        Compositor::new(RecordingDevice::new(), config).unwrap()
    }

    fn sprite_at(layer: i32, x: f32, y: f32) -> Renderable {
        let res = Arc::new(SpriteResource::new("box", SPRITE_MAT, Vec2::new(2.0, 2.0)));
        Renderable::sprite(layer, Sprite::new(res).at(Vec2::new(x, y)))
    }

    fn library() -> DefinitionLibrary {
        let spark = Arc::new(SpriteResource::new("spark", SPARK_MAT, Vec2::ONE));
        let emitter = ParticleEmitterDefinition::new(spark).with_lifetime(FloatRange::constant(1.0));
        let mut lib = DefinitionLibrary::new();
        lib.insert(
            ParticleSystemDefinition::new("burst", ParticleSystemKind::OneShot)
                .with_emitter(emitter.clone().with_initial_spawn(3)),
        );
        lib.insert(
            ParticleSystemDefinition::new("fountain", ParticleSystemKind::Looping)
                .with_emitter(emitter.with_rate(4.0)),
        );
        lib
    }

    fn drawn_materials(device: &RecordingDevice) -> Vec<MaterialId> {
        device
            .commands()
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::DrawMesh { material, .. } => Some(*material),
                _ => None,
            })
            .collect()
    }

    fn blits(device: &RecordingDevice) -> Vec<(TargetId, PixelRect)> {
        device
            .commands()
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::Blit { target, dest } => Some((*target, *dest)),
                _ => None,
            })
            .collect()
    }

    // ── culling ───────────────────────────────────────────────────────────

    #[test]
    fn render_draws_inside_and_overlapping_only() {
        let mut c = compositor();
        c.register_renderable(sprite_at(0, 0.0, 0.0));
        c.register_renderable(sprite_at(0, 100.0, 100.0));
        c.register_renderable(sprite_at(0, 10.5, 0.0));

        c.render();
        assert_eq!(c.device().draw_count(), 2);
        assert_eq!(c.device().live_mesh_count(), 0);
    }

    #[test]
    fn non_cullable_is_drawn_out_of_frame() {
        let mut c = compositor();
        c.register_renderable(sprite_at(0, 100.0, 100.0).with_cullable(false));
        let far = Aabb2::new(Vec2::new(500.0, 500.0), Vec2::new(510.0, 501.0));
        c.register_renderable(Renderable::bar_graph(0, BarGraph::new(far, Rgba::WHITE)));

        c.render();
        assert_eq!(c.device().draw_count(), 2);
    }

    #[test]
    fn edge_touching_renderable_is_culled() {
        let mut c = compositor();
        // Spans x in [10, 12]; the frame ends at x = 10.
        c.register_renderable(sprite_at(0, 11.0, 0.0));
        c.render();
        assert_eq!(c.device().draw_count(), 0);
    }

    // ── layers ────────────────────────────────────────────────────────────

    #[test]
    fn layers_draw_in_ascending_order() {
        let mut c = compositor();
        let res = Arc::new(SpriteResource::new("bg", MaterialId(1), Vec2::ONE));
        c.register_renderable(sprite_at(5, 0.0, 0.0));
        c.register_renderable(Renderable::sprite(-1, Sprite::new(res)));

        c.render();
        assert_eq!(drawn_materials(c.device()), vec![MaterialId(1), SPRITE_MAT]);
    }

    #[test]
    fn layer_is_created_on_first_reference() {
        let mut c = compositor();
        assert!(c.layer(3).is_none());
        c.disable_layer(3);
        assert!(!c.layer(3).unwrap().is_enabled());
        c.toggle_layer(3);
        assert!(c.layer(3).unwrap().is_enabled());
    }

    #[test]
    fn disabled_layer_skips_draws_and_effects() {
        let mut c = compositor();
        c.register_renderable(sprite_at(0, 0.0, 0.0));
        c.add_effect_to_layer(MaterialId(20), 0);
        c.disable_layer(0);

        c.render();
        assert_eq!(c.device().draw_count(), 0);
        assert_eq!(c.device().fullscreen_count(), 0);
    }

    #[test]
    fn killed_renderable_is_removed_on_update() {
        let mut c = compositor();
        let h = c.register_renderable(sprite_at(0, 0.0, 0.0));
        assert!(c.kill(h));
        c.update(0.016);
        assert!(c.renderable(h).is_none());
        assert_eq!(c.layer(0).unwrap().len(), 0);
        assert!(!c.kill(h));
    }

    #[test]
    fn unregister_returns_renderable_once() {
        let mut c = compositor();
        let h = c.register_renderable(sprite_at(2, 0.0, 0.0));
        assert_eq!(h.layer(), LayerId(2));
        assert!(c.unregister_renderable(h).is_some());
        assert!(c.unregister_renderable(h).is_none());
    }

    // ── effects ───────────────────────────────────────────────────────────

    #[test]
    fn single_effect_reads_primary_and_swaps() {
        let mut c = compositor();
        let fx = MaterialId(20);
        c.register_renderable(sprite_at(0, 0.0, 0.0));
        c.add_effect_to_layer(fx, 0);
        c.device_mut().clear_commands();

        c.render();
        let cmds = c.device().commands();
        let fx_input = cmds.iter().position(|cmd| {
            *cmd == DeviceCommand::SetEffectInput { material: fx, target: TargetId(0) }
        });
        assert!(fx_input.is_some());
        assert!(cmds.contains(&DeviceCommand::BindTarget(TargetId(1))));
        // The effect's output is what reaches the screen.
        assert_eq!(blits(c.device()), vec![(TargetId(1), PixelRect::new(0, 0, 1600, 800))]);
    }

    #[test]
    fn chained_effects_ping_pong_in_registration_order() {
        let mut c = compositor();
        let (a, b) = (MaterialId(20), MaterialId(21));
        c.add_effect_to_layer(a, 0);
        c.add_effect_to_layer(b, 0);
        c.device_mut().clear_commands();

        c.render();
        let inputs: Vec<_> = c
            .device()
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DeviceCommand::SetEffectInput { material, target } => Some((*material, *target)),
                _ => None,
            })
            .collect();
        assert_eq!(inputs, vec![(a, TargetId(0)), (b, TargetId(1))]);
        assert_eq!(c.device().fullscreen_count(), 2);
        assert_eq!(blits(c.device())[0].0, TargetId(0));
    }

    #[test]
    fn adding_effect_stamps_start_time() {
        let mut c = compositor();
        c.update(0.5);
        c.add_effect_to_layer(MaterialId(20), 1);
        assert!(c.device().commands().contains(&DeviceCommand::SetUniform {
            material: MaterialId(20),
            name: "gStartTime".to_string(),
            value: UniformValue::Float(0.5),
        }));
        assert!(c.remove_effect_from_layer(MaterialId(20), 1));
        assert!(!c.remove_effect_from_layer(MaterialId(20), 1));
    }

    // ── viewports / camera ────────────────────────────────────────────────

    #[test]
    fn split_screen_renders_each_view() {
        let mut c = compositor();
        c.set_split_screen(2);
        c.render();
        assert_eq!(
            blits(c.device()),
            vec![
                (TargetId(0), PixelRect::new(0, 0, 800, 800)),
                (TargetId(0), PixelRect::new(800, 0, 800, 800)),
            ]
        );
    }

    #[test]
    fn split_screen_never_produces_zero_width_views() {
        let config = CompositorConfig {
            screen_width: 4,
            screen_height: 4,
            virtual_size: 10.0,
            world_bounds: Aabb2::new(Vec2::new(-30.0, -30.0), Vec2::new(30.0, 30.0)),
            ..CompositorConfig::default()
        };
        let mut c = Compositor::new(RecordingDevice::new(), config).unwrap();
        c.register_renderable(sprite_at(0, 100.0, 100.0));
        c.set_split_screen(8);
        assert_eq!(c.viewports().len(), 4);
        assert!(c.viewports().iter().all(|v| v.rect.width == 1));

        c.render();
        assert!(c.camera().frame_size().is_finite());
        assert_eq!(c.device().draw_count(), 0);
    }

    #[test]
    fn camera_request_is_clamped_at_render() {
        let mut c = compositor();
        c.set_world_bounds(Aabb2::new(Vec2::new(-30.0, -30.0), Vec2::new(30.0, 30.0)));
        assert!(c.set_camera_position(Vec2::new(500.0, -500.0), 0));
        assert!(!c.set_camera_position(Vec2::ZERO, 4));
        c.register_renderable(sprite_at(0, 0.0, 0.0));

        c.render();
        assert_eq!(c.camera_position(), Vec2::new(20.0, -25.0));
        assert!(
            c.device()
                .commands()
                .contains(&DeviceCommand::BeginOrthographic {
                    size: Vec2::new(20.0, 10.0),
                    center: Vec2::new(20.0, -25.0),
                })
        );
    }

    #[test]
    fn world_bounds_query_is_strict() {
        let mut c = compositor();
        c.set_world_bounds(Aabb2::new(Vec2::ZERO, Vec2::new(10.0, 10.0)));
        assert!(c.is_inside_world_bounds(Vec2::new(5.0, 5.0)));
        assert!(!c.is_inside_world_bounds(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn resolution_change_replaces_targets() {
        let mut c = compositor();
        c.set_split_screen(2);
        c.set_camera_position(Vec2::new(1.0, 1.0), 1);
        c.update_screen_resolution(800, 400).unwrap();

        assert_eq!(c.device().live_target_count(), 2);
        assert_eq!(c.viewports()[1].rect, PixelRect::new(400, 0, 400, 400));
        assert_eq!(c.viewports()[1].camera_position, Vec2::new(1.0, 1.0));
        assert_eq!(c.pixels_per_virtual_unit(), 40.0);
        assert!(c.update_screen_resolution(0, 400).is_err());
    }

    #[test]
    fn target_creation_failure_is_reported() {
        let mut device = RecordingDevice::new();
        device.fail_target_creation = true;
        let result = Compositor::new(device, CompositorConfig::default());
        assert!(matches!(result, Err(CompositorError::Device(_))));
    }

    // ── particles ─────────────────────────────────────────────────────────

    #[test]
    fn one_shot_draws_on_its_layer_and_is_reclaimed() {
        let mut c = compositor();
        let lib = library();
        let h = c
            .play_one_shot(&lib, "burst", 4, SpawnAnchor::fixed(Vec2::ZERO, 0.0))
            .unwrap();
        assert_eq!(c.particle_system_count(), 1);

        c.render();
        assert_eq!(drawn_materials(c.device()), vec![SPARK_MAT]);

        for _ in 0..4 {
            c.update(0.25);
        }
        assert_eq!(c.particle_system_count(), 0);
        assert!(c.particle_system(h).is_none());

        c.device_mut().clear_commands();
        c.render();
        assert_eq!(c.device().draw_count(), 0);
    }

    #[test]
    fn system_without_live_particles_uploads_nothing() {
        let mut c = compositor();
        c.spawn_particle_system(&library(), "fountain", 0, SpawnAnchor::fixed(Vec2::ZERO, 0.0))
            .unwrap();
        assert_eq!(c.particle_system_count(), 1);

        c.render();
        assert_eq!(c.device().upload_count(), 0);
        assert_eq!(c.device().draw_count(), 0);

        c.update(0.25);
        c.device_mut().clear_commands();
        c.render();
        assert_eq!(c.device().upload_count(), 1);
        assert_eq!(drawn_materials(c.device()), vec![SPARK_MAT]);
        assert_eq!(c.particle_system_count(), 1);
    }

    #[test]
    fn unknown_definition_registers_nothing() {
        let mut c = compositor();
        let result = c.spawn_particle_system(&library(), "nope", 0, SpawnAnchor::fixed(Vec2::ZERO, 0.0));
        assert_eq!(result.err(), Some(ParticleError::DefinitionNotFound("nope".into())));
        assert_eq!(c.particle_system_count(), 0);
    }

    #[test]
    #[should_panic(expected = "looping")]
    fn one_shot_helper_rejects_looping_definition() {
        let mut c = compositor();
        let _ = c.play_one_shot(&library(), "fountain", 0, SpawnAnchor::fixed(Vec2::ZERO, 0.0));
    }

    #[test]
    fn graceful_destroy_lets_particles_finish() {
        let mut c = compositor();
        let h = c
            .spawn_particle_system(&library(), "fountain", 0, SpawnAnchor::fixed(Vec2::ZERO, 0.0))
            .unwrap();
        c.update(0.5);
        assert!(c.destroy_particle_system(h));

        for _ in 0..3 {
            c.update(0.25);
            assert_eq!(c.particle_system_count(), 1);
        }
        c.update(0.25);
        assert_eq!(c.particle_system_count(), 0);
        assert!(!c.destroy_particle_system(h));
    }

    #[test]
    fn immediate_destroy_unregisters_now() {
        let mut c = compositor();
        let h = c
            .spawn_particle_system(&library(), "fountain", 0, SpawnAnchor::fixed(Vec2::ZERO, 0.0))
            .unwrap();
        assert!(c.destroy_particle_system_immediately(h));
        assert_eq!(c.particle_system_count(), 0);
        assert!(!c.destroy_particle_system_immediately(h));
    }
}
