use std::{rc::Rc, time::Instant};

use glam::Vec3;
use glow::HasContext;

use crate::{
    abs::*,
    camera::Camera,
    input::Input,
    scene::{CubeVertex, LampLayout, LightRig, LitLayout},
    settings::Settings,
};

mod abs;
mod camera;
mod input;
mod logging;
mod scene;
mod settings;

/// Measures the time between consecutive frames.
struct FrameClock {
    last: Instant,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous call.
    fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta_time = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        delta_time
    }
}

/// Width over height of a drawable area; a zero height (minimised window) counts as one pixel.
fn aspect(width: u32, height: u32) -> f32 {
    width as f32 / height.max(1) as f32
}

/// GPU resources for the scene.
struct Scene {
    object_program: ShaderProgram,
    lamp_program: ShaderProgram,
    cube_mesh: Mesh<CubeVertex>,
    lamp_mesh: Mesh<CubeVertex>,
    diffuse_map: Texture,
    specular_map: Texture,
    lights: LightRig,
}

impl Scene {
    fn new(gl: &std::sync::Arc<glow::Context>, settings: &Settings) -> Result<Self, String> {
        let assets = &settings.assets;
        let object_program = ShaderProgram::from_files(
            gl,
            &assets.object_vertex_shader,
            &assets.object_fragment_shader,
        )?;
        let lamp_program = ShaderProgram::from_files(
            gl,
            &assets.lamp_vertex_shader,
            &assets.lamp_fragment_shader,
        )?;

        let vertices = Rc::new(VertexBuffer::new(gl, &scene::CUBE_VERTICES)?);
        let cube_mesh = Mesh::new::<LitLayout>(gl, &vertices)?;
        let lamp_mesh = Mesh::new::<LampLayout>(gl, &vertices)?;

        let diffuse_map = Texture::load(gl, &assets.diffuse_map)?;
        let specular_map = Texture::load(gl, &assets.specular_map)?;

        object_program.use_program();
        object_program.set_uniform("material.diffuse", 0i32);
        object_program.set_uniform("material.specular", 1i32);
        object_program.set_uniform("material.shininess", 32.0f32);

        Ok(Self {
            object_program,
            lamp_program,
            cube_mesh,
            lamp_mesh,
            diffuse_map,
            specular_map,
            lights: LightRig::default(),
        })
    }

    fn render(&mut self, camera: &Camera, aspect_ratio: f32) {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix(aspect_ratio);

        self.lights.spot.follow(camera);

        self.object_program.use_program();
        self.object_program.set_uniform("view", view);
        self.object_program.set_uniform("projection", projection);
        self.object_program.set_uniform("view_pos", camera.position());
        self.lights.apply(&self.object_program);

        self.diffuse_map.bind(0);
        self.specular_map.bind(1);
        for i in 0..scene::CUBE_POSITIONS.len() {
            self.object_program.set_uniform("model", scene::cube_model(i));
            self.cube_mesh.draw();
        }

        self.lamp_program.use_program();
        self.lamp_program.set_uniform("view", view);
        self.lamp_program.set_uniform("projection", projection);
        for light in &self.lights.points {
            self.lamp_program.set_uniform("light_color", light.color.specular);
            self.lamp_program.set_uniform("model", scene::lamp_model(light.position));
            self.lamp_mesh.draw();
        }
    }
}

fn main() -> Result<(), String> {
    logging::init()?;
    let settings = Settings::load(settings::SETTINGS_FILE);
    logging::set_level(settings.log_level());

    let window = &settings.window;
    let mut app = App::new(&window.title, window.width, window.height, window.fullscreen)
        .inspect_err(|e| log::error!("failed to create window: {}", e))?;

    unsafe {
        app.gl.enable(glow::DEPTH_TEST);
    }

    let mut scene = Scene::new(&app.gl, &settings)?;

    let camera_settings = &settings.camera;
    let mut camera = Camera::new(
        camera_settings.position(),
        Vec3::Y,
        camera_settings.yaw,
        camera_settings.pitch,
    );
    camera.speed = camera_settings.speed;
    camera.sensitivity = camera_settings.sensitivity;

    let (width, height) = app.drawable_size();
    let mut aspect_ratio = aspect(width, height);
    let [r, g, b] = settings.clear_color;

    let mut input = Input::default();
    let mut clock = FrameClock::new();

    log::info!("entering render loop");

    while !input.quit {
        let delta_time = clock.tick();

        input.begin_frame();
        for event in app.event_pump.poll_iter() {
            input.handle_event(&event);
        }

        if input.resized {
            let (width, height) = app.drawable_size();
            unsafe {
                app.gl.viewport(0, 0, width as i32, height as i32);
            }
            aspect_ratio = aspect(width, height);
            log::debug!("viewport resized to {}x{}", width, height);
        }

        for movement in input.keyboard.movements() {
            camera.translate(movement, delta_time);
        }
        let look = input.mouse.look_offset();
        if look != glam::Vec2::ZERO {
            camera.rotate(look.x, look.y, true);
        }
        if input.mouse.scroll_delta.y != 0.0 {
            camera.zoom(input.mouse.scroll_delta.y);
        }

        unsafe {
            app.gl.clear_color(r, g, b, 1.0);
            app.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        scene.render(&camera, aspect_ratio);
        app.window.gl_swap_window();
    }

    log::info!(
        "shutting down; camera at {} (yaw {:.1}, pitch {:.1}, fov {:.1})",
        camera.position(),
        camera.yaw(),
        camera.pitch(),
        camera.fov()
    );
    drop(scene);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_clock_measures_elapsed_time() {
        let mut clock = FrameClock::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let first = clock.tick();
        assert!(first >= 0.005);
        let second = clock.tick();
        assert!(second >= 0.0 && second < first);
    }

    #[test]
    fn test_aspect_ratio_of_drawable_size() {
        assert_eq!(aspect(1920, 1080), 1920.0 / 1080.0);
        assert_eq!(aspect(2560, 1600), 1.6);
        assert_eq!(aspect(800, 0), 800.0);
    }
}
