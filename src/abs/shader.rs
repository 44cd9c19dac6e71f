//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! This module also provides the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::{path::Path, sync::Arc};

use glam::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;

/// Represents an individual compiled shader stage.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    ///
    /// On failure the driver's info log is returned as the error.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(shader_type)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(log);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Human readable name of a shader stage for log output.
fn stage_name(shader_type: u32) -> &'static str {
    match shader_type {
        glow::VERTEX_SHADER => "VERTEX",
        glow::FRAGMENT_SHADER => "FRAGMENT",
        _ => "UNKNOWN",
    }
}

/// Reads a shader source file. A file that cannot be read is logged and yields an empty source,
/// which the compiler then rejects.
fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            log::error!("failed to read shader file {}: {}", path.display(), e);
            String::new()
        }
    }
}

fn compile_stage(gl: &Arc<glow::Context>, shader_type: u32, path: &Path) -> Option<Shader> {
    let source = read_source(path);
    match Shader::new(gl, shader_type, &source) {
        Ok(shader) => Some(shader),
        Err(info_log) => {
            log::error!(
                "{} shader compilation failed ({}):\n{}",
                stage_name(shader_type),
                path.display(),
                info_log.trim_end()
            );
            None
        }
    }
}

/// Represents a uniform variable in a shader program.
///
/// Names without a location (misspelled or optimised out by the driver) are ignored.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for bool {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_i32(Some(&loc), *self as i32);
            }
        }
    }
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_i32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_f32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for Vec2 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_2_f32(Some(&loc), self.x, self.y);
            }
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_3_f32(Some(&loc), self.x, self.y, self.z);
            }
        }
    }
}

impl Uniform for Vec4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_4_f32(Some(&loc), self.x, self.y, self.z, self.w);
            }
        }
    }
}

impl Uniform for Mat2 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_2_f32_slice(Some(&loc), false, &self.to_cols_array());
            }
        }
    }
}

impl Uniform for Mat3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_3_f32_slice(Some(&loc), false, &self.to_cols_array());
            }
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, self.as_ref());
            }
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        (*self).set_uniform(gl, program, name);
    }
}

/// Represents an OpenGL shader program linked from a vertex and a fragment stage.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Builds a program from a vertex and a fragment shader file.
    ///
    /// Read, compile and link failures are logged and the (possibly unusable) program is still
    /// returned so the render loop keeps running. Only failing to allocate the program object
    /// itself is an error.
    pub fn from_files(
        gl: &Arc<glow::Context>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, String> {
        let vertex_path = vertex_path.as_ref();
        let fragment_path = fragment_path.as_ref();
        let vert = compile_stage(gl, glow::VERTEX_SHADER, vertex_path);
        let frag = compile_stage(gl, glow::FRAGMENT_SHADER, fragment_path);
        let stages: Vec<&Shader> = vert.iter().chain(frag.iter()).collect();

        unsafe {
            let program = gl.create_program()?;

            for shader in &stages {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                log::error!(
                    "shader program linking failed ({}, {}):\n{}",
                    vertex_path.display(),
                    fragment_path.display(),
                    gl.get_program_info_log(program).trim_end()
                );
            } else {
                log::debug!(
                    "linked shader program from {} and {}",
                    vertex_path.display(),
                    fragment_path.display()
                );
            }

            for shader in &stages {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program.
    ///
    /// The location is looked up on every call.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&self.gl, self.id, name);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(stage_name(glow::VERTEX_SHADER), "VERTEX");
        assert_eq!(stage_name(glow::FRAGMENT_SHADER), "FRAGMENT");
        assert_eq!(stage_name(glow::GEOMETRY_SHADER), "UNKNOWN");
    }

    #[test]
    fn test_read_source_missing_file_is_empty() {
        let path = std::env::temp_dir().join("lightcube-no-such-shader.vert");
        let _ = std::fs::remove_file(&path);
        assert_eq!(read_source(&path), "");
    }

    #[test]
    fn test_read_source_reads_whole_file() {
        let path = std::env::temp_dir().join(format!(
            "lightcube-read-source-{}.frag",
            std::process::id()
        ));
        let source = "#version 330 core\nout vec4 color;\nvoid main() { color = vec4(1.0); }\n";
        std::fs::write(&path, source).unwrap();
        assert_eq!(read_source(&path), source);
        std::fs::remove_file(&path).unwrap();
    }
}
