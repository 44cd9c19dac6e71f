//! Mesh management module.
//!
//! This module defines the [`VertexBuffer`] and [`Mesh`] structs for managing vertex data on the
//! GPU side. Several meshes may read the same buffer through different [`VertexLayout`]s.

use std::{marker::PhantomData, rc::Rc, sync::Arc};

use glow::HasContext;

/// Trait that describes how a vertex buffer is read by a vertex array.
pub trait VertexLayout {
    /// The vertex type stored in the buffer.
    type Vertex;

    /// Sets up the vertex attribute pointers while the buffer is bound.
    fn vertex_attribs(gl: &glow::Context);
}

/// Vertex data uploaded once and never modified.
pub struct VertexBuffer<V> {
    gl: Arc<glow::Context>,
    vbo: glow::Buffer,
    vertex_count: usize,
    _vertex: PhantomData<V>,
}

impl<V: Copy> VertexBuffer<V> {
    /// Uploads the given vertices into a new static buffer.
    pub fn new(gl: &Arc<glow::Context>, vertices: &[V]) -> Result<Self, String> {
        unsafe {
            let vbo = gl.create_buffer()?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    std::mem::size_of_val(vertices),
                ),
                glow::STATIC_DRAW,
            );
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vbo,
                vertex_count: vertices.len(),
                _vertex: PhantomData,
            })
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

impl<V> Drop for VertexBuffer<V> {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
        }
    }
}

/// Represents a vertex array over a shared [`VertexBuffer`].
pub struct Mesh<V> {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    buffer: Rc<VertexBuffer<V>>,
}

impl<V: Copy> Mesh<V> {
    /// Creates a vertex array reading `buffer` as described by `L`.
    pub fn new<L: VertexLayout<Vertex = V>>(
        gl: &Arc<glow::Context>,
        buffer: &Rc<VertexBuffer<V>>,
    ) -> Result<Self, String> {
        unsafe {
            let vao = gl.create_vertex_array()?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer.vbo));

            L::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vao,
                buffer: Rc::clone(buffer),
            })
        }
    }

    /// Draws the whole buffer as a triangle list.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_arrays(glow::TRIANGLES, 0, self.buffer.vertex_count() as i32);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl<V> Drop for Mesh<V> {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
