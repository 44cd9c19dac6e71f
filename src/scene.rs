//! The fixed scene: cube geometry, object placement and the light rig.

use glam::{Mat4, Vec3};
use glow::HasContext;

use crate::{
    abs::{ShaderProgram, VertexLayout},
    camera::Camera,
};

/// A cube corner with its face normal and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const fn vertex(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> CubeVertex {
    CubeVertex {
        position,
        normal,
        uv,
    }
}

/// A unit cube centred on the origin as 12 counter-clockwise triangles.
#[rustfmt::skip]
pub const CUBE_VERTICES: [CubeVertex; 36] = [
    // back
    vertex([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
    vertex([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
    vertex([ 0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 0.0]),
    vertex([ 0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [1.0, 1.0]),
    vertex([-0.5, -0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 0.0]),
    vertex([-0.5,  0.5, -0.5], [ 0.0,  0.0, -1.0], [0.0, 1.0]),
    // front
    vertex([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
    vertex([ 0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 0.0]),
    vertex([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
    vertex([ 0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [1.0, 1.0]),
    vertex([-0.5,  0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 1.0]),
    vertex([-0.5, -0.5,  0.5], [ 0.0,  0.0,  1.0], [0.0, 0.0]),
    // left
    vertex([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
    vertex([-0.5,  0.5, -0.5], [-1.0,  0.0,  0.0], [1.0, 1.0]),
    vertex([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
    vertex([-0.5, -0.5, -0.5], [-1.0,  0.0,  0.0], [0.0, 1.0]),
    vertex([-0.5, -0.5,  0.5], [-1.0,  0.0,  0.0], [0.0, 0.0]),
    vertex([-0.5,  0.5,  0.5], [-1.0,  0.0,  0.0], [1.0, 0.0]),
    // right
    vertex([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
    vertex([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
    vertex([ 0.5,  0.5, -0.5], [ 1.0,  0.0,  0.0], [1.0, 1.0]),
    vertex([ 0.5, -0.5, -0.5], [ 1.0,  0.0,  0.0], [0.0, 1.0]),
    vertex([ 0.5,  0.5,  0.5], [ 1.0,  0.0,  0.0], [1.0, 0.0]),
    vertex([ 0.5, -0.5,  0.5], [ 1.0,  0.0,  0.0], [0.0, 0.0]),
    // bottom
    vertex([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
    vertex([ 0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [1.0, 1.0]),
    vertex([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
    vertex([ 0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [1.0, 0.0]),
    vertex([-0.5, -0.5,  0.5], [ 0.0, -1.0,  0.0], [0.0, 0.0]),
    vertex([-0.5, -0.5, -0.5], [ 0.0, -1.0,  0.0], [0.0, 1.0]),
    // top
    vertex([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
    vertex([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
    vertex([ 0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [1.0, 1.0]),
    vertex([ 0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [1.0, 0.0]),
    vertex([-0.5,  0.5, -0.5], [ 0.0,  1.0,  0.0], [0.0, 1.0]),
    vertex([-0.5,  0.5,  0.5], [ 0.0,  1.0,  0.0], [0.0, 0.0]),
];

pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

pub const POINT_LIGHT_POSITIONS: [Vec3; 4] = [
    Vec3::new(0.7, 0.2, 2.0),
    Vec3::new(2.3, -3.3, -4.0),
    Vec3::new(-4.0, 2.0, -12.0),
    Vec3::new(0.0, 0.0, -3.0),
];

const LAMP_SCALE: f32 = 0.2;

/// Model matrix of the `index`th textured cube; each one is tilted a little further.
pub fn cube_model(index: usize) -> Mat4 {
    let angle = (20.0 * index as f32).to_radians();
    Mat4::from_translation(CUBE_POSITIONS[index])
        * Mat4::from_axis_angle(Vec3::new(1.0, 0.3, 0.5).normalize(), angle)
}

pub fn lamp_model(position: Vec3) -> Mat4 {
    Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(LAMP_SCALE))
}

const STRIDE: i32 = std::mem::size_of::<CubeVertex>() as i32;
const FLOAT_SIZE: i32 = std::mem::size_of::<f32>() as i32;

/// Reads position, normal and texture coordinate for the lit cubes.
pub struct LitLayout;

impl VertexLayout for LitLayout {
    type Vertex = CubeVertex;

    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, STRIDE, 0);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, STRIDE, 3 * FLOAT_SIZE);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(2, 2, glow::FLOAT, false, STRIDE, 6 * FLOAT_SIZE);
            gl.enable_vertex_attrib_array(2);
        }
    }
}

/// Reads only positions, for the unlit lamp cubes.
pub struct LampLayout;

impl VertexLayout for LampLayout {
    type Vertex = CubeVertex;

    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, STRIDE, 0);
            gl.enable_vertex_attrib_array(0);
        }
    }
}

/// Ambient, diffuse and specular intensities shared by every light kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightColor {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightColor {
    /// Derives the three terms from a base colour, the usual 0.05 / 0.8 / 1.0 split.
    pub fn from_base(color: Vec3) -> Self {
        Self {
            ambient: color * 0.05,
            diffuse: color * 0.8,
            specular: color,
        }
    }

    fn apply(&self, program: &ShaderProgram, name: &str) {
        program.set_uniform(&format!("{name}.ambient"), self.ambient);
        program.set_uniform(&format!("{name}.diffuse"), self.diffuse);
        program.set_uniform(&format!("{name}.specular"), self.specular);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: LightColor,
}

impl DirectionalLight {
    pub fn apply(&self, program: &ShaderProgram, name: &str) {
        program.set_uniform(&format!("{name}.direction"), self.direction);
        self.color.apply(program, name);
    }
}

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Coefficients covering roughly 50 units.
    pub const RANGE_50: Self = Self {
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
    };

    #[cfg(test)]
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }

    fn apply(&self, program: &ShaderProgram, name: &str) {
        program.set_uniform(&format!("{name}.constant"), self.constant);
        program.set_uniform(&format!("{name}.linear"), self.linear);
        program.set_uniform(&format!("{name}.quadratic"), self.quadratic);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: LightColor,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn apply(&self, program: &ShaderProgram, name: &str) {
        program.set_uniform(&format!("{name}.position"), self.position);
        self.color.apply(program, name);
        self.attenuation.apply(program, name);
    }
}

/// A cone of light; the edge fades between the inner and outer cut-off angles (degrees).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub inner_cutoff: f32,
    pub outer_cutoff: f32,
    pub color: LightColor,
    pub attenuation: Attenuation,
}

impl SpotLight {
    /// Points the light from the camera along its view direction.
    pub fn follow(&mut self, camera: &Camera) {
        self.position = camera.position();
        self.direction = camera.front();
    }

    pub fn apply(&self, program: &ShaderProgram, name: &str) {
        program.set_uniform(&format!("{name}.position"), self.position);
        program.set_uniform(&format!("{name}.direction"), self.direction);
        program.set_uniform(&format!("{name}.cut_off"), self.inner_cutoff.to_radians().cos());
        program.set_uniform(
            &format!("{name}.outer_cut_off"),
            self.outer_cutoff.to_radians().cos(),
        );
        self.color.apply(program, name);
        self.attenuation.apply(program, name);
    }
}

/// Uniform name of the `index`th element of the point light array.
pub fn point_light_name(index: usize) -> String {
    format!("point_lights[{index}]")
}

/// Every light in the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    pub directional: DirectionalLight,
    pub points: [PointLight; 4],
    pub spot: SpotLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            directional: DirectionalLight {
                direction: Vec3::new(-0.2, -1.0, -0.3),
                color: LightColor {
                    ambient: Vec3::splat(0.05),
                    diffuse: Vec3::splat(0.4),
                    specular: Vec3::splat(0.5),
                },
            },
            points: POINT_LIGHT_POSITIONS.map(|position| PointLight {
                position,
                color: LightColor::from_base(Vec3::ONE),
                attenuation: Attenuation::RANGE_50,
            }),
            spot: SpotLight {
                position: Vec3::ZERO,
                direction: Vec3::NEG_Z,
                inner_cutoff: 12.5,
                outer_cutoff: 15.0,
                color: LightColor {
                    ambient: Vec3::ZERO,
                    diffuse: Vec3::ONE,
                    specular: Vec3::ONE,
                },
                attenuation: Attenuation::RANGE_50,
            },
        }
    }
}

impl LightRig {
    /// Uploads every light into the object program, which must be in use.
    pub fn apply(&self, program: &ShaderProgram) {
        self.directional.apply(program, "dir_light");
        for (i, light) in self.points.iter().enumerate() {
            light.apply(program, &point_light_name(i));
        }
        self.spot.apply(program, "spot_light");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_unit_normals_and_bounded_corners() {
        assert_eq!(CUBE_VERTICES.len(), 36);
        for v in CUBE_VERTICES {
            let normal = Vec3::from(v.normal);
            assert!((normal.length() - 1.0).abs() < 1e-6);
            for c in v.position {
                assert_eq!(c.abs(), 0.5);
            }
            for t in v.uv {
                assert!(t == 0.0 || t == 1.0);
            }
        }
    }

    #[test]
    fn test_cube_triangles_face_outwards() {
        for triangle in CUBE_VERTICES.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from(triangle[i].position));
            let winding = (b - a).cross(c - a).normalize();
            let normal = Vec3::from(triangle[0].normal);
            assert!(winding.abs_diff_eq(normal, 1e-6), "{winding} vs {normal}");
            // Every corner of a face sits on the plane the normal points to.
            for p in [a, b, c] {
                assert_eq!(p.dot(normal), 0.5);
            }
        }
    }

    #[test]
    fn test_vertex_layout_is_packed() {
        assert_eq!(STRIDE, 8 * FLOAT_SIZE);
    }

    #[test]
    fn test_cube_models() {
        assert_eq!(cube_model(0), Mat4::IDENTITY);
        let moved = cube_model(3).transform_point3(Vec3::ZERO);
        assert!(moved.abs_diff_eq(CUBE_POSITIONS[3], 1e-6));
    }

    #[test]
    fn test_lamp_model_shrinks_cube() {
        let model = lamp_model(Vec3::new(1.0, 2.0, 3.0));
        let corner = model.transform_point3(Vec3::splat(0.5));
        assert!(corner.abs_diff_eq(Vec3::new(1.1, 2.1, 3.1), 1e-6));
    }

    #[test]
    fn test_point_light_names() {
        assert_eq!(point_light_name(0), "point_lights[0]");
        assert_eq!(point_light_name(3), "point_lights[3]");
    }

    #[test]
    fn test_attenuation_falls_off() {
        let att = Attenuation::RANGE_50;
        assert_eq!(att.factor(0.0), 1.0);
        assert!(att.factor(10.0) < att.factor(1.0));
        assert!(att.factor(50.0) < 0.02);
    }

    #[test]
    fn test_spot_light_follows_camera() {
        let mut rig = LightRig::default();
        let camera = Camera::new(Vec3::new(1.0, 0.0, -3.0), Vec3::Y, 90.0, 0.0);
        rig.spot.follow(&camera);
        assert_eq!(rig.spot.position, camera.position());
        assert_eq!(rig.spot.direction, camera.front());
        assert!(rig.spot.inner_cutoff < rig.spot.outer_cutoff);
    }

    #[test]
    fn test_point_lights_sit_at_lamp_positions() {
        let rig = LightRig::default();
        for (light, position) in rig.points.iter().zip(POINT_LIGHT_POSITIONS) {
            assert_eq!(light.position, position);
        }
    }
}
