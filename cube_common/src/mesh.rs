//! The one mesh every backend draws: a 2x2x2 cube around the origin, unindexed.

//////////////////////// Consts ///////////////////////
pub const CUBE_VERTEX_COUNT: usize = 36;

/// Six faces, two triangles each, counter-clockwise when seen from outside.
pub const CUBE_VERTICES: [CubeVertex; CUBE_VERTEX_COUNT] = [
    // +z
    CubeVertex::new([-1.0, -1.0, 1.0], [0.0, 0.0]),
    CubeVertex::new([1.0, -1.0, 1.0], [0.0, 1.0]),
    CubeVertex::new([1.0, 1.0, 1.0], [1.0, 1.0]),
    CubeVertex::new([-1.0, -1.0, 1.0], [0.0, 0.0]),
    CubeVertex::new([1.0, 1.0, 1.0], [1.0, 1.0]),
    CubeVertex::new([-1.0, 1.0, 1.0], [1.0, 0.0]),
    // +x
    CubeVertex::new([1.0, -1.0, 1.0], [0.0, 0.0]),
    CubeVertex::new([1.0, -1.0, -1.0], [0.0, 1.0]),
    CubeVertex::new([1.0, 1.0, -1.0], [1.0, 1.0]),
    CubeVertex::new([1.0, -1.0, 1.0], [0.0, 0.0]),
    CubeVertex::new([1.0, 1.0, -1.0], [1.0, 1.0]),
    CubeVertex::new([1.0, 1.0, 1.0], [1.0, 0.0]),
    // -z
    CubeVertex::new([1.0, -1.0, -1.0], [0.0, 0.0]),
    CubeVertex::new([-1.0, -1.0, -1.0], [0.0, 1.0]),
    CubeVertex::new([-1.0, 1.0, -1.0], [1.0, 1.0]),
    CubeVertex::new([1.0, -1.0, -1.0], [0.0, 0.0]),
    CubeVertex::new([-1.0, 1.0, -1.0], [1.0, 1.0]),
    CubeVertex::new([1.0, 1.0, -1.0], [1.0, 0.0]),
    // -x
    CubeVertex::new([-1.0, -1.0, -1.0], [0.0, 0.0]),
    CubeVertex::new([-1.0, -1.0, 1.0], [0.0, 1.0]),
    CubeVertex::new([-1.0, 1.0, 1.0], [1.0, 1.0]),
    CubeVertex::new([-1.0, -1.0, -1.0], [0.0, 0.0]),
    CubeVertex::new([-1.0, 1.0, 1.0], [1.0, 1.0]),
    CubeVertex::new([-1.0, 1.0, -1.0], [1.0, 0.0]),
    // +y
    CubeVertex::new([-1.0, 1.0, 1.0], [0.0, 0.0]),
    CubeVertex::new([1.0, 1.0, 1.0], [0.0, 1.0]),
    CubeVertex::new([1.0, 1.0, -1.0], [1.0, 1.0]),
    CubeVertex::new([-1.0, 1.0, 1.0], [0.0, 0.0]),
    CubeVertex::new([1.0, 1.0, -1.0], [1.0, 1.0]),
    CubeVertex::new([-1.0, 1.0, -1.0], [1.0, 0.0]),
    // -y
    CubeVertex::new([-1.0, -1.0, 1.0], [0.0, 0.0]),
    CubeVertex::new([-1.0, -1.0, -1.0], [0.0, 1.0]),
    CubeVertex::new([1.0, -1.0, -1.0], [1.0, 1.0]),
    CubeVertex::new([-1.0, -1.0, 1.0], [0.0, 0.0]),
    CubeVertex::new([1.0, -1.0, -1.0], [1.0, 1.0]),
    CubeVertex::new([1.0, -1.0, 1.0], [1.0, 0.0]),
];
//////////////////////// Structs ///////////////////////
/// Interleaved vertex as it sits in GPU memory: position at offset 0, uv at offset 12.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeVertex {
    pub pos: [f32; 3],
    pub tex_coord: [f32; 2],
}
//////////////////////// Impls ///////////////////////
impl CubeVertex {
    pub const fn new(pos: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self { pos, tex_coord }
    }
}
//////////////////////// Fns ///////////////////////
/// Size in bytes of the whole vertex array, which is what gets uploaded.
pub fn cube_vertices_byte_size() -> usize {
    std::mem::size_of_val(&CUBE_VERTICES)
}

/// Views the vertex array as raw bytes for APIs that take `&[u8]`.
pub fn cube_vertices_as_bytes() -> &'static [u8] {
    // CubeVertex is repr(C) and only made of f32s so it has no padding
    unsafe {
        std::slice::from_raw_parts(
            CUBE_VERTICES.as_ptr() as *const u8,
            cube_vertices_byte_size(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glm::Vec3;

    fn to_vec3(pos: [f32; 3]) -> Vec3 {
        Vec3::new(pos[0], pos[1], pos[2])
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<CubeVertex>(), 20);
        assert_eq!(cube_vertices_byte_size(), 36 * 20);
        assert_eq!(cube_vertices_as_bytes().len(), 720);
        let first_x = f32::from_ne_bytes([
            cube_vertices_as_bytes()[0],
            cube_vertices_as_bytes()[1],
            cube_vertices_as_bytes()[2],
            cube_vertices_as_bytes()[3],
        ]);
        assert_eq!(first_x, -1.0);
    }

    #[test]
    fn every_triangle_faces_outwards() {
        for triangle in CUBE_VERTICES.chunks(3) {
            let a = to_vec3(triangle[0].pos);
            let b = to_vec3(triangle[1].pos);
            let c = to_vec3(triangle[2].pos);
            let normal = glm::cross(&(b - a), &(c - a));
            let centroid = (a + b + c) / 3.0;
            assert!(
                glm::dot(&normal, &centroid) > 0.0,
                "triangle {:?} winds clockwise from outside",
                triangle
            );
        }
    }

    #[test]
    fn each_face_is_covered_by_two_triangles() {
        let mut per_axis = [0usize; 6];
        for triangle in CUBE_VERTICES.chunks(3) {
            let a = to_vec3(triangle[0].pos);
            let b = to_vec3(triangle[1].pos);
            let c = to_vec3(triangle[2].pos);
            let normal = glm::normalize(&glm::cross(&(b - a), &(c - a)));
            let axis = (0..3)
                .find(|&i| normal[i].abs() > 0.99)
                .expect("face normal is axis aligned");
            let slot = axis * 2 + if normal[axis] > 0.0 { 0 } else { 1 };
            per_axis[slot] += 1;
        }
        assert_eq!(per_axis, [2; 6]);
    }

    #[test]
    fn positions_and_uvs_stay_in_range() {
        for vertex in CUBE_VERTICES.iter() {
            assert!(vertex.pos.iter().all(|c| c.abs() == 1.0));
            assert!(vertex.tex_coord.iter().all(|c| *c == 0.0 || *c == 1.0));
        }
    }
}
