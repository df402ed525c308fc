//! # Primitive Shape Generation
//!
//! Functions that generate the primitive shapes used to assemble figures.
//! All shapes are centred on the origin, Y-up, with outward-facing normals.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a box centred at the origin
///
/// # Arguments
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `depth` - Extent along Z
///
/// Each face gets its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let (hx, hy, hz) = (width * 0.5, height * 0.5, depth * 0.5);

    // (normal, four corners in counter-clockwise order seen from outside)
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // Front (+Z)
        ([0.0, 0.0, 1.0], [[-hx, -hy,  hz], [ hx, -hy,  hz], [ hx,  hy,  hz], [-hx,  hy,  hz]]),
        // Back (-Z)
        ([0.0, 0.0, -1.0], [[ hx, -hy, -hz], [-hx, -hy, -hz], [-hx,  hy, -hz], [ hx,  hy, -hz]]),
        // Left (-X)
        ([-1.0, 0.0, 0.0], [[-hx, -hy, -hz], [-hx, -hy,  hz], [-hx,  hy,  hz], [-hx,  hy, -hz]]),
        // Right (+X)
        ([1.0, 0.0, 0.0], [[ hx, -hy,  hz], [ hx, -hy, -hz], [ hx,  hy, -hz], [ hx,  hy,  hz]]),
        // Top (+Y)
        ([0.0, 1.0, 0.0], [[-hx,  hy,  hz], [ hx,  hy,  hz], [ hx,  hy, -hz], [-hx,  hy, -hz]]),
        // Bottom (-Y)
        ([0.0, -1.0, 0.0], [[-hx, -hy, -hz], [ hx, -hy, -hz], [ hx, -hy,  hz], [-hx, -hy,  hz]]),
    ];

    let mut data = GeometryData::new();
    for (normal, corners) in faces {
        let base = data.vertices.len() as u32;
        for corner in corners {
            data.vertices.push(corner);
            data.normals.push(normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere with specified radius and resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of longitude segments (at least 3)
/// * `height_segments` - Number of latitude segments (at least 2)
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = width_segments.max(3);
    let lat_segs = height_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            data.vertices
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            data.normals.push(normal);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices
                .extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let cube = generate_box(0.4, 0.54, 0.2);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_box_extents() {
        let bounds = generate_box(0.4, 0.54, 0.2).bounds();
        assert!((bounds.max.x - 0.2).abs() < 1e-6);
        assert!((bounds.min.y + 0.27).abs() < 1e-6);
        assert!((bounds.max.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_box_winding_faces_outward() {
        let cube = generate_box(1.0, 1.0, 1.0);
        for (tri, normal) in cube
            .indices
            .chunks_exact(3)
            .map(|tri| (tri, cube.normals[tri[0] as usize]))
        {
            let [a, b, c] = [
                cube.vertices[tri[0] as usize],
                cube.vertices[tri[1] as usize],
                cube.vertices[tri[2] as usize],
            ];
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let cross = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let dot = cross[0] * normal[0] + cross[1] * normal[1] + cross[2] * normal[2];
            assert!(dot > 0.0);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.15, 8, 6);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.triangle_count(), 8 * 6 * 2);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());

        for v in &sphere.vertices {
            let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((len - 0.15).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_clamps_segments() {
        let sphere = generate_sphere(1.0, 0, 0);
        assert_eq!(sphere.vertex_count(), 4 * 3);
    }
}
