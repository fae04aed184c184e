use glam::{Mat3, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::assets::TextureImage;
use crate::geometry::{MeshData, Vertex};
use crate::render::{DrawState, shading};

use super::sampler::sample_linear;
use super::target::Target;

/// Vertex-stage output.
#[derive(Debug, Copy, Clone)]
struct ClipVertex {
    clip: Vec4,
    normal: Vec3,
    uv: Vec2,
}

impl ClipVertex {
    fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            clip: self.clip.lerp(other.clip, t),
            normal: self.normal.lerp(other.normal, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }
}

/// Vertex after perspective divide and viewport mapping.
#[derive(Debug, Copy, Clone)]
struct ScreenVertex {
    /// Window coordinates, origin bottom-left, pixel centers at `.5`.
    pos: Vec2,
    depth: f32,
    inv_w: f32,
    normal: Vec3,
    uv: Vec2,
}

/// Per-draw fragment inputs.
struct Fragment<'a> {
    state: &'a DrawState,
    decal: Option<&'a TextureImage>,
}

impl Fragment<'_> {
    fn shade(&self, normal: Vec3, uv: Vec2) -> Vec4 {
        let decal = self.decal.map(|tex| sample_linear(tex, uv));
        shading::fragment(self.state.color.to_vec3(), decal, normal, self.state.light_dir)
    }
}

/// Runs one draw: vertex stage, near-plane clipping, rasterization, depth
/// test, shading and blending.
pub(super) fn draw(target: &mut Target, state: &DrawState, geometry: &MeshData, decal: Option<&TextureImage>) {
    let normal_matrix = Mat3::from_mat4(state.model);
    let vertex_stage = |v: &Vertex| ClipVertex {
        clip: state.mvp * Vec3::from(v.position).extend(1.0),
        normal: normal_matrix * Vec3::from(v.normal),
        uv: Vec2::from(v.uv),
    };
    let clip: Vec<ClipVertex> = geometry.vertices.iter().map(vertex_stage).collect();
    let fragment = Fragment { state, decal };

    match &geometry.indices {
        Some(indices) => {
            for tri in indices.chunks_exact(3) {
                let (Some(&a), Some(&b), Some(&c)) =
                    (clip.get(tri[0] as usize), clip.get(tri[1] as usize), clip.get(tri[2] as usize))
                else {
                    continue;
                };
                draw_triangle(target, &fragment, [a, b, c]);
            }
        }
        None => {
            for tri in clip.chunks_exact(3) {
                draw_triangle(target, &fragment, [tri[0], tri[1], tri[2]]);
            }
        }
    }
}

fn draw_triangle(target: &mut Target, fragment: &Fragment<'_>, tri: [ClipVertex; 3]) {
    let clipped = clip_near(tri);
    if clipped.len() < 3 {
        return;
    }
    let screen: Vec<ScreenVertex> = clipped.iter().map(|v| to_screen(target, v)).collect();
    for i in 1..screen.len() - 1 {
        raster_triangle(target, fragment, [screen[0], screen[i], screen[i + 1]]);
    }
}

/// Sutherland–Hodgman against the near plane (`z >= 0` in `[0, 1]` depth clip space).
fn clip_near(tri: [ClipVertex; 3]) -> Vec<ClipVertex> {
    let mut out = Vec::with_capacity(4);
    for i in 0..3 {
        let cur = tri[i];
        let next = tri[(i + 1) % 3];
        let (dc, dn) = (cur.clip.z, next.clip.z);
        if dc >= 0.0 {
            out.push(cur);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            out.push(cur.lerp(next, dc / (dc - dn)));
        }
    }
    out
}

fn to_screen(target: &Target, v: &ClipVertex) -> ScreenVertex {
    let inv_w = 1.0 / v.clip.w;
    let ndc = v.clip.xyz() * inv_w;
    ScreenVertex {
        pos: Vec2::new(
            (ndc.x * 0.5 + 0.5) * target.width() as f32,
            (ndc.y * 0.5 + 0.5) * target.height() as f32,
        ),
        depth: ndc.z,
        inv_w,
        normal: v.normal,
        uv: v.uv,
    }
}

/// Signed doubled area of `(a, b, p)`; positive when `p` is left of `a → b`.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Top-left fill rule for a counter-clockwise triangle in a +Y-up window:
/// a sample exactly on an edge belongs to the triangle only if the edge is a
/// left edge (heading down) or a top edge (horizontal, heading left). Shared
/// edges are therefore drawn exactly once.
#[inline]
fn covers(w: f32, a: Vec2, b: Vec2) -> bool {
    w > 0.0 || (w == 0.0 && (b.y < a.y || (b.y == a.y && b.x < a.x)))
}

fn raster_triangle(target: &mut Target, fragment: &Fragment<'_>, tri: [ScreenVertex; 3]) {
    let [v0, mut v1, mut v2] = tri;
    let mut area = edge(v0.pos, v1.pos, v2.pos);
    if !area.is_finite() || area == 0.0 {
        return;
    }
    if area < 0.0 {
        std::mem::swap(&mut v1, &mut v2);
        area = -area;
    }

    let (w, h) = (target.width() as f32, target.height() as f32);
    let min = v0.pos.min(v1.pos).min(v2.pos);
    let max = v0.pos.max(v1.pos).max(v2.pos);
    if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
        return;
    }
    let x0 = min.x.floor().max(0.0) as u32;
    let y0 = min.y.floor().max(0.0) as u32;
    let x1 = (max.x.ceil() as u32).min(target.width() - 1);
    let y1 = (max.y.ceil() as u32).min(target.height() - 1);

    let depth_mode = fragment.state.depth;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(v1.pos, v2.pos, p);
            let w1 = edge(v2.pos, v0.pos, p);
            let w2 = edge(v0.pos, v1.pos, p);
            if !(covers(w0, v1.pos, v2.pos) && covers(w1, v2.pos, v0.pos) && covers(w2, v0.pos, v1.pos)) {
                continue;
            }

            let (b0, b1, b2) = (w0 / area, w1 / area, w2 / area);
            let z = b0 * v0.depth + b1 * v1.depth + b2 * v2.depth;
            if !(0.0..=1.0).contains(&z) {
                continue;
            }

            let i = target.index(x, y);
            if !depth_mode.passes(z, target.depth_at(i)) {
                continue;
            }

            // Perspective-correct attribute weights.
            let (q0, q1, q2) = (b0 * v0.inv_w, b1 * v1.inv_w, b2 * v2.inv_w);
            let q = q0 + q1 + q2;
            if q == 0.0 || !q.is_finite() {
                continue;
            }
            let (q0, q1, q2) = (q0 / q, q1 / q, q2 / q);
            let normal = v0.normal * q0 + v1.normal * q1 + v2.normal * q2;
            let uv = v0.uv * q0 + v1.uv * q1 + v2.uv * q2;

            let src = fragment.shade(normal, uv).clamp(Vec4::ZERO, Vec4::ONE);
            let out = shading::blend_over(src, target.color_at(i));
            target.set_color(i, out);
            if depth_mode.writes_depth() {
                target.set_depth(i, z);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cv(x: f32, y: f32, z: f32, w: f32) -> ClipVertex {
        ClipVertex { clip: Vec4::new(x, y, z, w), normal: Vec3::Z, uv: Vec2::ZERO }
    }

    #[test]
    fn triangle_in_front_is_not_clipped() {
        let out = clip_near([cv(0.0, 0.0, 0.5, 1.0), cv(1.0, 0.0, 0.5, 1.0), cv(0.0, 1.0, 0.5, 1.0)]);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn triangle_behind_is_dropped() {
        let out = clip_near([cv(0.0, 0.0, -0.5, 1.0), cv(1.0, 0.0, -0.5, 1.0), cv(0.0, 1.0, -0.1, 1.0)]);
        assert!(out.is_empty());
    }

    #[test]
    fn straddling_triangle_becomes_quad() {
        let out = clip_near([cv(0.0, 0.0, -1.0, 1.0), cv(1.0, 0.0, 1.0, 1.0), cv(0.0, 1.0, 1.0, 1.0)]);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|v| v.clip.z >= -1e-6));
    }

    #[test]
    fn shared_edge_pixels_are_owned_once() {
        // Two triangles splitting a square along its diagonal.
        let (a, b, c, d) = (Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(4.0, 4.0), Vec2::new(0.0, 4.0));
        for y in 0..4 {
            for x in 0..4 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let in_first = covers(edge(b, c, p), b, c) && covers(edge(c, a, p), c, a) && covers(edge(a, b, p), a, b);
                let in_second = covers(edge(c, d, p), c, d) && covers(edge(d, a, p), d, a) && covers(edge(a, c, p), a, c);
                assert!(in_first ^ in_second, "pixel ({x}, {y}) covered {} times", in_first as u8 + in_second as u8);
            }
        }
    }
}
