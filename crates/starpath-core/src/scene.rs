//! Declarative draw requests handed to the renderer each frame.
//!
//! Nothing here knows about the GPU; the layouts are `Pod` so the web
//! renderer can upload them directly.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Star,
    BackgroundStar,
}

/// How a billboard is oriented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Camera,
    /// World-aligned plane in XY.
    Fixed,
}

#[derive(Clone, Copy, Debug)]
pub struct Billboard {
    pub position: Vec3,
    pub size: Vec2,
    pub color: [f32; 3],
    pub opacity: f32,
    pub rotation: f32,
    pub texture: TextureSlot,
    pub facing: Facing,
    pub render_order: i32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct BillboardInstance {
    pub position: [f32; 3],
    pub rotation: f32,
    pub size: [f32; 2],
    pub facing: f32, // 1 = camera facing, 0 = fixed plane
    pub _pad: f32,
    pub color: [f32; 4],
}

impl Billboard {
    pub fn instance(&self) -> BillboardInstance {
        BillboardInstance {
            position: self.position.to_array(),
            rotation: self.rotation,
            size: self.size.to_array(),
            facing: match self.facing {
                Facing::Camera => 1.0,
                Facing::Fixed => 0.0,
            },
            _pad: 0.0,
            color: [self.color[0], self.color[1], self.color[2], self.opacity],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloudLayer {
    Galaxy,
    Parallax,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct StarVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Static star layer, uploaded once and drawn every frame.
#[derive(Clone, Debug)]
pub struct PointCloud {
    pub layer: CloudLayer,
    pub stars: Vec<StarVertex>,
    pub point_size: f32,
    pub opacity: f32,
    pub texture: TextureSlot,
    pub render_order: i32,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

/// Per-frame placement of an uploaded cloud.
#[derive(Clone, Copy, Debug)]
pub struct CloudDraw {
    pub layer: CloudLayer,
    pub model: Mat4,
}

#[derive(Clone, Debug, Default)]
pub struct DrawList {
    pub clouds: SmallVec<[CloudDraw; 2]>,
    pub billboards: Vec<Billboard>,
}

impl DrawList {
    /// Stable sort so equal orders keep submission order.
    pub fn sort(&mut self) {
        self.billboards.sort_by_key(|b| b.render_order);
    }

    pub fn instances(&self) -> Vec<BillboardInstance> {
        self.billboards.iter().map(Billboard::instance).collect()
    }

    /// Consecutive runs of billboards sharing a texture, as
    /// `(texture, start, count)` into `billboards`.
    pub fn texture_runs(&self) -> SmallVec<[(TextureSlot, u32, u32); 4]> {
        let mut runs: SmallVec<[(TextureSlot, u32, u32); 4]> = SmallVec::new();
        for (i, b) in self.billboards.iter().enumerate() {
            match runs.last_mut() {
                Some((slot, _, count)) if *slot == b.texture => *count += 1,
                _ => runs.push((b.texture, i as u32, 1)),
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billboard(order: i32, texture: TextureSlot) -> Billboard {
        Billboard {
            position: Vec3::ZERO,
            size: Vec2::ONE,
            color: [1.0; 3],
            opacity: 1.0,
            rotation: 0.0,
            texture,
            facing: Facing::Camera,
            render_order: order,
        }
    }

    #[test]
    fn instance_layout_is_48_bytes() {
        assert_eq!(std::mem::size_of::<BillboardInstance>(), 48);
        assert_eq!(std::mem::size_of::<StarVertex>(), 24);
    }

    #[test]
    fn sorting_groups_runs_by_texture() {
        let mut list = DrawList::default();
        list.billboards.push(billboard(999, TextureSlot::Star));
        list.billboards.push(billboard(0, TextureSlot::Star));
        list.billboards.push(billboard(5, TextureSlot::BackgroundStar));
        list.billboards.push(billboard(998, TextureSlot::Star));
        list.sort();
        let orders: Vec<i32> = list.billboards.iter().map(|b| b.render_order).collect();
        assert_eq!(orders, vec![0, 5, 998, 999]);
        let runs = list.texture_runs();
        assert_eq!(
            runs.as_slice(),
            &[
                (TextureSlot::Star, 0, 1),
                (TextureSlot::BackgroundStar, 1, 1),
                (TextureSlot::Star, 2, 2)
            ]
        );
    }

    #[test]
    fn fixed_planes_flag_their_facing() {
        let mut b = billboard(0, TextureSlot::Star);
        b.facing = Facing::Fixed;
        b.opacity = 0.75;
        let inst = b.instance();
        assert_eq!(inst.facing, 0.0);
        assert_eq!(inst.color[3], 0.75);
    }
}
