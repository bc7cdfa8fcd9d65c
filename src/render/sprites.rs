use fnv::FnvHashMap;
use starpath_core::{
    BillboardInstance, Camera, CloudLayer, DrawList, PointCloud, StarVertex, TextureSlot,
};

use super::helpers;
use super::targets::HDR_FORMAT;
use crate::constants::INITIAL_INSTANCE_CAPACITY;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
    right: [f32; 4],
    up: [f32; 4],
    params: [f32; 4], // x = tan(fovy / 2)
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CloudUniforms {
    model: [[f32; 4]; 4],
    params: [f32; 4], // x = point size, y = opacity
}

/// An uploaded static star layer.
struct CloudBuffers {
    vertices: wgpu::Buffer,
    count: u32,
    texture: TextureSlot,
    point_size: f32,
    opacity: f32,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

const BILLBOARD_ATTRIBUTES: [wgpu::VertexAttribute; 5] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 12,
        shader_location: 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 16,
        shader_location: 2,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 24,
        shader_location: 3,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 32,
        shader_location: 4,
    },
];

const STAR_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

// premultiplied by the fragment shader, so both factors are One
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Instanced sprite passes into the HDR target: star layers first, then the
/// sorted billboards.
pub(crate) struct SpriteRenderer {
    billboard_pipeline: wgpu::RenderPipeline,
    cloud_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    cloud_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: FnvHashMap<TextureSlot, (wgpu::Texture, wgpu::BindGroup)>,
    clouds: FnvHashMap<CloudLayer, CloudBuffers>,
    instances: wgpu::Buffer,
    instance_capacity: usize,
}

impl SpriteRenderer {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprites_shader"),
            source: wgpu::ShaderSource::Wgsl(super::SPRITES_WGSL.into()),
        });
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_camera_bgl"),
            entries: &[helpers::uniform_layout_entry(0, wgpu::ShaderStages::VERTEX)],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_texture_bgl"),
            entries: &helpers::texture_layout_entries(),
        });
        let cloud_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_cloud_bgl"),
            entries: &[helpers::uniform_layout_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let camera_buffer =
            helpers::uniform_buffer(device, "sprite_camera", std::mem::size_of::<CameraUniforms>());
        let camera_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_camera_bg"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let billboard_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_billboards"),
            bind_group_layouts: &[&camera_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let cloud_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_clouds"),
            bind_group_layouts: &[&camera_layout, &texture_layout, &cloud_layout],
            push_constant_ranges: &[],
        });
        let billboard_pipeline = sprite_pipeline(
            device,
            &billboard_layout,
            &shader,
            "vs_billboard",
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<BillboardInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &BILLBOARD_ATTRIBUTES,
            },
        );
        let cloud_pipeline = sprite_pipeline(
            device,
            &cloud_pipeline_layout,
            &shader,
            "vs_cloud",
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<StarVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &STAR_ATTRIBUTES,
            },
        );

        Self {
            billboard_pipeline,
            cloud_pipeline,
            camera_buffer,
            camera_group,
            texture_layout,
            cloud_layout,
            sampler: helpers::linear_sampler(device, "sprite_sampler"),
            textures: FnvHashMap::default(),
            clouds: FnvHashMap::default(),
            instances: instance_buffer(device, INITIAL_INSTANCE_CAPACITY),
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
        }
    }

    pub(crate) fn upload_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: TextureSlot,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) {
        let label = format!("{slot:?}");
        let (texture, view) = helpers::upload_rgba_texture(device, queue, &label, width, height, rgba);
        let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&label),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        if let Some((old, _)) = self.textures.insert(slot, (texture, group)) {
            old.destroy();
        }
    }

    /// Uploads a static star layer, replacing and freeing any previous one.
    pub(crate) fn upload_cloud(&mut self, device: &wgpu::Device, cloud: &PointCloud) {
        use wgpu::util::DeviceExt;

        if let Some(old) = self.clouds.remove(&cloud.layer) {
            old.vertices.destroy();
            old.uniforms.destroy();
        }
        if cloud.is_empty() {
            return;
        }
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star_cloud"),
            contents: bytemuck::cast_slice(&cloud.stars),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniforms =
            helpers::uniform_buffer(device, "star_cloud_uniforms", std::mem::size_of::<CloudUniforms>());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("star_cloud_bg"),
            layout: &self.cloud_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        log::info!("[render] uploaded {:?} layer: {} stars", cloud.layer, cloud.len());
        self.clouds.insert(
            cloud.layer,
            CloudBuffers {
                vertices,
                count: cloud.len() as u32,
                texture: cloud.texture,
                point_size: cloud.point_size,
                opacity: cloud.opacity,
                uniforms,
                bind_group,
            },
        );
    }

    /// Writes this frame's uniforms and instances. Must run before `draw`.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
        list: &DrawList,
    ) {
        let cam = CameraUniforms {
            view_proj: camera.view_projection().to_cols_array_2d(),
            right: camera.right().extend(0.0).to_array(),
            up: camera.true_up().extend(0.0).to_array(),
            params: [(camera.fovy_radians * 0.5).tan(), 0.0, 0.0, 0.0],
        };
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&cam));

        for draw in &list.clouds {
            if let Some(cloud) = self.clouds.get(&draw.layer) {
                let u = CloudUniforms {
                    model: draw.model.to_cols_array_2d(),
                    params: [cloud.point_size, cloud.opacity, 0.0, 0.0],
                };
                queue.write_buffer(&cloud.uniforms, 0, bytemuck::bytes_of(&u));
            }
        }

        let instances = list.instances();
        if instances.len() > self.instance_capacity {
            let capacity = instances.len().next_power_of_two();
            self.instances.destroy();
            self.instances = instance_buffer(device, capacity);
            self.instance_capacity = capacity;
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instances, 0, bytemuck::cast_slice(&instances));
        }
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, list: &DrawList) {
        pass.set_bind_group(0, &self.camera_group, &[]);

        pass.set_pipeline(&self.cloud_pipeline);
        for draw in &list.clouds {
            let Some(cloud) = self.clouds.get(&draw.layer) else {
                continue;
            };
            let Some((_, texture)) = self.textures.get(&cloud.texture) else {
                continue;
            };
            pass.set_bind_group(1, texture, &[]);
            pass.set_bind_group(2, &cloud.bind_group, &[]);
            pass.set_vertex_buffer(0, cloud.vertices.slice(..));
            pass.draw(0..6, 0..cloud.count);
        }

        if list.billboards.is_empty() {
            return;
        }
        pass.set_pipeline(&self.billboard_pipeline);
        pass.set_vertex_buffer(0, self.instances.slice(..));
        for (slot, start, count) in list.texture_runs() {
            // sprites wait for their texture
            let Some((_, texture)) = self.textures.get(&slot) else {
                continue;
            };
            pass.set_bind_group(1, texture, &[]);
            pass.draw(0..6, start..start + count);
        }
    }
}

fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("billboard_instances"),
        size: (capacity.max(1) * std::mem::size_of::<BillboardInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn sprite_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vs_entry: &str,
    buffer: wgpu::VertexBufferLayout<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(vs_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers: &[buffer],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_sprite"),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: Some(ADDITIVE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}
