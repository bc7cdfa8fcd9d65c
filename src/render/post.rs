use super::helpers;
use super::targets::RenderTargets;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) blur_dir: [f32; 2],
    pub(crate) bloom_strength: f32,
    pub(crate) threshold: f32,
    pub(crate) exposure: f32,
    pub(crate) _pad: f32,
}

/// Bloom pipelines plus the bind groups that sample the current targets.
pub(crate) struct PostResources {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    uniform_buffers: [wgpu::Buffer; 4],
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    groups: Option<PostBindGroups>,
}

struct PostBindGroups {
    bright_from_hdr: wgpu::BindGroup,
    blur_h_from_a: wgpu::BindGroup,
    blur_v_from_b: wgpu::BindGroup,
    composite_hdr: wgpu::BindGroup,
    composite_bloom: wgpu::BindGroup,
}

// one uniform buffer per pass so each pass keeps its own blur direction
const PASS_BRIGHT: usize = 0;
const PASS_BLUR_H: usize = 1;
const PASS_BLUR_V: usize = 2;
const PASS_COMPOSITE: usize = 3;

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        bloom_format: wgpu::TextureFormat,
        swap_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(super::POST_WGSL.into()),
        });
        let [tex, sampler] = helpers::texture_layout_entries();
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                tex,
                sampler,
                helpers::uniform_layout_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &helpers::texture_layout_entries(),
        });
        let size = std::mem::size_of::<PostUniforms>();
        let uniform_buffers = [
            helpers::uniform_buffer(device, "post_bright", size),
            helpers::uniform_buffer(device, "post_blur_h", size),
            helpers::uniform_buffer(device, "post_blur_v", size),
            helpers::uniform_buffer(device, "post_composite", size),
        ];
        let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline = helpers::make_post_pipeline(
            device,
            &pl_single,
            &shader,
            "fs_bright",
            bloom_format,
            None,
        );
        let blur_pipeline =
            helpers::make_post_pipeline(device, &pl_single, &shader, "fs_blur", bloom_format, None);
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            &pl_composite,
            &shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );
        Self {
            bgl0,
            bgl1,
            uniform_buffers,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            groups: None,
        }
    }

    /// Rebuilds the bind groups that reference the (re)created targets.
    pub(crate) fn bind_targets(
        &mut self,
        device: &wgpu::Device,
        sampler: &wgpu::Sampler,
        targets: &RenderTargets,
    ) {
        let with_uniform = |label: &str, view: &wgpu::TextureView, pass: usize| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: self.uniform_buffers[pass].as_entire_binding(),
                    },
                ],
            })
        };
        let bright_from_hdr = with_uniform("bg_bright", &targets.hdr_view, PASS_BRIGHT);
        let blur_h_from_a = with_uniform("bg_blur_h", &targets.bloom_a_view, PASS_BLUR_H);
        let blur_v_from_b = with_uniform("bg_blur_v", &targets.bloom_b_view, PASS_BLUR_V);
        let composite_hdr = with_uniform("bg_composite", &targets.hdr_view, PASS_COMPOSITE);
        let composite_bloom = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: &self.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        self.groups = Some(PostBindGroups {
            bright_from_hdr,
            blur_h_from_a,
            blur_v_from_b,
            composite_hdr,
            composite_bloom,
        });
    }

    pub(crate) fn write_uniforms(
        &self,
        queue: &wgpu::Queue,
        bloom_resolution: [f32; 2],
        strength: f32,
        threshold: f32,
        exposure: f32,
    ) {
        let dirs = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        for (buffer, blur_dir) in self.uniform_buffers.iter().zip(dirs) {
            let u = PostUniforms {
                resolution: bloom_resolution,
                blur_dir,
                bloom_strength: strength,
                threshold,
                exposure,
                _pad: 0.0,
            };
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&u));
        }
    }

    /// Bright pass into bloom A, blur A->B->A, then composite to `output`.
    pub(crate) fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        output: &wgpu::TextureView,
    ) {
        let Some(g) = &self.groups else {
            return;
        };
        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &g.bright_from_hdr,
            None,
        );
        blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            &self.blur_pipeline,
            &g.blur_h_from_a,
            None,
        );
        blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            &self.blur_pipeline,
            &g.blur_v_from_b,
            None,
        );
        blit(
            encoder,
            "composite",
            output,
            &self.composite_pipeline,
            &g.composite_hdr,
            Some(&g.composite_bloom),
        );
    }
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
