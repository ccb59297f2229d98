// Scene meshes to GPU-ready vertex and index data

use super::scene::{Scene, SceneMesh};
use crate::animation::Skeleton;
use crate::error::{ModelError, Result};

/// Bone influences kept per vertex
pub const MAX_INFLUENCES: usize = 4;

/// Vertex with up to four bone influences.
///
/// A vertex whose weights are all zero is not bound to any bone.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub bone_indices: [u32; MAX_INFLUENCES],
    pub bone_weights: [f32; MAX_INFLUENCES],
}

impl SkinnedVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const F32X3: u64 = size_of::<[f32; 3]>() as u64;
        const F32X2: u64 = size_of::<[f32; 2]>() as u64;
        const U32X4: u64 = size_of::<[u32; 4]>() as u64;
        wgpu::VertexBufferLayout {
            array_stride: size_of::<SkinnedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: F32X3,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: F32X3 * 2,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: F32X3 * 2 + F32X2,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Uint32x4,
                },
                wgpu::VertexAttribute {
                    offset: F32X3 * 2 + F32X2 + U32X4,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Static geometry for one mesh
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<SkinnedVertex>,
    pub indices: Vec<u32>,
    pub index_format: wgpu::IndexFormat,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Indices encoded in `index_format`
    pub fn index_bytes(&self) -> Vec<u8> {
        match self.index_format {
            wgpu::IndexFormat::Uint16 => {
                let narrow: Vec<u16> = self.indices.iter().map(|&i| i as u16).collect();
                bytemuck::cast_slice(&narrow).to_vec()
            }
            wgpu::IndexFormat::Uint32 => bytemuck::cast_slice(&self.indices).to_vec(),
        }
    }
}

/// Build every mesh, writing bone offsets into the skeleton as they are found
pub fn build_meshes(scene: &Scene, skeleton: &mut Skeleton) -> Result<Vec<MeshData>> {
    scene
        .meshes
        .iter()
        .map(|mesh| build_mesh(mesh, skeleton))
        .collect()
}

pub fn build_mesh(mesh: &SceneMesh, skeleton: &mut Skeleton) -> Result<MeshData> {
    let invalid = |message: String| ModelError::InvalidMesh {
        mesh: mesh.name.clone(),
        message,
    };

    let vertex_count = mesh.positions.len();
    if !mesh.normals.is_empty() && mesh.normals.len() != vertex_count {
        return Err(invalid(format!(
            "{} normals for {vertex_count} vertices",
            mesh.normals.len()
        )));
    }
    if !mesh.tex_coords.is_empty() && mesh.tex_coords.len() != vertex_count {
        return Err(invalid(format!(
            "{} texture coordinates for {vertex_count} vertices",
            mesh.tex_coords.len()
        )));
    }
    if mesh.indices.len() % 3 != 0 {
        return Err(invalid(format!(
            "index count {} is not a triangle list",
            mesh.indices.len()
        )));
    }
    if let Some(&bad) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(invalid(format!("index {bad} out of {vertex_count} vertices")));
    }

    let mut influences: Vec<Vec<(u32, f32)>> = vec![Vec::new(); vertex_count];
    for scene_bone in &mesh.bones {
        let bone = skeleton
            .find_bone(&scene_bone.name)
            .ok_or_else(|| invalid(format!("bone '{}' has no skeleton node", scene_bone.name)))?;
        skeleton.set_offset_matrix(bone, scene_bone.offset_matrix())?;

        for weight in &scene_bone.weights {
            let slot = influences.get_mut(weight.vertex as usize).ok_or_else(|| {
                invalid(format!(
                    "bone '{}' weights missing vertex {}",
                    scene_bone.name, weight.vertex
                ))
            })?;
            if weight.weight > 0.0 {
                slot.push((bone as u32, weight.weight));
            }
        }
    }

    let vertices = (0..vertex_count)
        .map(|i| {
            let (bone_indices, bone_weights) = strongest_influences(&mut influences[i]);
            SkinnedVertex {
                position: mesh.positions[i],
                normal: mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                tex_coord: mesh.tex_coords.get(i).copied().unwrap_or_default(),
                bone_indices,
                bone_weights,
            }
        })
        .collect();

    let index_format = if vertex_count <= u16::MAX as usize + 1 {
        wgpu::IndexFormat::Uint16
    } else {
        wgpu::IndexFormat::Uint32
    };

    Ok(MeshData {
        name: mesh.name.clone(),
        vertices,
        indices: mesh.indices.clone(),
        index_format,
    })
}

/// Keep the heaviest influences and renormalize them to sum to one
fn strongest_influences(
    influences: &mut Vec<(u32, f32)>,
) -> ([u32; MAX_INFLUENCES], [f32; MAX_INFLUENCES]) {
    influences.sort_by(|a, b| b.1.total_cmp(&a.1));
    influences.truncate(MAX_INFLUENCES);

    let mut indices = [0u32; MAX_INFLUENCES];
    let mut weights = [0.0f32; MAX_INFLUENCES];
    let total: f32 = influences.iter().map(|(_, w)| w).sum();
    if total > 0.0 {
        for (slot, &(bone, weight)) in influences.iter().enumerate() {
            indices[slot] = bone;
            weights[slot] = weight / total;
        }
    }
    (indices, weights)
}
