//! Scene assembly

use accelerators::*;
use radiotrace_core::error::*;
use radiotrace_core::geometry::*;
use radiotrace_core::interaction::*;
use radiotrace_core::primitive::*;
use shapes::*;
use std::sync::Arc;

/// Places one mesh in the world.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InstanceDesc {
    /// Index of the mesh in `SceneDescription::meshes`.
    pub mesh: usize,

    /// Object to world transform.
    pub transform: Transform,
}

/// Meshes and their placements. When no instances are given every mesh is
/// placed once with the identity transform.
#[derive(Clone, Debug, Default)]
pub struct SceneDescription {
    /// The meshes.
    pub meshes: Vec<TriangleMesh>,

    /// The placements.
    pub instances: Vec<InstanceDesc>,
}

impl SceneDescription {
    /// Add a mesh and return its index.
    ///
    /// * `mesh` - The mesh.
    pub fn add_mesh(&mut self, mesh: TriangleMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Place a mesh in the world.
    ///
    /// * `mesh`      - Index of the mesh.
    /// * `transform` - Object to world transform.
    pub fn add_instance(&mut self, mesh: usize, transform: Transform) {
        self.instances.push(InstanceDesc { mesh, transform });
    }
}

/// The traceable scene: one BVH per mesh, instanced into a single TLAS.
pub struct Tracer {
    /// Top level structure over all instances.
    tlas: TLAS<Triangle>,

    /// Number of distinct meshes.
    n_meshes: usize,
}

impl Tracer {
    /// Build the acceleration structures for a scene.
    ///
    /// * `scene` - The scene description.
    pub fn new(scene: &SceneDescription) -> Result<Self, TracerError> {
        let mut bvhs: Vec<Arc<BVH<Triangle>>> = Vec::with_capacity(scene.meshes.len());
        for mesh in scene.meshes.iter() {
            mesh.validate()?;
            debug!("Building BVH for {:?}", mesh);
            bvhs.push(Arc::new(BVH::new(mesh.triangles())));
        }

        let instances = if scene.instances.is_empty() {
            bvhs.iter()
                .map(|bvh| BVHInstance::new(Arc::clone(bvh), Transform::default()))
                .collect()
        } else {
            scene
                .instances
                .iter()
                .enumerate()
                .map(|(i, desc)| {
                    bvhs.get(desc.mesh)
                        .map(|bvh| BVHInstance::new(Arc::clone(bvh), desc.transform))
                        .ok_or(TracerError::MissingMesh {
                            instance: i,
                            mesh: desc.mesh,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let tlas = TLAS::new(instances)?;
        let tracer = Self {
            tlas,
            n_meshes: bvhs.len(),
        };
        info!(
            "Scene has {} meshes, {} instances and {} triangles",
            tracer.n_meshes(),
            tracer.n_instances(),
            tracer.n_triangles()
        );
        Ok(tracer)
    }

    /// Returns the object space triangle a hit refers to.
    ///
    /// * `triangle` - The triangle reference from a hit.
    pub fn triangle(&self, triangle: TriangleRef) -> Option<&Triangle> {
        self.tlas
            .instances()
            .get(triangle.instance)?
            .bvh()
            .primitives()
            .get(triangle.primitive)
    }

    /// Returns the object to world transform of an instance.
    ///
    /// * `instance` - Instance index.
    pub fn instance_transform(&self, instance: usize) -> Option<&Transform> {
        self.tlas.instances().get(instance).map(|i| i.transform())
    }

    /// Returns the number of distinct meshes.
    pub fn n_meshes(&self) -> usize {
        self.n_meshes
    }

    /// Returns the number of instances.
    pub fn n_instances(&self) -> usize {
        self.tlas.instances().len()
    }

    /// Returns the number of triangles in the world, counting every instance.
    pub fn n_triangles(&self) -> usize {
        self.tlas
            .instances()
            .iter()
            .map(|i| i.bvh().primitives().len())
            .sum()
    }

    /// Returns true if the scene holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.tlas.is_empty()
    }
}

impl Primitive for Tracer {
    /// Returns the bounds of the whole scene.
    fn world_bound(&self) -> Bounds3f {
        self.tlas.world_bound()
    }

    /// Returns the nearest hit in the scene.
    ///
    /// * `r`       - The ray.
    /// * `t_range` - Valid ray parameters.
    fn intersect(&self, r: &Ray, t_range: &Interval) -> Option<SurfaceInteraction> {
        self.tlas.intersect(r, t_range)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
