use glam::Vec3;

use crate::scene::Scene;

/// Scene inspector for developer tooling.
///
/// Read-only queries against a scene at a fixed time, for the CLI and the
/// desktop debug panel.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene at `time`.
    pub fn summary(scene: &Scene, time: f32) -> SceneSummary {
        let placements = scene.placements(time);
        let (min, max) = placements.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(p.position), hi.max(p.position)),
        );
        SceneSummary {
            variant: scene.variant().name(),
            time,
            instance_count: placements.len(),
            bounds_min: min.to_array(),
            bounds_max: max.to_array(),
        }
    }

    /// Placement details for one instance, or `None` past the end.
    pub fn inspect_instance(scene: &Scene, index: u32, time: f32) -> Option<InstanceInfo> {
        (index < scene.instance_count()).then(|| {
            let p = scene.placement(index, time);
            InstanceInfo {
                index,
                position: p.position.to_array(),
                yaw: p.yaw,
                size: p.size,
                color: p.color.to_array(),
            }
        })
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub variant: &'static str,
    pub time: f32,
    pub instance_count: usize,
    /// Bounding box of instance centres.
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: variant={} time={:.2} instances={} centres=({:.2}, {:.2}, {:.2})..({:.2}, {:.2}, {:.2})",
            self.variant,
            self.time,
            self.instance_count,
            self.bounds_min[0],
            self.bounds_min[1],
            self.bounds_min[2],
            self.bounds_max[0],
            self.bounds_max[1],
            self.bounds_max[2],
        )
    }
}

/// Detailed info about a single butterfly.
#[derive(Debug, Clone)]
pub struct InstanceInfo {
    pub index: u32,
    pub position: [f32; 3],
    pub yaw: f32,
    pub size: f32,
    pub color: [f32; 3],
}

impl std::fmt::Display for InstanceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Butterfly [{:>3}] pos=({:.2}, {:.2}, {:.2}) yaw={:.2} size={:.3} color=({:.2}, {:.2}, {:.2})",
            self.index,
            self.position[0],
            self.position[1],
            self.position[2],
            self.yaw,
            self.size,
            self.color[0],
            self.color[1],
            self.color[2],
        )
    }
}
