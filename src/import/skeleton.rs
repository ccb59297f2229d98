// Node hierarchy to skeleton

use super::scene::Scene;
use crate::animation::{Bone, Skeleton};
use crate::error::{ModelError, Result};

/// Build a skeleton with one bone per scene node.
///
/// Nodes may come in any order; bones are laid out depth-first so every
/// parent precedes its children.
pub fn build_skeleton(scene: &Scene, max_bones: usize) -> Result<Skeleton> {
    let nodes = &scene.nodes;
    if nodes.len() > max_bones {
        return Err(ModelError::TooManyBones {
            count: nodes.len(),
            max: max_bones,
        });
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut roots = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        match node.parent {
            Some(parent) if parent >= nodes.len() => {
                return Err(ModelError::InvalidHierarchy(format!(
                    "node '{}' references missing parent {parent}",
                    node.name
                )));
            }
            Some(parent) => children[parent].push(index),
            None => roots.push(index),
        }
    }

    // Depth-first, keeping sibling order stable
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<usize> = roots.into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(children[node].iter().rev().copied());
    }

    // Nodes on a cycle are unreachable from any root
    if order.len() != nodes.len() {
        let mut reached = vec![false; nodes.len()];
        for &node in &order {
            reached[node] = true;
        }
        let stray = reached.iter().position(|r| !r).unwrap_or_default();
        return Err(ModelError::InvalidHierarchy(format!(
            "node '{}' is part of a parent cycle",
            nodes[stray].name
        )));
    }

    let mut bone_of_node = vec![0usize; nodes.len()];
    for (bone, &node) in order.iter().enumerate() {
        bone_of_node[node] = bone;
    }

    let mut seen = std::collections::HashSet::new();
    let bones = order
        .iter()
        .map(|&node| {
            let scene_node = &nodes[node];
            if !seen.insert(scene_node.name.as_str()) {
                log::warn!("duplicate node name '{}', lookups resolve to the first", scene_node.name);
            }
            Bone::new(
                scene_node.name.clone(),
                scene_node.parent.map(|p| bone_of_node[p]),
                scene_node.transform.to_transform(),
            )
        })
        .collect();

    let skeleton = Skeleton::new(bones, max_bones)?;
    log::debug!("skeleton built: {} bones", skeleton.bone_count());
    Ok(skeleton)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::scene::{NodeTransform, SceneNode};
    use pretty_assertions::assert_eq;

    fn node(name: &str, parent: Option<usize>) -> SceneNode {
        SceneNode {
            name: name.to_string(),
            parent,
            transform: NodeTransform::default(),
        }
    }

    fn scene(nodes: Vec<SceneNode>) -> Scene {
        Scene {
            nodes,
            ..Default::default()
        }
    }

    #[test]
    fn test_reorders_children_after_parents() {
        let scene = scene(vec![
            node("hand", Some(2)),
            node("hips", None),
            node("arm", Some(1)),
            node("leg", Some(1)),
        ]);
        let skeleton = build_skeleton(&scene, 8).unwrap();

        let names: Vec<&str> = skeleton.bones().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["hips", "arm", "hand", "leg"]);
        assert_eq!(skeleton.bone(2).unwrap().parent, Some(1));
        assert_eq!(skeleton.bone(3).unwrap().parent, Some(0));
        for (index, bone) in skeleton.bones().iter().enumerate() {
            if let Some(parent) = bone.parent {
                assert!(parent < index);
            }
        }
    }

    #[test]
    fn test_multiple_roots() {
        let scene = scene(vec![node("a", None), node("b", None), node("a1", Some(0))]);
        let skeleton = build_skeleton(&scene, 8).unwrap();
        assert_eq!(skeleton.find_bone("a1"), Some(1));
        assert_eq!(skeleton.find_bone("b"), Some(2));
    }

    #[test]
    fn test_cycle_rejected() {
        let scene = scene(vec![node("root", None), node("x", Some(2)), node("y", Some(1))]);
        let err = build_skeleton(&scene, 8).unwrap_err();
        assert!(matches!(err, ModelError::InvalidHierarchy(_)));
    }

    #[test]
    fn test_missing_parent_rejected() {
        let scene = scene(vec![node("root", Some(7))]);
        assert!(matches!(
            build_skeleton(&scene, 8),
            Err(ModelError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn test_bone_limit() {
        let nodes = (0..9usize)
            .map(|i| node(&format!("n{i}"), i.checked_sub(1)))
            .collect();
        let err = build_skeleton(&scene(nodes), 8).unwrap_err();
        assert!(matches!(err, ModelError::TooManyBones { count: 9, max: 8 }));
    }
}
