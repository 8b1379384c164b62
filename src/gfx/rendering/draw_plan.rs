// src/gfx/rendering/draw_plan.rs
//! Fixed per-frame pass order with model transforms and stencil tags.
//!
//! The plan is computed without touching the GPU; [`RenderEngine`] walks it
//! and issues one draw per pass.
//!
//! [`RenderEngine`]: super::render_engine::RenderEngine

use cgmath::Matrix4;

use crate::gfx::{
    camera::ViewProjection,
    geometry::{model_matrix, transform::sprite_matrix},
    picking::PickTarget,
    scene::{ObjectKind, Scene, SceneObject},
};

/// What a pass draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Object(ObjectKind),
    Skybox,
}

/// One draw in the frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPass {
    pub kind: PassKind,
    /// Value written to the stencil buffer, None leaves it untouched
    pub stencil_id: Option<u8>,
    pub model: Matrix4<f32>,
    /// Hidden passes are still issued but draw nothing
    pub visible: bool,
    /// Seconds since the object was created
    pub local_time: f32,
    pub frame_duration: f32,
}

impl DrawPass {
    fn object(object: &SceneObject, model: Matrix4<f32>) -> Self {
        Self {
            kind: PassKind::Object(object.kind),
            stencil_id: PickTarget::for_kind(object.kind).map(PickTarget::stencil_id),
            model,
            visible: object.is_visible(),
            local_time: object.local_time(),
            frame_duration: object.frame_duration,
        }
    }

    fn skybox() -> Self {
        Self {
            kind: PassKind::Skybox,
            stencil_id: None,
            model: Matrix4::from_scale(1.0),
            visible: true,
            local_time: 0.0,
            frame_duration: 0.0,
        }
    }
}

/// Builds the ordered list of passes for the current scene state
///
/// Order: ground tiles, drawn palms, snowman, flyer, sofa, duck, gem, skybox,
/// then the fire sprite and the billboard when their toggles are on. Absent
/// singletons produce no pass.
///
/// # Arguments
/// * `scene` - Scene to draw
/// * `view` - Matrices of the main view, used to face the fire sprite
pub fn build_draw_plan(scene: &Scene, view: &ViewProjection) -> Vec<DrawPass> {
    let objects = &scene.objects;
    let mut plan = Vec::with_capacity(objects.ground_tiles.len() + objects.palms.len() + 9);

    let modelled = |object: &SceneObject| DrawPass::object(object, model_matrix(object));

    plan.extend(objects.ground_tiles.iter().map(modelled));
    plan.extend(scene.drawn_palms().iter().map(modelled));
    plan.extend(
        [
            &objects.snowman,
            &objects.flyer,
            &objects.sofa,
            &objects.duck,
            &objects.gem,
        ]
        .into_iter()
        .flatten()
        .map(modelled),
    );

    plan.push(DrawPass::skybox());

    if scene.state.fire_on {
        if let Some(fire) = &objects.fire {
            let model = sprite_matrix(fire, view.billboard_rotation());
            plan.push(DrawPass::object(fire, model));
        }
    }

    if scene.state.billboard_on {
        if let Some(billboard) = &objects.billboard {
            plan.push(modelled(billboard));
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        gfx::{picking::PickTarget, scene::SceneCommand},
    };

    fn ids(plan: &[DrawPass]) -> Vec<Option<u8>> {
        plan.iter().map(|pass| pass.stencil_id).collect()
    }

    fn expected(palms: usize, tail: &[Option<u8>]) -> Vec<Option<u8>> {
        let mut ids = vec![None; 26];
        ids.extend(std::iter::repeat(Some(3)).take(palms));
        ids.extend([Some(1), Some(2), Some(4), Some(5), Some(6), None]);
        ids.extend_from_slice(tail);
        ids
    }

    #[test]
    fn test_default_stencil_sequence() {
        let mut scene = Scene::with_config(Config::default());
        scene.tick(0.0);
        let plan = build_draw_plan(&scene, &scene.view_projection(1.25));
        assert_eq!(ids(&plan), expected(16, &[]));
        let skybox = plan.iter().position(|pass| pass.kind == PassKind::Skybox);
        assert_eq!(skybox, Some(26 + 16 + 5));
        assert_eq!(skybox, Some(plan.len() - 1));
    }

    #[test]
    fn test_palm_count_and_effects() {
        let mut scene = Scene::with_config(Config {
            palm_count: 5,
            ..Config::default()
        });
        scene.apply(SceneCommand::ToggleFire);
        scene.apply(SceneCommand::ToggleBillboard);
        scene.tick(1.0);
        let plan = build_draw_plan(&scene, &scene.view_projection(1.0));
        assert_eq!(ids(&plan), expected(5, &[None, Some(7)]));
        assert_eq!(
            plan[plan.len() - 2].kind,
            PassKind::Object(ObjectKind::Fire)
        );
        assert_eq!(plan[plan.len() - 2].frame_duration, 0.1);
    }

    #[test]
    fn test_billboard_waits_for_tick() {
        let mut scene = Scene::with_config(Config::default());
        scene.apply(SceneCommand::ToggleBillboard);
        let plan = build_draw_plan(&scene, &scene.view_projection(1.0));
        assert_eq!(ids(&plan), expected(16, &[]));
    }

    #[test]
    fn test_hidden_sofa_keeps_its_pass() {
        let mut scene = Scene::with_config(Config::default());
        scene.pick(PickTarget::Sofa);
        let plan = build_draw_plan(&scene, &scene.view_projection(1.0));
        let sofa = plan
            .iter()
            .find(|pass| pass.kind == PassKind::Object(ObjectKind::Sofa))
            .unwrap();
        assert_eq!(sofa.stencil_id, Some(4));
        assert!(!sofa.visible);
        assert_eq!(ids(&plan), expected(16, &[]));
    }

    #[test]
    fn test_missing_singleton_is_skipped() {
        let mut scene = Scene::with_config(Config::default());
        scene.objects.duck = None;
        let plan = build_draw_plan(&scene, &scene.view_projection(1.0));
        assert!(!ids(&plan).contains(&Some(5)));
        assert_eq!(plan.len(), 26 + 16 + 4 + 1);
    }

    #[test]
    fn test_sprite_time_is_local() {
        let mut scene = Scene::with_config(Config::default());
        scene.tick(2.0);
        scene.apply(SceneCommand::Reset);
        scene.apply(SceneCommand::ToggleFire);
        scene.tick(3.5);
        let plan = build_draw_plan(&scene, &scene.view_projection(1.0));
        let fire = plan.last().unwrap();
        assert_eq!(fire.kind, PassKind::Object(ObjectKind::Fire));
        assert!((fire.local_time - 1.5).abs() < 1e-6);
    }
}
