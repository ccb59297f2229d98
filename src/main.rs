use anyhow::Context;
use nalgebra_glm as glm;
use skinview::Model;
use skinview::camera::FreeLookCamera;
use skinview::gpu::WgpuDevice;
use skinview::input::{InputState, InputTracker};
use skinview::settings::Settings;
use winit::keyboard::KeyCode;

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: usize = 120;
/// Horizontal mouse motion fed each frame, in pixels
const PAN_PER_FRAME: f64 = 0.5;

/// Walk forward for the first half of the run while panning slowly
fn scripted_input(tracker: &mut InputTracker, frame: usize, frames: usize) -> InputState {
    if frame == 0 {
        tracker.on_key(KeyCode::KeyW, true);
    }
    if frame == frames / 2 {
        tracker.on_key(KeyCode::KeyW, false);
    }
    tracker.on_mouse_motion((PAN_PER_FRAME, 0.0));
    tracker.snapshot()
}

/// Step camera and animation for up to `frames` frames, handing each pose to `upload`.
///
/// Returns the number of frames run; a clamped clip stops the run at its end.
fn run_frames(
    model: &mut Model,
    camera: &mut FreeLookCamera,
    frames: usize,
    mut upload: impl FnMut(&Model),
) -> usize {
    let mut tracker = InputTracker::new();
    for frame in 0..frames {
        let input = scripted_input(&mut tracker, frame, frames);
        camera.update(FRAME_DT, &input);
        model.update(FRAME_DT);
        upload(model);

        if frame % 60 == 0 {
            let root = model.skeleton().world_transform(0).unwrap_or_else(glm::Mat4::identity);
            let clip = camera.view_projection() * root * glm::vec4(0.0, 0.0, 0.0, 1.0);
            log::debug!(
                "frame {frame}: t={:.3}s, {} bones, root at clip ({:.3}, {:.3}, {:.3})",
                model.controller().time(),
                model.pose_buffer().bone_count(),
                clip.x / clip.w,
                clip.y / clip.w,
                clip.z / clip.w
            );
        }

        if model.controller().is_finished() {
            log::info!("clip finished after {} frames", frame + 1);
            return frame + 1;
        }
    }
    frames
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let Some(model_path) = args.get(1) else {
        anyhow::bail!("usage: skinview <scene.json> [frames]");
    };
    let frames = match args.get(2) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid frame count '{arg}'"))?,
        None => DEFAULT_FRAMES,
    };

    let settings = Settings::load();
    let mut model = Model::load(model_path, &settings.animation)
        .with_context(|| format!("failed to load model '{model_path}'"))?;
    let mut camera = FreeLookCamera::new(settings.camera.clone());

    let ran = match WgpuDevice::headless() {
        Ok(mut device) => {
            let resources = model.acquire_resources(&mut device)?;
            let ran = run_frames(&mut model, &mut camera, frames, |model| {
                model.upload_pose(&mut device, &resources);
            });
            model.release_resources(&mut device, resources);
            ran
        }
        Err(e) => {
            log::warn!("no gpu available, animating on the cpu only: {e}");
            run_frames(&mut model, &mut camera, frames, |_| {})
        }
    };

    let clip = model
        .controller()
        .active_clip()
        .map_or("<bind pose>", |c| c.name.as_str());
    println!(
        "{}: {} frames of '{}', t={:.3}s",
        model.file_name().display(),
        ran,
        clip,
        model.controller().time()
    );
    for bone in model.skeleton().bones() {
        let world = bone.world();
        println!(
            "  {:<24} {:>9.4} {:>9.4} {:>9.4}",
            bone.name,
            world[(0, 3)],
            world[(1, 3)],
            world[(2, 3)]
        );
    }

    Ok(())
}
