use prism_engine::tutorial::Tutorial;
use prism_tutorials::{COLOR_UNIFORM, pulse_color, shaders_uniform};

fn main() {
    prism_tutorials::launch(|| {
        let tutorial = Tutorial::new(shaders_uniform()?).with_frame_hook(|uniforms, time| {
            uniforms.set_vec4(COLOR_UNIFORM, pulse_color(time.elapsed).to_array())
        });
        Ok(tutorial)
    });
}
