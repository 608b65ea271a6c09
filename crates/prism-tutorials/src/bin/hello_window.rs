use prism_engine::tutorial::Tutorial;

fn main() {
    prism_tutorials::launch(|| Ok(Tutorial::new(prism_tutorials::hello_window()?)));
}
