use macroquad::prelude::Conf;

fn window_conf() -> Conf {
    Conf {
        window_title: "MotionRun".to_owned(),
        window_width: 640,
        window_height: 480,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    motionrun_web_lib::run().await;
}
