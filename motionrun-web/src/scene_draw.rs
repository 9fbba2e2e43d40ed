use macroquad::math::{EulerRot, Mat3};
use macroquad::prelude::*;
use motionrun_core::{Rgb, SceneFrame, SceneItem, Shape, rgb_components};

const SKY_COLOR: Color = Color::from_rgba(0, 0, 0, 255);
const WIRE_COLOR: Color = Color::from_rgba(0, 0, 0, 255);
const BANNER_COLOR: Color = Color::from_rgba(255, 0, 0, 255);

#[derive(Debug, Clone)]
pub struct HudDrawConfig {
    pub font_size: f32,
    pub banner_font_size: f32,
    pub margin: f32,
    pub line_height: f32,
    pub text_color: Color,
}

impl Default for HudDrawConfig {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            banner_font_size: 40.0,
            margin: 20.0,
            line_height: 24.0,
            text_color: WHITE,
        }
    }
}

pub fn color_from_rgb(color: Rgb) -> Color {
    let [r, g, b] = rgb_components(color);
    Color::from_rgba(r, g, b, 255)
}

fn to_vec3(value: [f32; 3]) -> Vec3 {
    vec3(value[0], value[1], value[2])
}

fn has_rotation(item: &SceneItem) -> bool {
    item.rotation.iter().any(|angle| *angle != 0.0)
}

/// Corner and edge vectors of a rotated box centred on the item position.
fn rotated_box(item: &SceneItem) -> (Vec3, [Vec3; 3]) {
    let [rx, ry, rz] = item.rotation;
    let rotation = Mat3::from_euler(EulerRot::XYZ, rx, ry, rz);
    let [sx, sy, sz] = item.size;
    let edges = [
        rotation * vec3(sx, 0.0, 0.0),
        rotation * vec3(0.0, sy, 0.0),
        rotation * vec3(0.0, 0.0, sz),
    ];
    let corner = to_vec3(item.position) - (edges[0] + edges[1] + edges[2]) * 0.5;
    (corner, edges)
}

fn draw_item(item: &SceneItem) {
    let color = color_from_rgb(item.color);
    let size = to_vec3(item.size);
    match item.shape {
        Shape::Cube if has_rotation(item) => {
            let (corner, [a, b, c]) = rotated_box(item);
            draw_affine_parallelepiped(corner, a, b, c, None, color);
            draw_affine_parallelepiped_wires(corner, a, b, c, WIRE_COLOR);
        }
        Shape::Cube => {
            let position = to_vec3(item.position);
            draw_cube(position, size, None, color);
            draw_cube_wires(position, size, WIRE_COLOR);
        }
        Shape::Sphere => {
            draw_sphere(to_vec3(item.position), item.size[0] * 0.5, None, color);
        }
        Shape::Plane => {
            // draw_plane takes half extents on x and z.
            let half = vec2(item.size[0] * 0.5, item.size[2] * 0.5);
            draw_plane(to_vec3(item.position), half, None, color);
        }
    }
}

pub fn draw_scene(frame: &SceneFrame, config: &HudDrawConfig) {
    clear_background(SKY_COLOR);

    set_camera(&Camera3D {
        position: to_vec3(frame.camera.position),
        target: to_vec3(frame.camera.target),
        up: Vec3::Y,
        fovy: frame.camera.fov_degrees.to_radians(),
        ..Default::default()
    });
    for item in &frame.items {
        draw_item(item);
    }

    set_default_camera();
    draw_hud(frame, config);
}

fn draw_hud(frame: &SceneFrame, config: &HudDrawConfig) {
    let mut line_y = config.margin + config.line_height;
    if let Some(score) = frame.hud.score {
        draw_text(
            &format!("score: {}", score),
            config.margin,
            line_y,
            config.font_size,
            config.text_color,
        );
        line_y += config.line_height;
    }
    if let Some(message) = &frame.hud.message {
        draw_text(
            message,
            config.margin,
            line_y,
            config.font_size,
            config.text_color,
        );
    }
    if let Some(banner) = &frame.hud.banner {
        draw_centered(banner, screen_height() * 0.5, config.banner_font_size, BANNER_COLOR);
    }
}

fn draw_centered(text: &str, y: f32, font_size: f32, color: Color) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    let x = ((screen_width() - dims.width) * 0.5).max(0.0);
    draw_text(text, x, y, font_size, color);
}

/// Bottom line hint, e.g. how to restart after the run ended.
pub fn draw_footer(text: &str, config: &HudDrawConfig) {
    draw_centered(
        text,
        screen_height() - config.margin,
        config.font_size,
        config.text_color,
    );
}

/// Length prompt shown before an endless run starts.
pub fn draw_start_screen(win_length_input: &str, input_label: &str, config: &HudDrawConfig) {
    clear_background(SKY_COLOR);
    let center_y = screen_height() * 0.5;
    draw_centered("Enter length to win:", center_y - 60.0, config.banner_font_size, WHITE);

    let shown = if win_length_input.is_empty() {
        "_"
    } else {
        win_length_input
    };
    draw_centered(shown, center_y, config.banner_font_size, YELLOW);
    draw_centered(
        "Press Enter to start",
        center_y + 50.0,
        config.font_size,
        config.text_color,
    );
    draw_text(
        &format!("input: {}", input_label),
        config.margin,
        screen_height() - config.margin,
        config.font_size,
        config.text_color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use motionrun_core::scene::{GROUND_COLOR, PLAYER_COLOR};
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn rgb_maps_to_opaque_color() {
        assert_eq!(color_from_rgb(PLAYER_COLOR), Color::from_rgba(0, 0, 255, 255));
        assert_eq!(
            color_from_rgb(GROUND_COLOR),
            Color::from_rgba(0x8b, 0x45, 0x13, 255)
        );
    }

    #[test]
    fn rotated_box_spans_the_item() {
        let item = SceneItem::new(Shape::Cube, [1.0, 2.0, 3.0], [2.0, 4.0, 6.0], PLAYER_COLOR);
        let (corner, edges) = rotated_box(&item);
        assert!(close(corner, vec3(0.0, 0.0, 0.0)));
        assert!(close(edges[0], vec3(2.0, 0.0, 0.0)));
        assert!(close(edges[1], vec3(0.0, 4.0, 0.0)));
        assert!(close(edges[2], vec3(0.0, 0.0, 6.0)));

        let (corner, edges) = rotated_box(&item.with_rotation([0.0, FRAC_PI_2, 0.0]));
        assert!(close(edges[0], vec3(0.0, 0.0, -2.0)));
        assert!(close(edges[2], vec3(6.0, 0.0, 0.0)));
        // Centre stays put under rotation.
        let centre = corner + (edges[0] + edges[1] + edges[2]) * 0.5;
        assert!(close(centre, vec3(1.0, 2.0, 3.0)));
    }
}
