//! WGSL generation. The distance functions are fixed text; every scene,
//! camera, march and lighting constant is baked in from a [`RenderConfig`].

use glam::Vec3;
use papillon_render::{Background, ConfigError, Light, RenderConfig};
use papillon_scene::{GridLayout, GroundMode, GroundPlane, Lamppost, RadialLayout, SceneVariant, WingMotion};
use papillon_sdf::SceneField;

/// Uniforms, fullscreen quad vertex stage and the primitive distance functions.
pub const PRELUDE: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    time: f32,
    _pad: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position, 0.0, 1.0);
    return out;
}

struct InstanceSample {
    d: f32,
    color: vec3<f32>,
};

fn sd_sphere(p: vec3<f32>, r: f32) -> f32 {
    return length(p) - r;
}

fn sd_plane(p: vec3<f32>, n: vec3<f32>, h: f32) -> f32 {
    return dot(p, n) + h;
}

fn sd_cylinder(p: vec3<f32>, h: f32, r: f32) -> f32 {
    let d = abs(vec2<f32>(length(p.xz), p.y)) - vec2<f32>(r, h);
    return min(max(d.x, d.y), 0.0) + length(max(d, vec2<f32>(0.0)));
}

fn sd_vesica_segment(p: vec3<f32>, a: vec3<f32>, b: vec3<f32>, w: f32) -> f32 {
    let c = (a + b) * 0.3;
    let l = length(b - a);
    let v = (b - a) / l;
    let pc = p - c;
    let y = dot(pc, v);
    let q = vec2<f32>(length(pc - y * v), abs(y));
    let r = 0.5 * l;
    let d = 0.5 * (r * r - w * w) / w;
    var h = vec3<f32>(-d, 0.0, d + w);
    if r * q.x < d * (q.y - r) {
        h = vec3<f32>(0.0, r, 0.0);
    }
    return length(q - h.xy) - h.z;
}

fn rotate_y(p: vec3<f32>, a: f32) -> vec3<f32> {
    let c = cos(a);
    let s = sin(a);
    return vec3<f32>(c * p.x - s * p.z, p.y, s * p.x + c * p.z);
}
"#;

/// Sphere tracing, normals and the fragment entry point. Expects `scene`,
/// `object_color`, `light_dir` and `background` from the generated part.
pub const TRACER: &str = r#"
fn march(ro: vec3<f32>, rd: vec3<f32>) -> vec2<f32> {
    var t = 0.0;
    for (var i = 0u; i < MAX_STEPS; i = i + 1u) {
        let d = scene(ro + rd * t);
        if d < HIT_EPSILON {
            return vec2<f32>(t, 1.0);
        }
        t = t + d;
        if t >= MAX_DISTANCE {
            break;
        }
    }
    return vec2<f32>(t, 0.0);
}

fn calc_normal(p: vec3<f32>) -> vec3<f32> {
    let e = vec2<f32>(NORMAL_EPSILON, 0.0);
    let g = vec3<f32>(
        scene(p + e.xyy) - scene(p - e.xyy),
        scene(p + e.yxy) - scene(p - e.yxy),
        scene(p + e.yyx) - scene(p - e.yyx)
    );
    let len = length(g);
    if len > 0.0 {
        return g / len;
    }
    return vec3<f32>(0.0);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let res = uniforms.resolution;
    let frag = vec2<f32>(in.clip_position.x, res.y - in.clip_position.y);
    let uv = (frag - 0.5 * res) / max(min(res.x, res.y), 1.0);
    let rd = normalize(CAM_RIGHT * uv.x + CAM_UP * uv.y + CAM_FORWARD * CAM_FOCAL);
    let m = march(CAM_ORIGIN, rd);
    if m.y > 0.5 {
        let p = CAM_ORIGIN + rd * m.x;
        let n = calc_normal(p);
        let lambert = max(dot(n, light_dir(p)), 0.0);
        let col = object_color(p) + glow(p);
        return vec4<f32>(clamp(col * (AMBIENT + DIFFUSE * lambert), vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
    }
    return vec4<f32>(clamp(background(uv), vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
"#;

/// WGSL float literal. Negative values are parenthesized so they can be
/// dropped into any expression.
fn lit(v: f32) -> String {
    let s = format!("{v:?}");
    if v.is_sign_negative() { format!("({s})") } else { s }
}

fn vec3_lit(v: Vec3) -> String {
    format!("vec3<f32>({}, {}, {})", lit(v.x), lit(v.y), lit(v.z))
}

/// `i / (count - 1)` as WGSL, or `fallback` when the axis has one cell.
fn lattice_fraction(var: &str, count: u32, fallback: f32) -> String {
    if count > 1 {
        format!("f32({var}) / {}", lit((count - 1) as f32))
    } else {
        lit(fallback)
    }
}

fn hash_fn(key: f32) -> String {
    format!(
        "
fn rand(n: f32) -> f32 {{
    return fract(sin(n) * {key});
}}
",
        key = lit(key)
    )
}

fn wings_fn(m: &WingMotion) -> String {
    format!(
        "
fn wings(lp: vec3<f32>, size: f32, thickness: f32, wt: f32) -> f32 {{
    let flap = sin(wt * {flap_rate}) * {flap_amplitude};
    let curve = cos(wt * {curve_rate}) * {curve_amplitude};
    let top_y = size * 0.8 + flap;
    let bottom_y = -size * 0.6 - flap * 0.7;
    let o = vec3<f32>(0.0);
    let tl = sd_vesica_segment(lp, o, vec3<f32>(-size * 1.5, top_y, curve), thickness);
    let tr = sd_vesica_segment(lp, o, vec3<f32>(size * 1.5, top_y, curve), thickness);
    let bl = sd_vesica_segment(lp, o, vec3<f32>(-size * 1.2, bottom_y, -curve), thickness);
    let br = sd_vesica_segment(lp, o, vec3<f32>(size * 1.2, bottom_y, -curve), thickness);
    return min(min(tl, tr), min(bl, br));
}}

fn wing_time(t: f32, n: f32) -> f32 {{
    return t * {clock_scale} + n * {index_phase};
}}
",
        flap_rate = lit(m.flap_rate),
        flap_amplitude = lit(m.flap_amplitude),
        curve_rate = lit(m.curve_rate),
        curve_amplitude = lit(m.curve_amplitude),
        clock_scale = lit(m.clock_scale),
        index_phase = lit(m.index_phase),
    )
}

fn grid_instance_fn(g: &GridLayout) -> String {
    format!(
        "
const INSTANCE_COUNT: u32 = {count}u;

fn butterfly(i: u32, p: vec3<f32>) -> InstanceSample {{
    let t = uniforms.time;
    let n = f32(i);
    let layer = {layer}u;
    let zi = i / layer;
    let rest = i % layer;
    let xi = rest / {count_y}u;
    let yi = rest % {count_y}u;
    let tx = {tx};
    let ty = {ty};
    let bob = sin(t * ({bob_rate} + rand(n) * {bob_jitter})) * {bob_amplitude};
    let pos = vec3<f32>(
        {x0} + ({x1} - {x0}) * tx,
        pow(ty, {height_exponent}) * {height} + bob,
        {z_start} - f32(zi) * {z_step}
    );
    let yaw = t * ({spin_rate} + rand(n + 1.0) * {spin_jitter});
    let lp = rotate_y(p - pos, yaw);
    var s: InstanceSample;
    s.d = wings(lp, {size}, {thickness}, wing_time(t, n));
    s.color = {base_color} + rand(n + 3.0) * {color_shift};
    return s;
}}
",
        count = g.instance_count(),
        layer = g.count_x * g.count_y,
        count_y = g.count_y,
        tx = lattice_fraction("xi", g.count_x, 0.5),
        ty = lattice_fraction("yi", g.count_y, 0.0),
        bob_rate = lit(g.bob_rate),
        bob_jitter = lit(g.bob_jitter),
        bob_amplitude = lit(g.bob_amplitude),
        x0 = lit(g.x_range[0]),
        x1 = lit(g.x_range[1]),
        height_exponent = lit(g.height_exponent),
        height = lit(g.height),
        z_start = lit(g.z_start),
        z_step = lit(g.z_step),
        spin_rate = lit(g.spin_rate),
        spin_jitter = lit(g.spin_jitter),
        size = lit(g.size),
        thickness = lit(g.thickness),
        base_color = vec3_lit(g.base_color),
        color_shift = vec3_lit(g.color_shift),
    )
}

fn radial_instance_fn(r: &RadialLayout) -> String {
    format!(
        "
const INSTANCE_COUNT: u32 = {count}u;

fn butterfly(i: u32, p: vec3<f32>) -> InstanceSample {{
    let t = uniforms.time;
    let n = f32(i);
    let angle = n * 6.2831855 / {count_f} + t * ({orbit_rate} + rand(n) * {orbit_jitter});
    let radius = {radius} + rand(n * 10.0) * {radius_jitter};
    let height = {height} + sin(t * ({bob_rate} + rand(n * 2.0) * {bob_jitter})) * {bob_amplitude};
    let size = {size} + rand(n * 5.0) * {size_jitter};
    let pos = vec3<f32>(cos(angle) * radius, height, sin(angle) * radius);
    let lp = rotate_y(p - pos, angle);
    var s: InstanceSample;
    s.d = wings(lp, size, {thickness}, wing_time(t, n));
    s.color = mix({palette0}, {palette1}, rand(n * 3.0));
    return s;
}}
",
        count = r.count,
        count_f = lit(r.count.max(1) as f32),
        orbit_rate = lit(r.orbit_rate),
        orbit_jitter = lit(r.orbit_jitter),
        radius = lit(r.radius),
        radius_jitter = lit(r.radius_jitter),
        height = lit(r.height),
        bob_rate = lit(r.bob_rate),
        bob_jitter = lit(r.bob_jitter),
        bob_amplitude = lit(r.bob_amplitude),
        size = lit(r.size),
        size_jitter = lit(r.size_jitter),
        thickness = lit(r.thickness),
        palette0 = vec3_lit(r.palette[0]),
        palette1 = vec3_lit(r.palette[1]),
    )
}

/// Union over all instances, and the colour of the first instance within
/// `COLOR_EPSILON` (alpha 0 when none is).
fn butterflies_fns() -> &'static str {
    "
fn butterflies(p: vec3<f32>) -> f32 {
    var d = 1e30;
    for (var i = 0u; i < INSTANCE_COUNT; i = i + 1u) {
        d = min(d, butterfly(i, p).d);
    }
    return d;
}

fn butterfly_color(p: vec3<f32>) -> vec4<f32> {
    for (var i = 0u; i < INSTANCE_COUNT; i = i + 1u) {
        let s = butterfly(i, p);
        if s.d < COLOR_EPSILON {
            return vec4<f32>(s.color, 1.0);
        }
    }
    return vec4<f32>(0.0);
}
"
}

fn grid_scene_fns(ground: &GroundPlane, fallback: Vec3) -> String {
    let (combine, ground_color) = match ground.mode {
        GroundMode::Carve => ("max(butterflies(p), -plane)", String::new()),
        GroundMode::Solid => (
            "min(butterflies(p), plane)",
            format!(
                "    if ground(p) < COLOR_EPSILON {{\n        return {};\n    }}\n",
                vec3_lit(ground.color)
            ),
        ),
    };
    format!(
        "
fn ground(p: vec3<f32>) -> f32 {{
    return sd_plane(p, {normal}, {offset});
}}

fn scene(p: vec3<f32>) -> f32 {{
    let plane = ground(p);
    return {combine};
}}

fn object_color(p: vec3<f32>) -> vec3<f32> {{
    let b = butterfly_color(p);
    if b.w > 0.5 {{
        return b.xyz;
    }}
{ground_color}    return {fallback};
}}
",
        normal = vec3_lit(ground.normal),
        offset = lit(ground.offset),
        fallback = vec3_lit(fallback),
    )
}

fn radial_scene_fns(lamp: &Lamppost, fallback: Vec3) -> String {
    format!(
        "
fn pole(p: vec3<f32>) -> f32 {{
    return sd_cylinder(p - {pole_center}, {pole_half_height}, {pole_radius});
}}

fn lamp(p: vec3<f32>) -> f32 {{
    return sd_sphere(p - {lamp_center}, {lamp_radius});
}}

fn scene(p: vec3<f32>) -> f32 {{
    return min(min(pole(p), lamp(p)), butterflies(p));
}}

fn object_color(p: vec3<f32>) -> vec3<f32> {{
    if pole(p) < COLOR_EPSILON {{
        return {pole_color};
    }}
    let l = lamp(p);
    if l < COLOR_EPSILON {{
        let halo = {glow_strength} / (0.01 + l * l);
        return {lamp_color} * (1.0 + halo * {glow_gain});
    }}
    let b = butterfly_color(p);
    if b.w > 0.5 {{
        return b.xyz;
    }}
    return {fallback};
}}
",
        pole_center = vec3_lit(lamp.pole_center),
        pole_half_height = lit(lamp.pole_half_height),
        pole_radius = lit(lamp.pole_radius),
        lamp_center = vec3_lit(lamp.lamp_center),
        lamp_radius = lit(lamp.lamp_radius),
        pole_color = vec3_lit(lamp.pole_color),
        glow_strength = lit(lamp.glow_strength),
        lamp_color = vec3_lit(lamp.lamp_color),
        glow_gain = lit(lamp.glow_gain),
        fallback = vec3_lit(fallback),
    )
}

fn lighting_fns(config: &RenderConfig) -> String {
    let shading = config.scene_shading();
    let lamp = shading.lamp();
    let light = match (shading.light, lamp) {
        (Light::Directional { direction }, _) => vec3_lit(direction.normalize_or_zero()),
        (Light::Point { position }, _) => format!("normalize({} - p)", vec3_lit(position)),
        (Light::Lamp, Some(l)) => format!("normalize({} - p)", vec3_lit(l.lamp_center)),
        (Light::Lamp, None) => vec3_lit(Vec3::ZERO),
    };
    let glow = match (&shading.glow, lamp) {
        (Some(g), Some(l)) => format!(
            "    let d = sd_sphere(p - {center}, {radius});\n    if d < {reach} {{\n        return {color} * ({strength} / (0.01 + d * d)) * {weight};\n    }}\n",
            center = vec3_lit(l.lamp_center),
            radius = lit(l.lamp_radius),
            reach = lit(g.reach),
            color = vec3_lit(g.color),
            strength = lit(g.strength),
            weight = lit(g.weight),
        ),
        _ => String::new(),
    };
    let background = match shading.background {
        Background::Flat { color } => vec3_lit(color),
        Background::VerticalGradient { bottom, top } => {
            format!("mix({}, {}, uv.y + 0.5)", vec3_lit(bottom), vec3_lit(top))
        }
    };
    format!(
        "
const AMBIENT: f32 = {ambient};
const DIFFUSE: f32 = {diffuse};

fn light_dir(p: vec3<f32>) -> vec3<f32> {{
    return {light};
}}

fn glow(p: vec3<f32>) -> vec3<f32> {{
{glow}    return vec3<f32>(0.0);
}}

fn background(uv: vec2<f32>) -> vec3<f32> {{
    return {background};
}}
",
        ambient = lit(shading.ambient),
        diffuse = lit(shading.diffuse),
    )
}

fn constants(config: &RenderConfig) -> String {
    let (forward, right, up) = config.camera.basis();
    let m = &config.march;
    format!(
        "
const MAX_STEPS: u32 = {max_steps}u;
const MAX_DISTANCE: f32 = {max_distance};
const HIT_EPSILON: f32 = {hit_epsilon};
const NORMAL_EPSILON: f32 = {normal_epsilon};
const COLOR_EPSILON: f32 = {color_epsilon};

const CAM_ORIGIN: vec3<f32> = {origin};
const CAM_FORWARD: vec3<f32> = {forward};
const CAM_RIGHT: vec3<f32> = {right};
const CAM_UP: vec3<f32> = {up};
const CAM_FOCAL: f32 = {focal};
",
        max_steps = m.max_steps,
        max_distance = lit(m.max_distance),
        hit_epsilon = lit(m.hit_epsilon),
        normal_epsilon = lit(m.normal_epsilon),
        color_epsilon = lit(config.scene.color_epsilon),
        origin = vec3_lit(config.camera.origin),
        forward = vec3_lit(forward),
        right = vec3_lit(right),
        up = vec3_lit(up),
        focal = lit(config.camera.focal_length),
    )
}

/// Full WGSL module for `config`: vertex stage `vs_main`, fragment stage
/// `fs_main`, uniforms at group 0 binding 0.
pub fn scene_shader(config: &RenderConfig) -> Result<String, ConfigError> {
    config.validate()?;
    let fallback = config.scene()?.fallback_color();

    let mut src = String::from(PRELUDE);
    src.push_str(&constants(config));
    match &config.scene.variant {
        SceneVariant::Grid { layout, ground } => {
            src.push_str(&hash_fn(layout.hash.0));
            src.push_str(&wings_fn(&layout.wings));
            src.push_str(&grid_instance_fn(layout));
            src.push_str(butterflies_fns());
            src.push_str(&grid_scene_fns(ground, fallback));
        }
        SceneVariant::Radial { layout, lamp } => {
            src.push_str(&hash_fn(layout.hash.0));
            src.push_str(&wings_fn(&layout.wings));
            src.push_str(&radial_instance_fn(layout));
            src.push_str(butterflies_fns());
            src.push_str(&radial_scene_fns(lamp, fallback));
        }
    }
    src.push_str(&lighting_fns(config));
    src.push_str(TRACER);
    Ok(src)
}
