use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Mat3;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, HtmlImageElement, WebGlProgram, WebGlRenderingContext as Gl,
    WebGlShader, WebGlTexture, WebGlUniformLocation,
};

use sphereview_core::{Camera, SceneDescription, ViewMode};

use crate::video::VideoProxy;

/// Radians of camera rotation per pixel of drag.
const DRAG_SENSITIVITY: f32 = 0.0025;

/// Vertical field of view, degrees.
const FOV_DEG: f32 = 75.0;

/// HTMLMediaElement.HAVE_CURRENT_DATA.
const HAVE_CURRENT_DATA: u16 = 2;

const VERTEX_SHADER: &str = r#"
attribute vec2 position;
varying vec2 v_ndc;
void main() {
    v_ndc = position;
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

// Equirectangular lookup: turn the NDC coordinate into a view ray,
// rotate it by the camera pose, then map the direction to pano UVs.
// u_v_scale folds the over/under stereo layout down to the top eye.
const FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_texture;
uniform mat3 u_view;
uniform float u_tan_half_fov;
uniform float u_aspect;
uniform float u_v_scale;
varying vec2 v_ndc;

const float PI = 3.14159265358979;

void main() {
    vec3 ray = normalize(vec3(
        v_ndc.x * u_tan_half_fov * u_aspect,
        v_ndc.y * u_tan_half_fov,
        -1.0
    ));
    vec3 dir = u_view * ray;
    float u = atan(dir.x, -dir.z) / (2.0 * PI) + 0.5;
    float v = 0.5 - asin(clamp(dir.y, -1.0, 1.0)) / PI;
    gl_FragColor = texture2D(u_texture, vec2(u, v * u_v_scale));
}
"#;

/// Media readiness notifications out of the renderer.
pub type ReadyCallback = Box<dyn Fn(Result<bool, String>)>;

/// Owns the render surface, the panorama pipeline, the drag camera, and
/// the video passthrough.
pub struct WorldRenderer {
    canvas: HtmlCanvasElement,
    gl: Gl,
    program: WebGlProgram,
    u_view: WebGlUniformLocation,
    u_tan_half_fov: WebGlUniformLocation,
    u_aspect: WebGlUniformLocation,
    u_v_scale: WebGlUniformLocation,
    texture: WebGlTexture,
    camera: Rc<RefCell<Camera>>,
    scene: Option<SceneDescription>,
    video: Option<VideoProxy>,
    image: Option<HtmlImageElement>,
    image_uploaded: bool,
    have_texture: bool,
    mode: ViewMode,
    _drag_listeners: Vec<Closure<dyn FnMut(web_sys::PointerEvent)>>,
    _media_listeners: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

/// Quick capability probe, separate from renderer construction so boot
/// can fail before any page surgery happens.
pub fn probe_webgl(document: &Document) -> bool {
    let Ok(element) = document.create_element("canvas") else {
        return false;
    };
    let Ok(canvas) = element.dyn_into::<HtmlCanvasElement>() else {
        return false;
    };
    matches!(canvas.get_context("webgl"), Ok(Some(_)))
}

impl WorldRenderer {
    pub fn create(document: &Document) -> Result<Self, String> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|_| "failed to create render canvas".to_string())?
            .dyn_into()
            .map_err(|_| "element is not a canvas".to_string())?;
        canvas.set_id("render-canvas");
        document
            .body()
            .ok_or_else(|| "no document body".to_string())?
            .append_child(&canvas)
            .map_err(|_| "failed to attach render canvas".to_string())?;

        let gl: Gl = canvas
            .get_context("webgl")
            .map_err(|_| "WebGL context request failed".to_string())?
            .ok_or_else(|| "WebGL context unavailable".to_string())?
            .dyn_into()
            .map_err(|_| "context is not WebGL".to_string())?;

        let program = build_program(&gl)?;
        gl.use_program(Some(&program));

        let u_view = uniform(&gl, &program, "u_view")?;
        let u_tan_half_fov = uniform(&gl, &program, "u_tan_half_fov")?;
        let u_aspect = uniform(&gl, &program, "u_aspect")?;
        let u_v_scale = uniform(&gl, &program, "u_v_scale")?;

        setup_quad(&gl, &program)?;
        let texture = setup_texture(&gl)?;

        let camera = Rc::new(RefCell::new(Camera::new(0.0, false)));
        let drag_listeners = install_drag_listeners(&canvas, camera.clone());

        Ok(Self {
            canvas,
            gl,
            program,
            u_view,
            u_tan_half_fov,
            u_aspect,
            u_v_scale,
            texture,
            camera,
            scene: None,
            video: None,
            image: None,
            image_uploaded: false,
            have_texture: false,
            mode: ViewMode::Normal,
            _drag_listeners: drag_listeners,
            _media_listeners: Vec::new(),
        })
    }

    /// Attach a loaded scene. Media decoding is asynchronous, so the
    /// renderer reports readiness (or failure) through `on_ready`,
    /// exactly once.
    pub fn set_scene(
        &mut self,
        document: &Document,
        scene: SceneDescription,
        on_ready: ReadyCallback,
    ) -> Result<(), String> {
        *self.camera.borrow_mut() = Camera::new(scene.default_yaw_deg, scene.is_yaw_only);
        let notify = one_shot(on_ready);

        if scene.has_video() {
            let video = VideoProxy::create(document, &scene)?;
            self.watch_media(video.element(), true, notify)?;
            self.video = Some(video);
        } else {
            let image = HtmlImageElement::new()
                .map_err(|_| "failed to create image element".to_string())?;
            image.set_cross_origin(Some("anonymous"));
            self.watch_media(&image, false, notify)?;
            image.set_src(scene.media_url());
            self.image = Some(image);
        }

        self.scene = Some(scene);
        Ok(())
    }

    fn watch_media(
        &mut self,
        target: &web_sys::EventTarget,
        has_video: bool,
        notify: Rc<dyn Fn(Result<bool, String>)>,
    ) -> Result<(), String> {
        let ready_event = if has_video { "canplay" } else { "load" };
        let media_kind = if has_video { "video" } else { "image" };

        let on_ready = {
            let notify = notify.clone();
            Closure::<dyn FnMut(_)>::new(move |_: web_sys::Event| {
                notify(Ok(has_video));
            })
        };
        let on_error = Closure::<dyn FnMut(_)>::new(move |_: web_sys::Event| {
            notify(Err(format!("failed to load {media_kind}")));
        });

        target
            .add_event_listener_with_callback(ready_event, on_ready.as_ref().unchecked_ref())
            .and_then(|_| {
                target.add_event_listener_with_callback(
                    "error",
                    on_error.as_ref().unchecked_ref(),
                )
            })
            .map_err(|_| "failed to watch media element".to_string())?;

        self._media_listeners.push(on_ready);
        self._media_listeners.push(on_error);
        Ok(())
    }

    pub fn video(&self) -> Option<&VideoProxy> {
        self.video.as_ref()
    }

    pub fn video_mut(&mut self) -> Option<&mut VideoProxy> {
        self.video.as_mut()
    }

    /// Record a viewing-mode switch. Returns true if the mode actually
    /// changed.
    pub fn set_mode(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        true
    }

    /// Draw one frame.
    pub fn render(&mut self, _time: f64) {
        let (width, height) = self.resize_to_display();
        self.gl.viewport(0, 0, width as i32, height as i32);
        self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
        self.gl.clear(Gl::COLOR_BUFFER_BIT);

        self.upload_current_frame();
        if !self.have_texture {
            return;
        }

        let aspect = if height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let v_scale = match &self.scene {
            Some(scene) if scene.is_stereo => 0.5,
            _ => 1.0,
        };
        let view = Mat3::from_quat(self.camera.borrow().pose());

        let gl = &self.gl;
        gl.use_program(Some(&self.program));
        gl.uniform_matrix3fv_with_f32_array(Some(&self.u_view), false, &view.to_cols_array());
        gl.uniform1f(Some(&self.u_tan_half_fov), (0.5 * FOV_DEG.to_radians()).tan());
        gl.uniform1f(Some(&self.u_aspect), aspect);
        gl.uniform1f(Some(&self.u_v_scale), v_scale);
        gl.draw_arrays(Gl::TRIANGLE_STRIP, 0, 4);
    }

    fn resize_to_display(&self) -> (u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let width = (self.canvas.client_width() as f64 * dpr).max(1.0) as u32;
        let height = (self.canvas.client_height() as f64 * dpr).max(1.0) as u32;
        if self.canvas.width() != width {
            self.canvas.set_width(width);
        }
        if self.canvas.height() != height {
            self.canvas.set_height(height);
        }
        (width, height)
    }

    /// Keep the panorama texture current: video frames every frame once
    /// decodable, still images exactly once.
    fn upload_current_frame(&mut self) {
        let gl = &self.gl;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&self.texture));

        if let Some(video) = &self.video {
            if video.element().ready_state() >= HAVE_CURRENT_DATA {
                let ok = gl.tex_image_2d_with_u32_and_u32_and_video(
                    Gl::TEXTURE_2D,
                    0,
                    Gl::RGBA as i32,
                    Gl::RGBA,
                    Gl::UNSIGNED_BYTE,
                    video.element(),
                );
                self.have_texture = self.have_texture || ok.is_ok();
            }
        } else if let Some(image) = &self.image {
            if !self.image_uploaded && image.complete() && image.natural_width() > 0 {
                let ok = gl.tex_image_2d_with_u32_and_u32_and_image(
                    Gl::TEXTURE_2D,
                    0,
                    Gl::RGBA as i32,
                    Gl::RGBA,
                    Gl::UNSIGNED_BYTE,
                    image,
                );
                if ok.is_ok() {
                    self.image_uploaded = true;
                    self.have_texture = true;
                }
            }
        }
    }
}

// ─── Pipeline setup ──────────────────────────────────────────────────

fn build_program(gl: &Gl) -> Result<WebGlProgram, String> {
    let vert = compile_shader(gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
    let frag = compile_shader(gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;

    let program = gl
        .create_program()
        .ok_or_else(|| "failed to create shader program".to_string())?;
    gl.attach_shader(&program, &vert);
    gl.attach_shader(&program, &frag);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        Err(gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "shader link failed".to_string()))
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, String> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| "failed to create shader".to_string())?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        Err(gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "shader compile failed".to_string()))
    }
}

fn setup_quad(gl: &Gl, program: &WebGlProgram) -> Result<(), String> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| "failed to create vertex buffer".to_string())?;
    gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));

    let verts: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
    let data = js_sys::Float32Array::from(&verts[..]);
    gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &data, Gl::STATIC_DRAW);

    let position = gl.get_attrib_location(program, "position");
    if position < 0 {
        return Err("missing position attribute".to_string());
    }
    gl.vertex_attrib_pointer_with_i32(position as u32, 2, Gl::FLOAT, false, 0, 0);
    gl.enable_vertex_attrib_array(position as u32);
    Ok(())
}

fn setup_texture(gl: &Gl) -> Result<WebGlTexture, String> {
    let texture = gl
        .create_texture()
        .ok_or_else(|| "failed to create texture".to_string())?;
    gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));
    // Panorama dimensions are not powers of two: clamp, no mipmaps.
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MIN_FILTER, Gl::LINEAR as i32);
    gl.tex_parameteri(Gl::TEXTURE_2D, Gl::TEXTURE_MAG_FILTER, Gl::LINEAR as i32);
    gl.active_texture(Gl::TEXTURE0);
    Ok(texture)
}

fn uniform(gl: &Gl, program: &WebGlProgram, name: &str) -> Result<WebGlUniformLocation, String> {
    gl.get_uniform_location(program, name)
        .ok_or_else(|| format!("missing uniform {name}"))
}

// ─── Input ───────────────────────────────────────────────────────────

fn install_drag_listeners(
    canvas: &HtmlCanvasElement,
    camera: Rc<RefCell<Camera>>,
) -> Vec<Closure<dyn FnMut(web_sys::PointerEvent)>> {
    let mut listeners = Vec::new();
    let dragging = Rc::new(Cell::new(false));

    {
        let dragging = dragging.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_: web_sys::PointerEvent| {
            dragging.set(true);
        });
        add_pointer_listener(canvas, "pointerdown", &closure);
        listeners.push(closure);
    }
    {
        let dragging = dragging.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
            if dragging.get() {
                camera.borrow_mut().rotate(
                    -(event.movement_x() as f32) * DRAG_SENSITIVITY,
                    -(event.movement_y() as f32) * DRAG_SENSITIVITY,
                );
            }
        });
        add_pointer_listener(canvas, "pointermove", &closure);
        listeners.push(closure);
    }
    for end_event in ["pointerup", "pointerleave"] {
        let dragging = dragging.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_: web_sys::PointerEvent| {
            dragging.set(false);
        });
        add_pointer_listener(canvas, end_event, &closure);
        listeners.push(closure);
    }

    listeners
}

fn add_pointer_listener(
    canvas: &HtmlCanvasElement,
    event: &str,
    closure: &Closure<dyn FnMut(web_sys::PointerEvent)>,
) {
    if canvas
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("failed to install {event} listener");
    }
}

/// Wrap a ready callback so it fires at most once; `canplay` can repeat
/// after seeks.
fn one_shot(callback: ReadyCallback) -> Rc<dyn Fn(Result<bool, String>)> {
    let fired = Cell::new(false);
    Rc::new(move |result| {
        if !fired.replace(true) {
            callback(result);
        }
    })
}
