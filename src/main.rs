use std::path::PathBuf;

use clap::Parser;
use eyre::{Report, Result, WrapErr};
use log::info;

use carver::config::Config;
use carver::prelude::*;

/// Move speed of the selected tool, in world units per second.
const TOOL_SPEED: f32 = 1.5;
/// Rotation speed of the selected tool, in radians per second.
const TOOL_TURN_SPEED: f32 = 1.2;
/// Radians of tool rotation per pixel of mouse drag.
const DRAG_SENSITIVITY: f32 = 0.01;

#[derive(Parser, Debug)]
#[command(version, about = "Carve a model interactively with clipping planes")]
struct Args {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// OBJ model to display instead of the built-in cube.
    #[arg(long)]
    model: Option<PathBuf>,
    /// Number of clipping-plane slots.
    #[arg(long)]
    planes: Option<usize>,
    /// Number of clip units offered by the renderer.
    #[arg(long)]
    max_clip_planes: Option<usize>,
}

/// A simulated tracked tool driven from the keyboard and mouse.
struct SimulatedTool {
    id: ToolId,
    pose: Transform,
}

/// The simulated tools and which one the keyboard and mouse drive.
#[derive(Default)]
struct ToolRig {
    tools: Vec<SimulatedTool>,
    selected: Option<usize>,
    next_id: u32,
}

impl ToolRig {
    fn selected(&mut self) -> Option<&mut SimulatedTool> {
        self.tools.get_mut(self.selected?)
    }

    fn create(&mut self, engine: &mut Engine) {
        let id = ToolId(self.next_id);
        self.next_id += 1;
        engine.handle_tool_event(ToolEvent::Created {
            tool: id,
            capabilities: ToolCapabilities::LOCATOR,
        });
        self.tools.push(SimulatedTool {
            id,
            pose: Transform::default(),
        });
        self.selected = Some(self.tools.len() - 1);
    }

    fn destroy_selected(&mut self, engine: &mut Engine) {
        let Some(index) = self.selected else {
            return;
        };
        let tool = self.tools.remove(index);
        engine.handle_tool_event(ToolEvent::Destroyed { tool: tool.id });
        self.selected = (!self.tools.is_empty()).then(|| index.min(self.tools.len() - 1));
    }

    fn cycle(&mut self) {
        if !self.tools.is_empty() {
            self.selected = Some(self.selected.map_or(0, |i| (i + 1) % self.tools.len()));
        }
    }

    fn send(&mut self, engine: &mut Engine, event: impl FnOnce(ToolId) -> ToolEvent) {
        if let Some(tool) = self.selected() {
            let event = event(tool.id);
            engine.handle_tool_event(event);
        }
    }

    /// Apply `change` to the selected pose and report the new pose.
    fn move_selected(&mut self, engine: &mut Engine, change: impl FnOnce(&mut Transform)) {
        if let Some(tool) = self.selected() {
            change(&mut tool.pose);
            let event = ToolEvent::Motion {
                tool: tool.id,
                transform: tool.pose.rigid_matrix(),
            };
            engine.handle_tool_event(event);
        }
    }

    fn status(&self, engine: &Engine) -> String {
        let pool = engine.tools().pool();
        let region = engine.clip_region();
        let tool = match self.selected.map(|i| self.tools[i].id) {
            Some(id) => match engine.tools().locator_state(id) {
                Some(state) => format!("{id} [{state:?}]"),
                None => format!("{id} [no locator]"),
            },
            None => "no tool (T to create)".to_string(),
        };
        format!(
            "carver | {tool} | {}/{} planes allocated, {} active, {} dropped",
            pool.allocated_count(),
            pool.capacity(),
            pool.active_count(),
            region.dropped().len(),
        )
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(model) = &args.model {
        config.model = Some(model.clone());
    }
    if let Some(planes) = args.planes {
        config.clipping.planes = planes;
    }
    if let Some(max_clip_planes) = args.max_clip_planes {
        config.clipping.max_clip_planes = max_clip_planes;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_module(
            "carver",
            if cfg!(debug_assertions) {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            },
        )
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = load_config(&args).wrap_err("loading configuration")?;
    info!(
        "{} clipping plane slot(s), {} clip unit(s)",
        config.clipping.planes, config.clipping.max_clip_planes
    );

    let mut window = Window::new(&config.window.title, config.window.width, config.window.height)
        .map_err(Report::msg)?;
    let mut engine = Engine::from_config(&config)?;
    let mut input = InputState::default();
    let mut rig = ToolRig::default();
    let mut frame_limiter = FrameLimiter::new(&window);

    'running: loop {
        let delta = frame_limiter.wait_and_get_delta(&window) as f32 / 1000.0;

        for event in window.poll_events(&mut input) {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(width, height) => {
                    window.resize(width, height).map_err(Report::msg)?;
                    engine.resize(width, height);
                }
                WindowEvent::KeyPressed(Key::T) => rig.create(&mut engine),
                WindowEvent::KeyPressed(Key::X) => rig.destroy_selected(&mut engine),
                WindowEvent::KeyPressed(Key::Tab) => rig.cycle(),
                WindowEvent::KeyPressed(Key::W) => {
                    engine.set_render_mode(engine.render_mode().next());
                }
                WindowEvent::KeyPressed(Key::M) => engine.show_model = !engine.show_model,
                WindowEvent::KeyPressed(Key::C) => engine.center_display(),
                WindowEvent::KeyPressed(_) => {}
                WindowEvent::ButtonDown => {
                    rig.send(&mut engine, |tool| ToolEvent::ButtonPress { tool });
                }
                WindowEvent::ButtonUp => {
                    rig.send(&mut engine, |tool| ToolEvent::ButtonRelease { tool });
                }
                WindowEvent::Drag(dx, dy) => rig.move_selected(&mut engine, |pose| {
                    pose.rotate_z(-dx * DRAG_SENSITIVITY)
                        .rotate_x(dy * DRAG_SENSITIVITY);
                }),
            }
        }

        let step = Vec3::new(
            input.axis(Key::Left, Key::Right),
            input.axis(Key::Down, Key::Up),
            input.axis(Key::PageDown, Key::PageUp),
        ) * (TOOL_SPEED * delta);
        let turn = input.axis(Key::Q, Key::E) * TOOL_TURN_SPEED * delta;
        if step != Vec3::ZERO || turn != 0.0 {
            rig.move_selected(&mut engine, |pose| {
                pose.translate(step).rotate_z(turn);
            });
        }

        engine.render();
        window.set_title(&rig.status(&engine)).map_err(Report::msg)?;
        window.present(engine.frame_buffer()).map_err(Report::msg)?;
    }

    Ok(())
}
