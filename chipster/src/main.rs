// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

extern crate chip8;
extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate sdl2;

mod looper;
mod render;

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Duration;

use chip8::{Config, Interpreter, ShiftQuirk, TimerMode};
use looper::Step;
use render::RenderBuf;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

error_chain! {
    foreign_links {
        Chip8(chip8::Error);
        Io(io::Error);
    }
}

struct CommandArgs {
    rom_file_name: String,
    cycles_per_second: u32, // default: 500
    pixel_decay_time: f32,
    vip_shift: bool,
    realtime_timers: bool,
    seed: Option<u64>,
}

impl CommandArgs {
    fn parse() -> CommandArgs {
        use clap::{App, Arg};

        let matches = App::new("chip8 emulator")
            .arg(
                Arg::with_name("ROM_FILE")
                    .help("rom file to load")
                    .required(true),
            )
            .arg(
                Arg::with_name("cycles per second")
                    .short("c")
                    .long("cycles-per-sec")
                    .value_name("cycles_per_second")
                    .help(
                        "How many Chip8 cycles should be executed per second. Values between \
                         500-1000 should be fine.",
                    )
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("pixel decay time")
                    .short("d")
                    .long("pixel-decay-time")
                    .value_name("pixel_decay_time")
                    .help("How many seconds takes for pixel from lit to non-lit")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("vip shift")
                    .long("vip-shift")
                    .help("SHR/SHL shift Vy into Vx, as on the COSMAC VIP"),
            )
            .arg(
                Arg::with_name("realtime timers")
                    .long("realtime-timers")
                    .help("Count timers down at 60 Hz instead of once per cycle"),
            )
            .arg(
                Arg::with_name("seed")
                    .long("seed")
                    .value_name("seed")
                    .help("Seed for the RND instruction")
                    .takes_value(true),
            )
            .get_matches();

        let cycles_per_second = matches
            .value_of("cycles per second")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(500);

        let pixel_decay_time = matches
            .value_of("pixel decay time")
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(0.3);

        CommandArgs {
            rom_file_name: matches.value_of("ROM_FILE").unwrap_or_default().to_string(),
            cycles_per_second,
            pixel_decay_time,
            vip_shift: matches.is_present("vip shift"),
            realtime_timers: matches.is_present("realtime timers"),
            seed: matches.value_of("seed").and_then(|s| s.parse::<u64>().ok()),
        }
    }

    fn config(&self) -> Config {
        Config {
            shift: if self.vip_shift {
                ShiftQuirk::Vip
            } else {
                ShiftQuirk::InPlace
            },
            timers: if self.realtime_timers {
                TimerMode::Realtime
            } else {
                TimerMode::PerCycle
            },
            rng_seed: self.seed,
            ..Config::with_cycles_per_second(self.cycles_per_second)
        }
    }
}

fn read_rom<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    use std::io::Read;

    let mut rom_file = File::open(path)?;
    let mut rom_buffer = Vec::new();
    rom_file.read_to_end(&mut rom_buffer)?;
    Ok(rom_buffer)
}

fn main() {
    use std::process::exit;

    env_logger::init();

    match do_run() {
        Ok(_) => exit(0),
        Err(e) => {
            println!("Error: {}", e);
            exit(1);
        }
    }
}

fn do_run() -> Result<()> {
    let args = CommandArgs::parse();
    let app = App::new(&args)?;
    app.run()
}

struct App {
    render_buf: RenderBuf,
    interpreter: Interpreter,
}

impl App {
    fn new(command_args: &CommandArgs) -> Result<App> {
        let render_buf = RenderBuf::new(command_args.pixel_decay_time);

        let rom_data = read_rom(&command_args.rom_file_name)?;
        info!("read {} ({} bytes)", command_args.rom_file_name, rom_data.len());
        let interpreter = Interpreter::start(&rom_data, command_args.config(), None)?;

        Ok(App {
            render_buf,
            interpreter,
        })
    }

    fn run(mut self) -> Result<()> {
        let ctx = sdl2::init()?;
        let video_ctx = ctx.video()?;
        let window = video_ctx
            .window("chipster", 640, 320)
            .position_centered()
            .opengl()
            .build()
            .map_err(|e| e.to_string())?;
        let mut canvas = window
            .into_canvas()
            .build()
            .map_err(|e| e.to_string())?;
        canvas.set_blend_mode(BlendMode::Blend);

        let mut events = ctx.event_pump()?;
        let timer = ctx.timer()?;

        let mut last_ticks = timer.ticks();

        looper::start_loop(|| {
            for event in events.poll_iter() {
                match event {
                    Event::Quit { .. }
                    | Event::KeyDown {
                        keycode: Some(Keycode::Escape),
                        ..
                    } => {
                        return Ok(Step::Done);
                    }

                    Event::KeyDown {
                        keycode: Some(keycode),
                        repeat: false,
                        ..
                    } => match map_keycode(keycode) {
                        Some(key) => self.interpreter.press(key),
                        None => warn!("no keypad mapping for {:?}", keycode),
                    },
                    Event::KeyUp {
                        keycode: Some(keycode),
                        ..
                    } => {
                        if let Some(key) = map_keycode(keycode) {
                            self.interpreter.release(key);
                        }
                    }
                    _ => {}
                }
            }

            // The program died of a fatal error; report it.
            if !self.interpreter.is_running() {
                self.interpreter.stop()?;
                return Ok(Step::Done);
            }

            let current_ticks = timer.ticks();
            let dt = Duration::from_millis((current_ticks - last_ticks) as u64);
            last_ticks = current_ticks;

            if let Some(snapshot) = self.interpreter.snapshot() {
                self.render_buf.update(&snapshot.frame, dt.as_secs_f32());
            }
            self.render(&mut canvas)?;

            Ok(Step::Cont)
        })?;

        self.interpreter.stop()?;
        Ok(())
    }

    fn render(&mut self, canvas: &mut Canvas<Window>) -> Result<()> {
        let clear_color = Color::RGB(250, 242, 219);
        canvas.set_draw_color(clear_color);
        canvas.clear();

        let (win_width, win_height) = canvas.window().size();
        let w = win_width / chip8::DISPLAY_WIDTH as u32;
        let h = win_height / chip8::DISPLAY_HEIGHT as u32;

        for y in 0..chip8::DISPLAY_HEIGHT {
            for x in 0..chip8::DISPLAY_WIDTH {
                let intensity = self.render_buf.get_intensity(x, y);
                if intensity > 0.0 {
                    let solid_color = Color::RGBA(5, 31, 38, (intensity * 255.0) as u8);
                    canvas.set_draw_color(solid_color);

                    let rect = Rect::new(x as i32 * w as i32, y as i32 * h as i32, w, h);
                    canvas.fill_rect(rect)?;
                }
            }
        }

        canvas.present();
        Ok(())
    }
}

fn map_keycode(k: Keycode) -> Option<u8> {
    // Classical layout, see http://devernay.free.fr/hacks/chip8/C8TECH10.HTM#2.3
    // +---+---+---+---+
    // | 1 | 2 | 3 | C |
    // +---+---+---+---+
    // | 4 | 5 | 6 | D |
    // +---+---+---+---+
    // | 7 | 8 | 9 | E |
    // +---+---+---+---+
    // | A | 0 | B | F |
    // +---+---+---+---+

    match k {
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Num4 => Some(0xC),

        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::R => Some(0xD),

        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::F => Some(0xE),

        Keycode::Z => Some(0xA),
        Keycode::X => Some(0x0),
        Keycode::C => Some(0xB),
        Keycode::V => Some(0xF),
        _ => None,
    }
}
