//! Host-side helper: `serve` builds the wasm bundle and serves `static/`
//! (optionally through ngrok); `preview` runs the hero headless and prints a
//! frame as text.

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::PathBuf;
    use std::process::{Command as Process, Stdio};

    use anyhow::{bail, Context, Result};
    use clap::{Parser, Subcommand};
    use dotfield::raster::BitmapRasterizer;
    use dotfield::{Hero, HeroConfig, InputEvent, RecordingSurface, Viewport};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Opacity ramp for the text preview, darkest first.
    const RAMP: [char; 5] = [' ', '.', ':', 'o', '@'];

    #[derive(Parser)]
    #[command(name = "dotfield", about, version)]
    pub struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Build the wasm bundle into static/pkg and serve static/ locally
        Serve {
            #[arg(long, default_value_t = 8000)]
            port: u16,
            /// Expose the server through an ngrok tunnel
            #[arg(long)]
            tunnel: bool,
            /// Serve the existing static/pkg without rebuilding
            #[arg(long)]
            skip_build: bool,
        },
        /// Simulate the hero without a browser and print one frame
        Preview {
            #[arg(long, default_value_t = 1200.0)]
            width: f32,
            #[arg(long, default_value_t = 600.0)]
            height: f32,
            /// Simulated time of the printed frame
            #[arg(long, default_value_t = 4000.0)]
            at_ms: f64,
            /// JSON config file (partial configs keep defaults)
            #[arg(long)]
            config: Option<PathBuf>,
            /// Override the headline text
            #[arg(long)]
            text: Option<String>,
            /// Key codes pressed once the intro has finished, e.g. `--key Space`
            #[arg(long = "key")]
            keys: Vec<String>,
            #[arg(long, default_value_t = 7)]
            seed: u64,
        },
    }

    pub fn run() -> Result<()> {
        match Cli::parse().command {
            Command::Serve {
                port,
                tunnel,
                skip_build,
            } => serve(port, tunnel, skip_build),
            Command::Preview {
                width,
                height,
                at_ms,
                config,
                text,
                keys,
                seed,
            } => {
                let mut cfg = match config {
                    Some(path) => {
                        let json = std::fs::read_to_string(&path)
                            .with_context(|| format!("reading {}", path.display()))?;
                        HeroConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
                    }
                    None => HeroConfig::default(),
                };
                if let Some(text) = text {
                    cfg.text = text;
                }
                preview(cfg, Viewport::new(width, height), at_ms, &keys, seed)
            }
        }
    }

    fn serve(port: u16, tunnel: bool, skip_build: bool) -> Result<()> {
        if !skip_build {
            println!("Building WASM pkg …");
            let status = Process::new("wasm-pack")
                .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
                .status()
                .context("wasm-pack not found in PATH (https://rustwasm.github.io/wasm-pack/)")?;
            if !status.success() {
                bail!("wasm-pack finished with errors");
            }
        }

        println!("Launching local server at http://127.0.0.1:{port} …");
        let mut server = Process::new("python3")
            .args(["-m", "http.server", &port.to_string(), "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to start http server")?;

        if tunnel {
            match Process::new("ngrok").args(["http", &port.to_string()]).spawn() {
                Ok(_) => println!("ngrok tunnel starting …"),
                Err(_) => eprintln!("ngrok not found. Install it to expose the site over the internet."),
            }
        }

        let status = server.wait().context("http server")?;
        if !status.success() {
            bail!("http server exited with {status}");
        }
        Ok(())
    }

    fn preview(cfg: HeroConfig, viewport: Viewport, at_ms: f64, keys: &[String], seed: u64) -> Result<()> {
        let intro_ms = cfg.init_ms + cfg.form_text_ms;
        let mut hero = Hero::new(cfg, viewport, Box::new(BitmapRasterizer), seed)?;
        let mut surface = RecordingSurface::new();

        let mut now = 0.0;
        let mut pressed = keys.is_empty();
        let mut stats = hero.frame(now, &mut surface);
        while now < at_ms {
            now = (now + FRAME_MS).min(at_ms);
            if !pressed && now >= intro_ms {
                for code in keys {
                    hero.push_event(InputEvent::KeyDown(code.clone()));
                    hero.push_event(InputEvent::KeyUp(code.clone()));
                }
                pressed = true;
            }
            stats = hero.frame(now, &mut surface);
        }

        let grid = hero.grid();
        for row in grid.dots().chunks(grid.cols().max(1)) {
            let line: String = row
                .iter()
                .map(|dot| {
                    let level = (dot.opacity.clamp(0.0, 1.0) * (RAMP.len() - 1) as f32).round() as usize;
                    RAMP[level]
                })
                .collect();
            println!("{}", line.trim_end());
        }
        println!(
            "stage {} · {}x{} dots · {} drawn at {at_ms} ms",
            hero.stage(),
            grid.cols(),
            grid.rows(),
            stats.drawn
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
