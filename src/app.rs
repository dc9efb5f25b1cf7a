use std::sync::Arc;
use std::thread;

use crossbeam::channel::Receiver;

use crate::feed::{EventFeed, MonitorEvent};
use crate::panel::{spawn_console_thread, VirtualPanel};
use crate::signal::SignalSystem;
use crate::state::Config;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wires the virtual panel, the event feed, and the signal pipeline
/// together. A missing config file means defaults; a broken one is
/// reported and ignored — bring-up never stops the monitor.
pub struct App {
    system: SignalSystem,
}

impl App {
    pub fn new() -> Self {
        let config = match Config::restore() {
            Ok(Some(config)) => config,
            Ok(None) => {
                // First run: write the defaults out as a template.
                let config = Config::default();
                config.save();
                config
            }
            Err(err) => {
                eprintln!("Config error: {}", err);
                Config::default()
            }
        };

        let panel = VirtualPanel::new(config.amplitude_raw, config.rate_raw);
        let controls = panel.controls();

        let feed = Arc::new(EventFeed::new());
        spawn_display_thread(feed.subscribe());

        let system = SignalSystem::new(controls, feed.clone(), config.signal_options());

        let flags = system.flags();
        let tunables = system.tunables();
        let status = move || {
            format!(
                "alive: {} | rhythm: {} | rate: {} bpm | amp: {:.2} | clients: {}",
                flags.is_alive(),
                if flags.alternate_rhythm() { "arrhythmia" } else { "sinus" },
                tunables.target_rate(),
                tunables.amplitude(),
                feed.client_count(),
            )
        };

        // Persist the stick positions so the next run starts from them.
        let on_quit = move |panel: &VirtualPanel| {
            let mut config = config.clone();
            let (amplitude_raw, rate_raw) = panel.positions();

            config.remember_panel(amplitude_raw, rate_raw);
            config.save();
        };

        spawn_console_thread(panel, status, on_quit);

        banner();
        Self { system }
    }

    pub fn run(self) -> ! {
        self.system.run()
    }
}

/// A local display client: subscribes like a remote viewer would and
/// prints each event as one JSON line.
fn spawn_display_thread(events: Receiver<MonitorEvent>) {
    let run = move || {
        while let Ok(event) = events.recv() {
            if let Ok(json) = serde_json::to_string(&event) {
                println!("{}", json);
            }
        }
    };

    thread::Builder::new()
        .name("display".to_string())
        .spawn(run)
        .unwrap();
}

fn banner() {
    println!("flatliner {}", VERSION);
    println!("commands: rhythm, kill, amp <0-4095>, rate <0-4095>, status, quit");
}
