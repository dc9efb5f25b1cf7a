use std::io::{self, BufRead};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::atomic::AtomicCell;

use crate::signal::{AnalogInput, ControlPanel, DigitalInput, Level, ADC_MAX};

/// How long a console-triggered press holds the low level. Longer than the
/// debounce window so the tracker qualifies it as a real press.
const PRESS_HOLD: Duration = Duration::from_millis(80);

/// An analog stick position, settable from the console thread.
pub struct VirtualPot(AtomicCell<u16>);

impl VirtualPot {
    pub fn new(raw: u16) -> Self {
        Self(AtomicCell::new(raw.min(ADC_MAX)))
    }

    pub fn set(&self, raw: u16) {
        self.0.store(raw.min(ADC_MAX));
    }
}

impl AnalogInput for VirtualPot {
    fn read(&self) -> u16 {
        self.0.load()
    }
}

/// A momentary pull-up button: high when released, low while held.
pub struct VirtualButton(AtomicCell<Level>);

impl VirtualButton {
    pub fn new() -> Self {
        Self(AtomicCell::new(Level::High))
    }

    /// Presses and releases the button, holding the pressed level past the
    /// debounce window. Blocks the calling thread for the hold duration.
    pub fn tap(&self) {
        self.0.store(Level::Low);
        thread::sleep(PRESS_HOLD);
        self.0.store(Level::High);
    }
}

impl Default for VirtualButton {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitalInput for VirtualButton {
    fn level(&self) -> Level {
        self.0.load()
    }
}

/// The simulated front panel: concrete handles the console thread pokes,
/// exposed to the core as trait objects.
pub struct VirtualPanel {
    pub amplitude_stick: Arc<VirtualPot>,
    pub rate_stick: Arc<VirtualPot>,
    pub rhythm_button: Arc<VirtualButton>,
    pub kill_button: Arc<VirtualButton>,
}

impl VirtualPanel {
    pub fn new(amplitude_raw: u16, rate_raw: u16) -> Self {
        Self {
            amplitude_stick: Arc::new(VirtualPot::new(amplitude_raw)),
            rate_stick: Arc::new(VirtualPot::new(rate_raw)),
            rhythm_button: Arc::new(VirtualButton::new()),
            kill_button: Arc::new(VirtualButton::new()),
        }
    }

    pub fn controls(&self) -> ControlPanel {
        ControlPanel {
            amplitude_stick: self.amplitude_stick.clone(),
            rate_stick: self.rate_stick.clone(),
            rhythm_button: self.rhythm_button.clone(),
            kill_button: self.kill_button.clone(),
        }
    }

    /// Current raw stick positions (amplitude, rate).
    pub fn positions(&self) -> (u16, u16) {
        (self.amplitude_stick.read(), self.rate_stick.read())
    }
}

/// Reads panel commands from stdin: button taps, stick positions, a status
/// line, quit. `status` produces the line to print for the status command;
/// `on_quit` runs with the panel's final state before the process exits.
pub fn spawn_console_thread(
    panel: VirtualPanel,
    status: impl Fn() -> String + Send + 'static,
    on_quit: impl Fn(&VirtualPanel) + Send + 'static,
) {
    let run = move || {
        let stdin = io::stdin();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };

            if !handle_command(&panel, line.trim(), &status) {
                on_quit(&panel);
                process::exit(0);
            }
        }
    };

    thread::Builder::new()
        .name("console".to_string())
        .spawn(run)
        .unwrap();
}

/// Returns false when the command asks for shutdown.
fn handle_command(panel: &VirtualPanel, command: &str, status: &impl Fn() -> String) -> bool {
    let mut parts = command.split_whitespace();

    match (parts.next(), parts.next()) {
        (Some("rhythm") | Some("r"), _) => panel.rhythm_button.tap(),
        (Some("kill") | Some("k"), _) => panel.kill_button.tap(),
        (Some("amp"), Some(raw)) => match raw.parse() {
            Ok(raw) => panel.amplitude_stick.set(raw),
            Err(_) => eprintln!("amp expects a value in 0..={}", ADC_MAX),
        },
        (Some("rate"), Some(raw)) => match raw.parse() {
            Ok(raw) => panel.rate_stick.set(raw),
            Err(_) => eprintln!("rate expects a value in 0..={}", ADC_MAX),
        },
        (Some("status") | Some("s"), _) => println!("{}", status()),
        (Some("quit") | Some("q"), _) => return false,
        (None, _) => {}
        _ => eprintln!(
            "commands: rhythm, kill, amp <0-{0}>, rate <0-{0}>, status, quit",
            ADC_MAX
        ),
    }

    true
}
