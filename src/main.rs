mod app;
mod feed;
mod panel;
mod signal;
mod state;

use app::App;

fn main() {
    App::new().run()
}
