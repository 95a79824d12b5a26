//! semafor main entrypoint.

use semafor::run;
use semafor::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
