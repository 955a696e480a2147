//! A bar with a known total next to one whose total is unknown.

use std::thread;
use std::time::Duration;

use multibar::{MultiBar, UNDEFINED};

fn main() {
    let mb = MultiBar::new();
    let copy = mb.new_bar(300, "Copy");
    let scan = mb.new_bar(UNDEFINED, "Scan");
    mb.start();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..300 {
                copy.add(1);
                thread::sleep(Duration::from_millis(10));
            }
        });
        s.spawn(|| {
            // The sweep marker is driven by accumulated progress, not time.
            for _ in 0..600 {
                scan.add(1);
                thread::sleep(Duration::from_millis(5));
            }
            scan.finish();
        });
    });
}
