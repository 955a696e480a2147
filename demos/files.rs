//! Several worker threads, one bar per simulated file transfer.

use std::thread;
use std::time::Duration;

use multibar::MultiBar;

fn main() {
    let files = [
        ("kernel.img", 180),
        ("rootfs.tar.zst", 420),
        ("firmware.bin", 96),
        ("locale-archive", 250),
    ];

    let mb = MultiBar::new();
    let bars: Vec<_> = files
        .iter()
        .map(|(name, size)| (mb.new_bar(*size, *name), *size))
        .collect();
    mb.start();

    thread::scope(|s| {
        for (bar, size) in &bars {
            s.spawn(move || {
                for _ in 0..*size {
                    bar.add(1);
                    thread::sleep(Duration::from_millis(7));
                }
            });
        }
    });
}
