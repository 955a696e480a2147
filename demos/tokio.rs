//! Bars updated from tokio tasks. Mutations are synchronous and never
//! block on I/O beyond the sink write, so calling them from async code is
//! fine as long as the sink itself is fast (a terminal is).

use std::time::Duration;

use multibar::MultiBar;
use tokio::time;

#[tokio::main]
async fn main() {
    let mb = MultiBar::new();
    let fetch = mb.new_bar(200, "Fetch");
    let decode = mb.new_bar(200, "Decode");
    mb.start();

    let producer = tokio::spawn({
        let fetch = fetch.clone();
        async move {
            for _ in 0..200 {
                fetch.add(1);
                time::sleep(Duration::from_millis(8)).await;
            }
        }
    });

    let consumer = tokio::spawn({
        let decode = decode.clone();
        async move {
            for _ in 0..200 {
                decode.add(1);
                time::sleep(Duration::from_millis(12)).await;
            }
        }
    });

    let _ = tokio::join!(producer, consumer);
}
