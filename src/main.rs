use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use logpane::{Config, Logger};

#[tokio::main]
async fn main() -> Result<()> {
    let logger = Arc::new(Logger::new(Config::default()));

    // Console sink first: these lines go to stdout
    logger.info("Starting logpane demo");
    logger.warning("No panel yet, this goes to stdout");

    // From here on everything is mirrored into the log window.
    // close_on_exit: pressing q/Esc in the window ends the demo.
    logger.open_log_window(true);

    let worker = Arc::clone(&logger);
    std::thread::Builder::new()
        .name("worker".to_string())
        .spawn(move || {
            for i in 0..30 {
                worker.info(format!("worker tick {}", i));
                std::thread::sleep(Duration::from_millis(400));
            }
            let err = std::io::Error::new(std::io::ErrorKind::Other, "simulated failure");
            worker.exception_with(&err, "Demo exception with context");
        })?;

    // Modal prompt in the window; blocks off the runtime
    let answer = tokio::task::spawn_blocking({
        let logger = Arc::clone(&logger);
        move || logger.read_line()
    })
    .await?;
    logger.info(format!("Prompt returned {:?}", answer));

    // Keep running until the user closes the window (which exits)
    loop {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
