use std::path::{Path, PathBuf};

use clap::Parser;
use client::{CanvasClient, CanvasEvent, ChannelListener};
use log::{debug, info};
use shared::{graphics::canvas::Canvas, logger::log_error, networking::result::NetworkingResult};

use super::ConfigArgs;

#[derive(Parser, Debug)]
pub struct WatchCommand {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Write the canvas as PNG to this path whenever it is (re)loaded
    #[arg(long, value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Also rewrite the snapshot after this many live update batches (0 = never)
    #[arg(long, default_value_t = 0)]
    pub flush_every: usize,
}

pub async fn run(args: WatchCommand) -> NetworkingResult<()> {
    let config = args.config.load()?;
    info!(
        "Watching {}x{} canvas at {}",
        config.x_len, config.y_len, config.ws_url
    );

    let (listener, mut events) = ChannelListener::new();
    let mut client = CanvasClient::new(config, listener)?;
    client.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut canvas: Option<Canvas> = None;
    let mut batches_since_flush = 0;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, shutting down");
                break;
            }
            event = events.recv() => match event {
                Some(CanvasEvent::FullCanvas(full)) => {
                    info!("Full canvas received ({} pixels)", full.pixel_count());
                    save_snapshot(args.snapshot.as_deref(), &full);
                    canvas = Some(full);
                    batches_since_flush = 0;
                }
                Some(CanvasEvent::UpdatedPixels(pixels)) => {
                    info!("{} pixels updated", pixels.len());
                    for pixel in &pixels {
                        debug!("{} is now {}", pixel.coord, pixel.colour().name);
                    }

                    if let Some(canvas) = canvas.as_mut() {
                        pixels.iter().for_each(|pixel| canvas.update_pixel(pixel));
                        batches_since_flush += 1;
                        if args.flush_every > 0 && batches_since_flush >= args.flush_every {
                            save_snapshot(args.snapshot.as_deref(), canvas);
                            batches_since_flush = 0;
                        }
                    }
                }
                Some(CanvasEvent::Error(e)) => log_error("Canvas connection", &e),
                None => break,
            },
        }
    }

    client.close();
    Ok(())
}

fn save_snapshot(path: Option<&Path>, canvas: &Canvas) {
    let Some(path) = path else {
        return;
    };

    match canvas.to_image().save(path) {
        Ok(()) => info!("Snapshot written to {}", path.display()),
        Err(e) => log_error("Writing snapshot", &e),
    }
}
