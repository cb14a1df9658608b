use std::pin::Pin;
use std::task::Context;
use std::task::Poll;
use std::time::Duration;
use std::time::Instant;

use futures::channel::mpsc;
use futures::channel::mpsc::Receiver;
use futures::SinkExt;
use futures::Stream;
use futures::StreamExt;

/// Frame ticks at a fixed rate, for when there's no display to sync to.
///
/// A background thread does the sleeping and sends the time of each tick across a channel. It
/// exits as soon as this stream is dropped.
pub struct IntervalFrames {
    rx: Receiver<Instant>,
}

impl IntervalFrames {
    pub fn new(period: Duration) -> Self {
        // Only buffer one tick, so a slow consumer doesn't get a burst of stale frames.
        let (mut tx, rx) = mpsc::channel(1);

        std::thread::spawn(move || {
            futures::executor::block_on(async move {
                loop {
                    std::thread::sleep(period);
                    if tx.send(Instant::now()).await.is_err() {
                        return;
                    }
                }
            })
        });

        Self { rx }
    }

    /// Roughly the rate of a typical display.
    pub fn sixty_hz() -> Self {
        Self::new(Duration::from_secs(1) / 60)
    }
}

impl Stream for IntervalFrames {
    type Item = Instant;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context) -> Poll<Option<Self::Item>> {
        self.rx.poll_next_unpin(cx)
    }
}
