use ambient::SamplerSnapshot;
use iced::futures::SinkExt;
use iced::{Subscription, stream};
use tokio::sync::watch;

const SUBSCRIPTION_CHANNEL_CAPACITY: usize = 8;

/// Forwards every sampler snapshot into the iced update loop.
///
/// The current value is sent first, then each change; the stream ends when
/// the sampler is dropped.
pub fn sampler_subscription(
    updates: watch::Receiver<SamplerSnapshot>,
) -> Subscription<SamplerSnapshot> {
    Subscription::run_with_id("dominant-color", snapshot_stream(updates))
}

fn snapshot_stream(
    mut updates: watch::Receiver<SamplerSnapshot>,
) -> impl iced::futures::Stream<Item = SamplerSnapshot> {
    stream::channel(
        SUBSCRIPTION_CHANNEL_CAPACITY,
        move |mut output| async move {
            loop {
                let snapshot = updates.borrow_and_update().clone();
                if output.send(snapshot).await.is_err() {
                    break;
                }
                if updates.changed().await.is_err() {
                    break;
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use ambient::{ColorSample, SamplerSnapshot, SamplerState};
    use iced::futures::StreamExt;
    use tokio::runtime;
    use tokio::sync::watch;

    use super::snapshot_stream;

    #[test]
    fn stream_emits_current_value_then_changes_then_ends() {
        let (tx, rx) = watch::channel(SamplerSnapshot::default());

        let runtime = runtime::Builder::new_current_thread()
            .build()
            .expect("test runtime");

        runtime.block_on(async move {
            let mut stream = std::pin::pin!(snapshot_stream(rx));

            let first = stream.next().await.expect("current snapshot");
            assert_eq!(first.state, SamplerState::Idle);

            tx.send_modify(|snapshot| {
                snapshot.state = SamplerState::Ready;
                snapshot.color = ColorSample::rgb(1, 2, 3);
            });
            let second = stream.next().await.expect("changed snapshot");
            assert_eq!(second.color, ColorSample::rgb(1, 2, 3));

            drop(tx);
            assert!(stream.next().await.is_none());
        });
    }
}
