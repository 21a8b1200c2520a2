//! Background model loading
//!
//! The OBJ is parsed on its own thread so the window opens and the timeline
//! starts immediately. The result comes back once over a oneshot channel; the
//! frame loop polls it, tests can simply wait on it.

use std::path::PathBuf;
use std::thread;

use futures::channel::oneshot;

use super::{load_model, AssetError, CakeModel};

/// Lifecycle of the single model load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

type LoadResult = Result<CakeModel, AssetError>;

/// Handle to a model load that may still be running
#[derive(Debug)]
pub struct PendingModel {
    receiver: Option<oneshot::Receiver<LoadResult>>,
}

impl PendingModel {
    /// Starts loading `path` on a worker thread
    pub fn spawn(path: PathBuf) -> Self {
        let (sender, receiver) = oneshot::channel();
        log::info!("Loading model {}", path.display());

        let worker = thread::Builder::new()
            .name("model-loader".to_string())
            .spawn(move || {
                let result = load_model(&path);
                if sender.send(result).is_err() {
                    log::debug!("Model load finished after its receiver was dropped");
                }
            });

        match worker {
            Ok(_) => Self {
                receiver: Some(receiver),
            },
            Err(err) => Self::from_result(Err(AssetError::Spawn(err))),
        }
    }

    /// Wraps an already known outcome
    pub fn from_result(result: LoadResult) -> Self {
        let (sender, receiver) = oneshot::channel();
        // The receiver is alive, so this cannot fail
        let _ = sender.send(result);
        Self {
            receiver: Some(receiver),
        }
    }

    /// Returns the outcome the first time it is available, `None` otherwise
    pub fn poll(&mut self) -> Option<LoadResult> {
        let receiver = self.receiver.as_mut()?;
        let outcome = match receiver.try_recv() {
            Ok(Some(result)) => result,
            Ok(None) => return None,
            Err(oneshot::Canceled) => Err(AssetError::LoaderDropped),
        };
        self.receiver = None;
        Some(outcome)
    }

    /// Blocks until the load finishes
    pub fn wait(mut self) -> LoadResult {
        match self.receiver.take() {
            Some(receiver) => pollster::block_on(receiver).unwrap_or(Err(AssetError::LoaderDropped)),
            None => Err(AssetError::AlreadyDelivered),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn ready_result_is_delivered_once() {
        let mut pending = PendingModel::from_result(Ok(CakeModel::default()));
        assert!(matches!(pending.poll(), Some(Ok(_))));
        assert!(pending.poll().is_none());
    }

    #[test]
    fn missing_file_fails_without_panicking() {
        let pending = PendingModel::spawn(PathBuf::from("no/such/cake.obj"));
        assert!(matches!(pending.wait(), Err(AssetError::Obj { .. })));
    }

    #[test]
    fn worker_loads_obj_from_disk() {
        let path = std::env::temp_dir().join(format!("party_loader_{}.obj", std::process::id()));
        {
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(file, "o Candle\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
        }

        let model = PendingModel::spawn(path.clone()).wait().unwrap();
        assert_eq!(model.candles().count(), 1);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn polling_eventually_sees_the_result() {
        let mut pending = PendingModel::spawn(PathBuf::from("no/such/cake.obj"));
        let mut outcome = None;
        for _ in 0..500 {
            outcome = pending.poll();
            if outcome.is_some() {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(2));
        }
        assert!(matches!(outcome, Some(Err(_))));
    }
}
