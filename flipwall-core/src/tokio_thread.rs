use std::pin::Pin;

/// A dedicated thread running a tokio runtime for background network work.
///
/// The UI and coordinator are synchronous; futures are handed over through a
/// channel and spawned on the runtime, with results reported back as wall
/// events.
pub struct TokioThread {
    tokio: TokioHandle,
    _tokio_thread_handle: std::thread::JoinHandle<()>,
}
#[derive(Clone)]
pub struct TokioHandle(tokio::sync::mpsc::Sender<Pin<Box<dyn Future<Output = ()> + Send>>>);
impl TokioHandle {
    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        if self.0.blocking_send(Box::pin(task)).is_err() {
            tracing::warn!("background runtime is gone; dropping task");
        }
    }
}
impl TokioThread {
    pub fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to build background tokio runtime");
        let (tokio_tx, mut tokio_rx) = tokio::sync::mpsc::channel(100);
        let tokio = TokioHandle(tokio_tx);

        // Create a thread for background processing
        let tokio_thread_handle = std::thread::Builder::new()
            .name("flipwall-tokio".to_string())
            .spawn(move || {
                runtime.block_on(async {
                    while let Some(task) = tokio_rx.recv().await {
                        tokio::spawn(task);
                    }
                });
            })
            .expect("failed to spawn background tokio thread");

        Self {
            tokio,
            _tokio_thread_handle: tokio_thread_handle,
        }
    }

    pub fn handle(&self) -> TokioHandle {
        self.tokio.clone()
    }

    pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
        self.tokio.spawn(task);
    }
}

impl Default for TokioThread {
    fn default() -> Self {
        Self::new()
    }
}
