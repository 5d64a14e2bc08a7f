use {
    crate::{InferError, Pose, PosePipeline, PoseError},
    futures_core::Stream,
    futures_sink::Sink,
    image::Image,
    std::{
        collections::VecDeque,
        fmt,
        future::Future,
        pin::Pin,
        sync::{Arc, Mutex},
        task::{Context, Poll, Waker},
    },
};

type PoseFuture = Pin<Box<dyn Future<Output = Result<Vec<Pose>, PoseError>> + Send>>;

/// Asynchronous front-end over a shared `PosePipeline`.
///
/// Implements `Sink<Image>` to accept frames and
/// `Stream<Item = Result<Vec<Pose>, PoseError>>` to produce their poses.
/// Each image sent maps 1:1 to one item from the stream, in order. Closing
/// the sink ends the stream once all pending images are processed.
///
/// Inference runs on tokio's blocking pool with the pipeline locked, so
/// several streams may share one pipeline.
pub struct PoseStream {
    pipeline: Arc<Mutex<PosePipeline>>,
    pending: VecDeque<Image>,
    closed: bool,
    inflight: Option<PoseFuture>,
    stream_waker: Option<Waker>,
}

impl fmt::Debug for PoseStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseStream")
            .field("pending", &self.pending.len())
            .field("closed", &self.closed)
            .field("inflight", &self.inflight.is_some())
            .finish()
    }
}

impl PoseStream {
    pub fn new(pipeline: PosePipeline) -> Self {
        Self::shared(Arc::new(Mutex::new(pipeline)))
    }

    pub fn shared(pipeline: Arc<Mutex<PosePipeline>>) -> Self {
        Self {
            pipeline,
            pending: VecDeque::new(),
            closed: false,
            inflight: None,
            stream_waker: None,
        }
    }

    pub fn pipeline(&self) -> &Arc<Mutex<PosePipeline>> {
        &self.pipeline
    }

    fn start_prediction(&mut self, image: Image) {
        let pipeline = Arc::clone(&self.pipeline);
        self.inflight = Some(Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                let mut pipeline = pipeline
                    .lock()
                    .map_err(|_| InferError::Runtime("pose pipeline lock poisoned".to_string()))?;
                pipeline.predict(&image)
            })
            .await
            .map_err(|e| InferError::Runtime(format!("pose task failed: {e}")))?
        }));
    }

    fn poll_inflight(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<Vec<Pose>, PoseError>>> {
        match self.inflight.as_mut() {
            Some(fut) => match fut.as_mut().poll(cx) {
                Poll::Ready(result) => {
                    self.inflight = None;
                    Poll::Ready(Some(result))
                }
                Poll::Pending => Poll::Pending,
            },
            None => Poll::Ready(None),
        }
    }
}

impl Sink<Image> for PoseStream {
    type Error = PoseError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: Image) -> Result<(), PoseError> {
        let this = self.get_mut();
        if this.closed {
            return Err(PoseError::InvalidInput("pose stream is closed".to_string()));
        }
        this.pending.push_back(item);
        if let Some(waker) = this.stream_waker.take() {
            waker.wake();
        }
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        let this = self.get_mut();
        this.closed = true;
        if let Some(waker) = this.stream_waker.take() {
            waker.wake();
        }
        Poll::Ready(Ok(()))
    }
}

impl Stream for PoseStream {
    type Item = Result<Vec<Pose>, PoseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.inflight.is_none() {
            if let Some(image) = this.pending.pop_front() {
                this.start_prediction(image);
            }
        }
        if this.inflight.is_some() {
            return this.poll_inflight(cx);
        }

        if this.closed {
            return Poll::Ready(None);
        }

        this.stream_waker = Some(cx.waker().clone());
        Poll::Pending
    }
}
