use crate::error::Error;
use hyper::{
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server,
};
use std::{
    convert::Infallible,
    future::Future,
    net::SocketAddr,
    sync::mpsc,
    thread::{self, JoinHandle},
};
use tokio::{runtime::Runtime, sync::oneshot};
use tracing::{debug, error};

/// A request handler for the service under test.
///
/// Any `Fn(Request<Body>) -> impl Future<Output = Response<Body>>` qualifies, so a plain
/// `async fn route(request: Request<Body>) -> Response<Body>` can be handed over as is.
pub trait Handler: Clone + Send + Sync + 'static {
    type Future: Future<Output = Response<Body>> + Send + 'static;

    fn call(&self, request: Request<Body>) -> Self::Future;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Response<Body>> + Send + 'static,
{
    type Future = Fut;

    fn call(&self, request: Request<Body>) -> Self::Future {
        self(request)
    }
}

/// Serves a handler on an ephemeral port of the loopback interface until dropped.
#[derive(Debug)]
pub struct TestServer {
    local_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub fn start<H: Handler>(handler: H) -> Result<Self, Error> {
        let (addr_sender, addr_receiver) = mpsc::channel::<Result<SocketAddr, Error>>();
        let (shutdown_sender, shutdown_receiver) = oneshot::channel::<()>();

        let join_handle = thread::spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = addr_sender.send(Err(e.into()));
                    return;
                }
            };

            runtime.block_on(async move {
                let addr = SocketAddr::from(([127, 0, 0, 1], 0));

                let builder = match Server::try_bind(&addr) {
                    Ok(builder) => builder,
                    Err(e) => {
                        let _ = addr_sender.send(Err(e.into()));
                        return;
                    }
                };

                let server = builder.serve(make_service_fn(move |_| {
                    let handler = handler.clone();
                    async move {
                        Ok::<_, Infallible>(service_fn(move |request| {
                            let response = handler.call(request);
                            async move { Ok::<_, Infallible>(response.await) }
                        }))
                    }
                }));

                let _ = addr_sender.send(Ok(server.local_addr()));

                let server = server.with_graceful_shutdown(async move {
                    let _ = shutdown_receiver.await;
                });

                if let Err(e) = server.await {
                    error!(error = %e, "test server error");
                }
            });
        });

        let local_addr = addr_receiver
            .recv()
            .map_err(|_| Error::ServerStartFailed("the server thread exited early".into()))??;
        debug!(%local_addr, "test server listening");

        Ok(Self {
            local_addr,
            shutdown: Some(shutdown_sender),
            join_handle: Some(join_handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                error!("couldn't gracefully shut down the test server thread");
            }
        }
    }
}
