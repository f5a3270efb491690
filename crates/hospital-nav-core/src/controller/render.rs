use crate::{CoreResult, ImageRole, NavError, PathResponse, PathService, PathView};

use std::{future::Future, panic::Location, sync::Arc};

use error_location::ErrorLocation;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What ended up on screen for one response.
#[derive(Debug)]
pub enum Rendered {
    /// A path list was shown.
    Route {
        /// Number of nodes in the list.
        nodes: usize,
        /// Map fetch started after the list, if enabled.
        graph_image: Option<GraphImageTask>,
    },
    /// An image was shown.
    Image {
        /// Display slot the image went to.
        role: ImageRole,
        /// Size of the shown image.
        byte_len: usize,
    },
}

/// Handle on the map fetch that follows a rendered path list.
///
/// The task renders into the view on its own; it is not ordered against
/// anything the caller shows after the list.
#[derive(Debug)]
pub struct GraphImageTask {
    handle: JoinHandle<CoreResult<()>>,
}

impl GraphImageTask {
    pub(crate) fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = CoreResult<()>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(task),
        }
    }

    /// Wait for the fetch and its render to finish.
    pub async fn join(self) -> CoreResult<()> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(NavError::TaskFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Stop the fetch if it is still running.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Turns backend responses into view calls. Shared by both controllers.
pub(crate) struct ResponseRenderer<S, V> {
    service: Arc<S>,
    view: Arc<V>,
    show_graph_after_route: bool,
}

impl<S: PathService, V: PathView> ResponseRenderer<S, V> {
    pub(crate) fn new(service: Arc<S>, view: Arc<V>, show_graph_after_route: bool) -> Self {
        Self {
            service,
            view,
            show_graph_after_route,
        }
    }

    pub(crate) async fn render(&self, response: PathResponse) -> CoreResult<Rendered> {
        match response {
            PathResponse::Route(route) => {
                self.view.show_path(&route.path);
                debug!(nodes = route.path.len(), distance = ?route.distance, "Path rendered");

                let graph_image = self.show_graph_after_route.then(|| self.spawn_graph_image());

                Ok(Rendered::Route {
                    nodes: route.path.len(),
                    graph_image,
                })
            }
            PathResponse::Image(image) => {
                self.view.show_image(&image, ImageRole::PathOverlay);
                Ok(Rendered::Image {
                    role: ImageRole::PathOverlay,
                    byte_len: image.len(),
                })
            }
            PathResponse::ImageLink(link) => {
                let image = self.service.fetch_image(&link).await?;
                self.view.show_image(&image, ImageRole::PathOverlay);
                Ok(Rendered::Image {
                    role: ImageRole::PathOverlay,
                    byte_len: image.len(),
                })
            }
        }
    }

    /// Fetch the static map in the background; the view is the completion
    /// callback.
    pub(crate) fn spawn_graph_image(&self) -> GraphImageTask {
        let service = Arc::clone(&self.service);
        let view = Arc::clone(&self.view);

        GraphImageTask::spawn(async move {
            match service.graph_image().await {
                Ok(image) => {
                    view.show_image(&image, ImageRole::GraphMap);
                    Ok(())
                }
                Err(e) => {
                    warn!(error = %e, "Graph image fetch failed");
                    Err(e)
                }
            }
        })
    }
}
