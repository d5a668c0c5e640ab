use std::future::Future;
use tracing::{debug, info};

use crate::core::api::ApiClient;
use crate::core::model::{
    MediaServerCreate, MediaServerRead, MediaServerUpdate, NEW_SERVER_ID, Selection, ServerTarget,
};
use crate::ui::toast::{ToastQueue, ToastType};

/// Result of one refresh call when refreshing several servers at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub server_name: String,
    pub result: Result<String, String>,
}

/// Case-insensitive "success" marker in a connection test reply.
///
/// The backend only returns free text here, so this is the whole contract.
pub fn is_success_message(message: &str) -> bool {
    message.to_lowercase().contains("success")
}

/// Cached server list plus the id the edit form is bound to.
///
/// Network calls are returned as `'static` futures so the caller can hand
/// them to `Task::perform`; the snapshot is only replaced by `apply_snapshot`.
#[derive(Debug)]
pub struct MediaServerService {
    api: ApiClient,
    servers: Vec<MediaServerRead>,
    loading: bool,
    target: ServerTarget,
}

impl MediaServerService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            servers: Vec::new(),
            loading: true,
            target: ServerTarget::New,
        }
    }

    pub fn servers(&self) -> &[MediaServerRead] {
        &self.servers
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn target(&self) -> ServerTarget {
        self.target
    }

    pub fn set_target(&mut self, target: ServerTarget) {
        if self.target != target {
            debug!("Media server target set to {}", target.id());
        }
        self.target = target;
    }

    /// The targeted server, or the placeholder when it is not in the snapshot.
    pub fn selected(&self) -> Selection {
        match self.target {
            ServerTarget::New => Selection::New,
            ServerTarget::Existing(id) => self
                .servers
                .iter()
                .find(|s| s.id == id)
                .cloned()
                .map(Selection::Existing)
                .unwrap_or(Selection::New),
        }
    }

    /// Snapshot membership. Unknown non-placeholder ids raise an error toast.
    pub fn media_server_exists(&self, id: i64, toasts: &mut ToastQueue) -> bool {
        if id == NEW_SERVER_ID {
            return false;
        }
        let exists = self.servers.iter().any(|s| s.id == id);
        if !exists {
            toasts.push(
                format!("Media Server with ID {id} does not exist!"),
                ToastType::Error,
            );
        }
        exists
    }

    // ── Snapshot ──

    /// Mark the snapshot as reloading and return the fetch.
    pub fn reload(&mut self) -> impl Future<Output = Result<Vec<MediaServerRead>, String>> + use<> {
        self.loading = true;
        let api = self.api.clone();
        async move { api.list().await.map_err(|e| e.user_message()) }
    }

    pub fn apply_snapshot(&mut self, result: Result<Vec<MediaServerRead>, String>) -> Result<(), String> {
        self.loading = false;
        let servers = result?;
        info!("Loaded {} media servers", servers.len());
        self.servers = servers;
        Ok(())
    }

    // ── Backend operations ──

    pub fn add_media_server(
        &self,
        data: MediaServerCreate,
    ) -> impl Future<Output = Result<MediaServerRead, String>> + use<> {
        let api = self.api.clone();
        async move {
            info!("Creating media server '{}'", data.name);
            api.create(&data).await.map_err(|e| e.user_message())
        }
    }

    pub fn update_media_server(
        &self,
        id: i64,
        partial: MediaServerUpdate,
    ) -> impl Future<Output = Result<MediaServerRead, String>> + use<> {
        let api = self.api.clone();
        async move {
            info!("Updating media server {id}");
            api.update(id, &partial).await.map_err(|e| e.user_message())
        }
    }

    pub fn delete_media_server(&self, id: i64) -> impl Future<Output = Result<String, String>> + use<> {
        let api = self.api.clone();
        async move {
            info!("Deleting media server {id}");
            api.delete(id).await.map_err(|e| e.user_message())
        }
    }

    pub fn test_media_server(
        &self,
        data: MediaServerCreate,
    ) -> impl Future<Output = Result<String, String>> + use<> {
        let api = self.api.clone();
        async move {
            debug!("Testing connection to {}", data.url);
            api.test(&data).await.map_err(|e| e.user_message())
        }
    }

    pub fn refresh_library(
        &self,
        id: i64,
        folder_path: Option<String>,
    ) -> impl Future<Output = Result<String, String>> + use<> {
        let api = self.api.clone();
        async move {
            api.refresh_library(id, folder_path.as_deref())
                .await
                .map_err(|e| e.user_message())
        }
    }

    /// Refresh every enabled server in the snapshot; calls run concurrently.
    pub fn refresh_enabled(
        &self,
        folder_path: Option<String>,
    ) -> impl Future<Output = Vec<RefreshOutcome>> + use<> {
        let api = self.api.clone();
        let targets: Vec<(i64, String)> = self
            .servers
            .iter()
            .filter(|s| s.enabled)
            .map(|s| (s.id, s.name.clone()))
            .collect();

        async move {
            if targets.is_empty() {
                debug!("No enabled media servers to refresh");
            }
            let calls = targets.into_iter().map(|(id, server_name)| {
                let api = api.clone();
                let folder_path = folder_path.clone();
                async move {
                    let result = api
                        .refresh_library(id, folder_path.as_deref())
                        .await
                        .map_err(|e| e.user_message());
                    RefreshOutcome {
                        server_name,
                        result,
                    }
                }
            });
            futures::future::join_all(calls).await
        }
    }
}
