//! Signed-in workspaces keyed by session cookie

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::models::Session;

use super::controller::{LibraryController, RemoteCall};

/// Everything one signed-in browser works with
pub struct Workspace {
    pub session: Session,
    pub controller: LibraryController,
}

pub type SharedWorkspace = Arc<Mutex<Workspace>>;

/// Run one controller operation against a shared workspace.
///
/// The lock is held to prepare the call and again to apply its completion,
/// never while the canister is answering.
pub async fn perform<F>(workspace: &SharedWorkspace, prepare: F)
where
    F: FnOnce(&mut LibraryController) -> Option<RemoteCall>,
{
    let (backend, call) = {
        let mut guard = workspace.lock().await;
        let Some(call) = prepare(&mut guard.controller) else {
            return;
        };
        (guard.controller.backend(), call)
    };

    let completion = call.run(backend.as_ref()).await;
    workspace.lock().await.controller.complete(completion);
}

#[derive(Clone, Default)]
pub struct SessionStore {
    workspaces: Arc<RwLock<HashMap<Uuid, SharedWorkspace>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workspace and return its session id
    pub async fn open(&self, workspace: Workspace) -> Uuid {
        let id = Uuid::new_v4();
        self.workspaces
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(workspace)));
        id
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedWorkspace> {
        self.workspaces.read().await.get(id).cloned()
    }

    /// Drop a workspace; returns whether it existed
    pub async fn close(&self, id: &Uuid) -> bool {
        self.workspaces.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.workspaces.read().await.len()
    }
}
