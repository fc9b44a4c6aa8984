use std::path::Path;

use indexmap::IndexMap;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::COOKIE;
use serde::{Deserialize, Serialize};

use crate::io::session::Session;
use crate::io::{StateStore, StoreError};
use crate::model::state::AppState;
use crate::model::tab::{MAIN_TAB_ID, Tab};
use crate::model::task::Task;

/// Remote persistence: every mutation is one synchronous request against the
/// TaskHive REST API. Responses carry server-assigned ids, which callers
/// adopt in place of locally generated ones.
///
/// There is no retry and no explicit timeout: a failed request surfaces as
/// an error for that single action, and the caller reverts its optimistic
/// state change.
pub struct RemoteStore {
    base_url: String,
    client: Client,
    session: Session,
}

// ---------------------------------------------------------------------------
// Wire types (the server speaks camelCase)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TabWire {
    tab_id: String,
    tab_name: String,
}

impl From<TabWire> for Tab {
    fn from(wire: TabWire) -> Tab {
        Tab::new(wire.tab_id, wire.tab_name)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewTabWire<'a> {
    tab_name: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskWire {
    task_id: String,
    text: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
}

impl TaskWire {
    fn into_task(self, tab_id: &str) -> Task {
        Task {
            id: self.task_id,
            text: self.text,
            description: self.description,
            completed: self.completed,
            tab_id: tab_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewTaskWire<'a> {
    tab_id: &'a str,
    text: &'a str,
    description: &'a str,
    completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveTabWire {
    active_tab_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// Store implementation
// ---------------------------------------------------------------------------

impl RemoteStore {
    pub fn new(base_url: &str, data_dir: &Path) -> Result<Self, StoreError> {
        let client = Client::builder().build()?;
        Ok(RemoteStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session: Session::load(data_dir),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_cookie(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.cookie() {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    fn fetch_active_tab(&self) -> Result<Option<String>, StoreError> {
        let request = self
            .with_cookie(self.client.get(self.url("/api/user/preferences/active-tab")));
        let resp = check_response(request.send()?)?;
        let wire: ActiveTabWire = resp.json()?;
        if wire.active_tab_id.is_empty() {
            Ok(None)
        } else {
            Ok(Some(wire.active_tab_id))
        }
    }
}

impl StateStore for RemoteStore {
    fn load(&mut self) -> Result<AppState, StoreError> {
        let request = self.with_cookie(self.client.get(self.url("/api/tabs")));
        let resp = check_response(request.send()?)?;
        let wires: Vec<TabWire> = resp.json()?;
        let mut tabs: Vec<Tab> = wires.into_iter().map(Tab::from).collect();
        // The server may not materialize the built-in tab until first use
        if !tabs.iter().any(|t| t.id == MAIN_TAB_ID) {
            tabs.insert(0, Tab::main());
        }

        // Saved preference wins when it still names an existing tab; a
        // missing or stale preference falls back to main
        let active_tab_id = match self.fetch_active_tab() {
            Ok(Some(id)) if tabs.iter().any(|t| t.id == id) => id,
            Ok(_) => MAIN_TAB_ID.to_string(),
            Err(StoreError::AuthRequired) => return Err(StoreError::AuthRequired),
            Err(_) => MAIN_TAB_ID.to_string(),
        };

        let mut state = AppState {
            tabs,
            active_tab_id,
            tasks: IndexMap::new(),
        };

        // Only the active tab's tasks load now; the rest load on first switch
        let active = state.active_tab_id.clone();
        if let Some(tasks) = self.load_tab_tasks(&active)? {
            state.tasks.insert(active, tasks);
        }
        Ok(state)
    }

    fn load_tab_tasks(&mut self, tab_id: &str) -> Result<Option<Vec<Task>>, StoreError> {
        let request = self.with_cookie(
            self.client.get(self.url(&format!("/api/tasks/{}", tab_id))),
        );
        let resp = check_response(request.send()?)?;
        let wires: Vec<TaskWire> = resp.json()?;
        Ok(Some(
            wires.into_iter().map(|w| w.into_task(tab_id)).collect(),
        ))
    }

    fn create_tab(&mut self, tab: &Tab) -> Result<Tab, StoreError> {
        let request = self
            .with_cookie(self.client.post(self.url("/api/tabs")))
            .json(&NewTabWire { tab_name: &tab.name });
        let resp = check_response(request.send()?)?;
        let wire: TabWire = resp.json()?;
        Ok(wire.into())
    }

    fn delete_tab(&mut self, tab_id: &str) -> Result<(), StoreError> {
        let request = self.with_cookie(
            self.client.delete(self.url(&format!("/api/tabs/{}", tab_id))),
        );
        check_response(request.send()?)?;
        Ok(())
    }

    fn create_task(&mut self, task: &Task) -> Result<Task, StoreError> {
        let request = self
            .with_cookie(self.client.post(self.url("/api/tasks")))
            .json(&NewTaskWire {
                tab_id: &task.tab_id,
                text: &task.text,
                description: &task.description,
                completed: task.completed,
            });
        let resp = check_response(request.send()?)?;
        let wire: TaskWire = resp.json()?;
        Ok(wire.into_task(&task.tab_id))
    }

    fn update_task(&mut self, task: &Task) -> Result<Task, StoreError> {
        let request = self
            .with_cookie(self.client.put(
                self.url(&format!("/api/tasks/{}/{}", task.tab_id, task.id)),
            ))
            .json(&serde_json::json!({ "completed": task.completed }));
        let resp = check_response(request.send()?)?;
        let wire: TaskWire = resp.json()?;
        Ok(wire.into_task(&task.tab_id))
    }

    fn delete_task(&mut self, tab_id: &str, task_id: &str) -> Result<(), StoreError> {
        let request = self.with_cookie(
            self.client
                .delete(self.url(&format!("/api/tasks/{}/{}", tab_id, task_id))),
        );
        check_response(request.send()?)?;
        Ok(())
    }

    fn set_active_tab(&mut self, tab_id: &str) -> Result<(), StoreError> {
        let request = self
            .with_cookie(self.client.put(self.url("/api/user/preferences/active-tab")))
            .json(&ActiveTabWire {
                active_tab_id: tab_id.to_string(),
            });
        check_response(request.send()?)?;
        Ok(())
    }

    fn commit(&mut self, _state: &AppState) -> Result<(), StoreError> {
        // Every mutation was already persisted by its own request
        Ok(())
    }
}

/// Map a response to an error unless it succeeded. A 401 becomes the
/// dedicated not-logged-in error; other failures carry the server's message.
pub(crate) fn check_response(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(StoreError::AuthRequired);
    }
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<ApiMessage>()
        .ok()
        .and_then(|m| m.message.or(m.error))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}
