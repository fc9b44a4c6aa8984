use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde::Deserialize;

use crate::io::StoreError;
use crate::io::remote_store::check_response;

/// Saved login session for the remote backend.
///
/// The server uses cookie-based sessions; the cookie pair is kept in
/// `<data_dir>/session` so CLI invocations and the TUI share one login.
pub struct Session {
    path: PathBuf,
    cookie: Option<String>,
}

impl Session {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("session");
        let cookie = fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Session { path, cookie }
    }

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    fn save(&mut self, cookie: String) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::WriteError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&self.path, &cookie).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        self.cookie = Some(cookie);
        Ok(())
    }

    fn clear(&mut self) {
        let _ = fs::remove_file(&self.path);
        self.cookie = None;
    }
}

/// Result of `GET /api/auth/status`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_logged_in: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    username: Option<String>,
}

/// Query the server for the current login state
pub fn auth_status(
    client: &Client,
    base_url: &str,
    session: &Session,
) -> Result<AuthStatus, StoreError> {
    let mut request = client.get(format!("{}/api/auth/status", base_url));
    if let Some(cookie) = session.cookie() {
        request = request.header(COOKIE, cookie);
    }
    let resp = check_response(request.send()?)?;
    Ok(resp.json()?)
}

/// Log in and store the returned session cookie.
/// Returns the username the server reports (falls back to the one supplied).
pub fn login(
    client: &Client,
    base_url: &str,
    session: &mut Session,
    username: &str,
    password: &str,
) -> Result<String, StoreError> {
    let resp = client
        .post(format!("{}/api/auth/login", base_url))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .send()?;

    let status = resp.status();
    if !status.is_success() {
        // A 401 here means bad credentials, not a missing session
        let message = api_message(resp).unwrap_or_else(|| "login failed".to_string());
        return Err(StoreError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let cookie = extract_session_cookie(&resp).ok_or(StoreError::Api {
        status: status.as_u16(),
        message: "server did not set a session cookie".to_string(),
    })?;
    session.save(cookie)?;

    let body: LoginResponse = resp.json()?;
    Ok(body.username.unwrap_or_else(|| username.to_string()))
}

/// Log out server-side and forget the local session cookie.
/// The local cookie is cleared even if the server call fails.
pub fn logout(client: &Client, base_url: &str, session: &mut Session) -> Result<(), StoreError> {
    let mut request = client.post(format!("{}/api/auth/logout", base_url));
    if let Some(cookie) = session.cookie() {
        request = request.header(COOKIE, cookie);
    }
    let result = request.send();
    session.clear();
    match result {
        Ok(resp) => {
            check_response(resp)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Pull the session cookie pair out of the Set-Cookie headers
fn extract_session_cookie(resp: &reqwest::blocking::Response) -> Option<String> {
    resp.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.trim_start().starts_with("session="))
        .map(|pair| pair.trim().to_string())
}

fn api_message(resp: reqwest::blocking::Response) -> Option<String> {
    #[derive(Deserialize)]
    struct Body {
        #[serde(default)]
        error: Option<String>,
        #[serde(default)]
        message: Option<String>,
    }
    let body: Body = resp.json().ok()?;
    body.message.or(body.error)
}
