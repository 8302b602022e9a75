use crate::adguard::types::{LoginRequest, SESSION_COOKIE};
use crate::auth::SessionToken;
use crate::error::{SyncError, SyncResult};
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

#[derive(Clone)]
pub struct ApplianceClient {
    http: Client,
    base_url: String, // e.g. "http://192.168.1.2:3000"
}

impl ApplianceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn session_cookie(&self, req: RequestBuilder, token: &SessionToken) -> RequestBuilder {
        req.header(
            header::COOKIE,
            format!("{}={}", SESSION_COOKIE, token.as_str()),
        )
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, username: &str, password: &str) -> SyncResult<SessionToken> {
        let body = LoginRequest {
            name: username,
            password,
        };
        let res = self
            .http
            .post(self.url("/control/login"))
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::login(&self.base_url, e.to_string()))?;

        let status = res.status();
        if status != StatusCode::OK {
            let text = res.text().await.unwrap_or_default();
            return Err(SyncError::login(
                &self.base_url,
                format!("status {status}: {}", text.trim()),
            ));
        }

        res.cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| SessionToken::new(c.value()))
            .ok_or_else(|| SyncError::login(&self.base_url, "no session cookie in response"))
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SessionToken,
    ) -> SyncResult<T> {
        let res = self
            .session_cookie(self.http.get(self.url(path)), token)
            .send()
            .await?;
        let res = check_status(path, res)?;
        Ok(res.json::<T>().await?)
    }

    pub async fn get_value(&self, path: &str, token: &SessionToken) -> SyncResult<Value> {
        self.get_json::<Value>(path, token).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: &SessionToken,
        body: &B,
    ) -> SyncResult<()> {
        let res = self
            .session_cookie(self.http.post(self.url(path)), token)
            .json(body)
            .send()
            .await?;
        check_status(path, res)?;
        Ok(())
    }

    /// POST a raw text body, used for rule uploads.
    pub async fn post_text(&self, path: &str, token: &SessionToken, text: &str) -> SyncResult<()> {
        let res = self
            .session_cookie(self.http.post(self.url(path)), token)
            .header(header::CONTENT_TYPE, "text/plain")
            .body(text.to_owned())
            .send()
            .await?;
        check_status(path, res)?;
        Ok(())
    }

    pub async fn post_empty(&self, path: &str, token: &SessionToken) -> SyncResult<()> {
        let res = self
            .session_cookie(self.http.post(self.url(path)), token)
            .send()
            .await?;
        check_status(path, res)?;
        Ok(())
    }
}

/// The one place HTTP status is interpreted.
fn check_status(path: &str, res: Response) -> SyncResult<Response> {
    match res.status() {
        StatusCode::OK => Ok(res),
        StatusCode::FORBIDDEN => Err(SyncError::Unauthenticated {
            path: path.to_string(),
        }),
        status => {
            debug!(path, %status, "appliance rejected request");
            Err(SyncError::Request {
                path: path.to_string(),
                status,
            })
        }
    }
}
