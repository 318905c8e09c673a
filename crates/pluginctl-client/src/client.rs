use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request};
use hyper_util::client::legacy::Client as HyperClient;
use hyper_util::rt::TokioExecutor;
use hyperlocal::{UnixConnector, Uri as UnixUri};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use pluginctl_types::ServerConfig;

use crate::error::ClientError;
use crate::transport::Transport;

const API_ROOT: &str = "/api/v4";

/// Mattermost API v4 client over the resolved transport.
pub struct Client {
    inner: Inner,
}

enum Inner {
    /// HTTPS against the site URL, authenticated with a token.
    Http {
        http: reqwest::Client,
        base: String,
        token: String,
    },

    /// Local mode: plain HTTP over the administrative unix socket.
    Unix {
        http: HyperClient<UnixConnector, Full<Bytes>>,
        socket: PathBuf,
    },
}

impl Client {
    /// Connect using the given transport. Login-credential transports
    /// authenticate here; the other modes connect lazily.
    pub async fn connect(transport: Transport) -> Result<Self, ClientError> {
        match transport {
            Transport::LocalSocket(socket) => {
                let http = HyperClient::builder(TokioExecutor::new()).build(UnixConnector);
                Ok(Self {
                    inner: Inner::Unix { http, socket },
                })
            }
            Transport::BearerToken { site_url, token } => {
                tracing::info!(%site_url, "authenticating using token");
                Ok(Self {
                    inner: Inner::Http {
                        http: reqwest::Client::new(),
                        base: trim_base(&site_url),
                        token,
                    },
                })
            }
            Transport::LoginCreds {
                site_url,
                username,
                password,
            } => {
                tracing::info!(%site_url, %username, "authenticating with login credentials");
                let http = reqwest::Client::new();
                let base = trim_base(&site_url);
                let token = login(&http, &base, &username, &password).await?;
                Ok(Self {
                    inner: Inner::Http { http, base, token },
                })
            }
        }
    }

    /// Fetch the server configuration.
    pub async fn get_config(&self) -> Result<ServerConfig, ClientError> {
        self.get_json(&format!("{API_ROOT}/config")).await
    }

    /// Fetch one page of raw server log records.
    pub async fn get_logs(&self, page: usize, per_page: usize) -> Result<Vec<String>, ClientError> {
        self.get_json(&format!(
            "{API_ROOT}/logs?page={page}&logs_per_page={per_page}"
        ))
        .await
    }

    /// Upload a plugin bundle, replacing an already-installed copy of the
    /// same plugin.
    pub async fn upload_plugin(&self, filename: &str, bundle: Vec<u8>) -> Result<(), ClientError> {
        let (content_type, body) = encode_plugin_form(filename, &bundle);
        self.request(
            Method::POST,
            &format!("{API_ROOT}/plugins"),
            Some((content_type, body)),
        )
        .await?;
        Ok(())
    }

    /// Enable an installed plugin.
    pub async fn enable_plugin(&self, plugin_id: &str) -> Result<(), ClientError> {
        self.request(
            Method::POST,
            &format!("{API_ROOT}/plugins/{plugin_id}/enable"),
            None,
        )
        .await?;
        Ok(())
    }

    /// Disable an installed plugin.
    pub async fn disable_plugin(&self, plugin_id: &str) -> Result<(), ClientError> {
        self.request(
            Method::POST,
            &format!("{API_ROOT}/plugins/{plugin_id}/disable"),
            None,
        )
        .await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let bytes = self.request(Method::GET, path, None).await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }

    /// Issue one request over whichever transport this client holds and
    /// return the response body. Non-2xx responses become [`ClientError::Api`].
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<(String, Bytes)>,
    ) -> Result<Bytes, ClientError> {
        match &self.inner {
            Inner::Http { http, base, token } => {
                let mut req = http
                    .request(method, format!("{base}{path}"))
                    .bearer_auth(token);
                if let Some((content_type, bytes)) = body {
                    req = req.header(CONTENT_TYPE, content_type).body(bytes);
                }

                let resp = req.send().await?;
                let status = resp.status().as_u16();
                let bytes = resp.bytes().await?;
                if !(200..300).contains(&status) {
                    return Err(api_error(status, &bytes));
                }
                Ok(bytes)
            }
            Inner::Unix { http, socket } => {
                let uri: hyper::Uri = UnixUri::new(socket, path).into();
                let builder = Request::builder().method(method).uri(uri);
                let req = match body {
                    Some((content_type, bytes)) => builder
                        .header(CONTENT_TYPE, content_type)
                        .body(Full::new(bytes)),
                    None => builder.body(Full::default()),
                }
                .map_err(|e| ClientError::Request(e.to_string()))?;

                let resp = http.request(req).await?;
                let status = resp.status().as_u16();
                let bytes = resp
                    .into_body()
                    .collect()
                    .await
                    .map_err(ClientError::Body)?
                    .to_bytes();
                if !(200..300).contains(&status) {
                    return Err(api_error(status, &bytes));
                }
                Ok(bytes)
            }
        }
    }
}

/// Log in with admin credentials and return the session token from the
/// `Token` response header.
async fn login(
    http: &reqwest::Client,
    base: &str,
    username: &str,
    password: &str,
) -> Result<String, ClientError> {
    let resp = http
        .post(format!("{base}{API_ROOT}/users/login"))
        .json(&json!({ "login_id": username, "password": password }))
        .send()
        .await?;

    let status = resp.status().as_u16();
    if !(200..300).contains(&status) {
        let bytes = resp.bytes().await?;
        return Err(api_error(status, &bytes));
    }

    resp.headers()
        .get("Token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .ok_or(ClientError::MissingSessionToken)
}

fn trim_base(site_url: &str) -> String {
    site_url.trim_end_matches('/').to_string()
}

/// Error envelope the server attaches to non-2xx responses.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

fn api_error(status: u16, body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());
    ClientError::Api { status, message }
}

/// Encode the multipart/form-data body for a forced plugin upload: the
/// bundle under the `plugin` field plus `force=true`. Shared by both
/// transports so they send identical bytes.
fn encode_plugin_form(filename: &str, bundle: &[u8]) -> (String, Bytes) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let boundary = format!("------------------------{nanos:024x}");

    let mut body = Vec::with_capacity(bundle.len() + 512);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"force\"\r\n\r\ntrue\r\n");
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"plugin\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/gzip\r\n\r\n");
    body.extend_from_slice(bundle);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={boundary}"),
        Bytes::from(body),
    )
}
