use std::future::Future;

use pluginctl_client::{Client, ClientError};
use pluginctl_types::ServerConfig;

/// The two server calls the log follower consumes. Implemented by the
/// real client and by scripted servers in tests.
pub trait ServerApi {
    /// Fetch the server configuration.
    fn get_config(&self) -> impl Future<Output = Result<ServerConfig, ClientError>>;

    /// Fetch one page of raw log records.
    fn get_logs(
        &self,
        page: usize,
        per_page: usize,
    ) -> impl Future<Output = Result<Vec<String>, ClientError>>;
}

impl ServerApi for Client {
    async fn get_config(&self) -> Result<ServerConfig, ClientError> {
        Client::get_config(self).await
    }

    async fn get_logs(&self, page: usize, per_page: usize) -> Result<Vec<String>, ClientError> {
        Client::get_logs(self, page, per_page).await
    }
}
