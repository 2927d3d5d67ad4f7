// Backend reachability probe.

use tracing::debug;

use crate::client::ManifestClient;
use crate::error::Error;

impl ManifestClient {
    /// Check that the backend answers at all.
    ///
    /// Hits `GET /api/health` without credentials. Any 2xx is success;
    /// transport failures and error statuses are returned as-is.
    pub async fn probe(&self) -> Result<(), Error> {
        let url = self.api_url("health")?;
        debug!("probing backend at {}", url);

        let resp = self.http().get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: format!("health check returned {status}"),
            });
        }

        debug!("backend reachable");
        Ok(())
    }
}
