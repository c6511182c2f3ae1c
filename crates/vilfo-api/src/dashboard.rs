// Dashboard endpoints
//
// Board information and the metric feeds behind it. `get_load` implements
// the two-step fallback: the board payload's `load` field when present,
// otherwise the most recent utilization sample.

use serde_json::Value;
use tracing::debug;

use crate::client::VilfoClient;
use crate::error::Error;

impl VilfoClient {
    /// Get board information (name, firmware version, current load).
    ///
    /// `GET /dashboard/board`
    pub async fn get_board_information(&self) -> Result<Value, Error> {
        debug!("fetching board information");
        self.get("/dashboard/board").await
    }

    /// Get the recent utilization time series (last few hours).
    ///
    /// `GET /dashboard/utilization`
    pub async fn get_utilization(&self) -> Result<Value, Error> {
        debug!("fetching utilization");
        self.get("/dashboard/utilization").await
    }

    /// Get aggregate online/offline device counts.
    ///
    /// `GET /dashboard/online-devices`
    pub async fn get_online_devices(&self) -> Result<Value, Error> {
        debug!("fetching online device counts");
        self.get("/dashboard/online-devices").await
    }

    /// Get the current router load.
    ///
    /// Reads the board payload's `load` field; when the field is absent,
    /// falls back to the most recent utilization sample. Errors from the
    /// board call propagate; errors from the fallback call are swallowed
    /// and yield `Ok(None)`, as does an empty series.
    pub async fn get_load(&self) -> Result<Option<Value>, Error> {
        let board = self.get_board_information().await?;
        if let Some(load) = board.get("load") {
            return Ok(Some(load.clone()));
        }

        debug!("board information has no load field, trying utilization");
        match self.get_utilization().await {
            Ok(utilization) => Ok(latest_utilization_sample(&utilization)),
            Err(e) => {
                debug!(error = %e, "utilization fallback failed");
                Ok(None)
            }
        }
    }
}

/// The most recent sample in a utilization payload, if any.
fn latest_utilization_sample(utilization: &Value) -> Option<Value> {
    utilization
        .get("utilization")
        .and_then(Value::as_array)
        .and_then(|samples| samples.last())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn latest_sample_is_the_last_element() {
        let utilization = json!({ "utilization": [1, 2, 3] });
        assert_eq!(latest_utilization_sample(&utilization), Some(json!(3)));
    }

    #[test]
    fn empty_series_has_no_sample() {
        assert_eq!(latest_utilization_sample(&json!({ "utilization": [] })), None);
    }

    #[test]
    fn malformed_series_has_no_sample() {
        assert_eq!(
            latest_utilization_sample(&json!({ "utilization": "busy" })),
            None
        );
        assert_eq!(latest_utilization_sample(&json!({})), None);
    }
}
