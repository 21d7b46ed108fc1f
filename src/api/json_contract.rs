use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::{WaterfallChart, WaterfallChartProps, WaterfallSnapshot};

pub const WATERFALL_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: WaterfallSnapshot,
}

impl WaterfallSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = WaterfallSnapshotJsonContractV1 {
            schema_version: WATERFALL_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::JsonContract(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }

    /// Accepts either a bare snapshot or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(snapshot) = serde_json::from_str::<WaterfallSnapshot>(input) {
            return Ok(snapshot);
        }
        let payload: WaterfallSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::JsonContract(format!("failed to parse snapshot json payload: {e}"))
        })?;
        if payload.schema_version != WATERFALL_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::JsonContract(format!(
                "unsupported snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.snapshot)
    }
}

impl WaterfallChartProps {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let props: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::JsonContract(format!("failed to parse chart props: {e}")))?;
        props.validate()?;
        Ok(props)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::JsonContract(format!("failed to serialize chart props: {e}")))
    }
}

impl<R: Renderer> WaterfallChart<R> {
    pub fn snapshot_json_contract_v1_pretty(&mut self) -> ChartResult<String> {
        self.snapshot()?.to_json_contract_v1_pretty()
    }
}
